mod app;
mod components;
mod config_loader;
mod content;
mod dom;
mod dom_surface;
mod log;
mod page_flip;
mod timers;
mod typed;
mod writer_host;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    log::init();
    leptos::mount::mount_to_body(app::App);
}
