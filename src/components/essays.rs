//! Essays section
//!
//! Entries wait until they scroll into view, then type out one at a time.

use std::rc::Rc;

use leptos::prelude::*;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::AddEventListenerOptions;

use inkwell_core::WriterConfig;

use crate::components::essay_entry::{EssayEntry, StaticEssay};
use crate::content::EssayEntryData;
use crate::dom;
use crate::timers;
use crate::writer_host::{with_host, WriterHost};

#[component]
pub fn EssaySection(
    essays: Vec<EssayEntryData>,
    config: WriterConfig,
    #[prop(default = 768)] mobile_breakpoint: u32,
) -> impl IntoView {
    if !config.enabled {
        debug!(essays = essays.len(), "Writer animation disabled");
        let entries = essays
            .into_iter()
            .map(|data| view! { <StaticEssay data=data /> })
            .collect_view();
        return view! { <section class="essays">{entries}</section> }.into_any();
    }

    let host = WriterHost::new(config, mobile_breakpoint);
    let indexed: Vec<(usize, EssayEntryData)> = essays
        .into_iter()
        .map(|data| {
            let index = host.borrow_mut().register(&data.slug, &data.content, data.mode);
            (index, data)
        })
        .collect();

    // Every scroll gives the next visible entry a chance to start.
    let scroll_host = Rc::downgrade(&host);
    let on_scroll = Closure::<dyn FnMut()>::new(move || with_host(&scroll_host, WriterHost::start_next));
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    match dom::window().map(|w| {
        w.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            on_scroll.as_ref().unchecked_ref(),
            &options,
        )
    }) {
        Some(Ok(())) => on_scroll.forget(),
        _ => warn!("Could not listen for scroll, essays start only when visible on load"),
    }

    // Entries already on screen start once they are in the document.
    let first_host = Rc::downgrade(&host);
    Effect::new(move || {
        let host = first_host.clone();
        timers::defer(move || with_host(&host, WriterHost::start_next));
    });

    let entries = indexed
        .into_iter()
        .map(|(index, data)| {
            let host = Rc::clone(&host);
            view! { <EssayEntry data=data index=index host=host /> }
        })
        .collect_view();

    view! { <section class="essays">{entries}</section> }.into_any()
}
