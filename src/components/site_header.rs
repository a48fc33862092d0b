//! Site header: logo, navigation with a mobile menu, theme switch

use inkwell_core::nav::{anchor_target, scroll_top};
use inkwell_core::NavMenu;
use leptos::prelude::*;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, MouseEvent, ScrollBehavior, ScrollToOptions};

use crate::components::ThemeToggle;
use crate::dom;

const NAV_LINKS: [(&str, &str); 4] = [
    ("#", "Početna"),
    ("#knjige", "Knjige"),
    ("#eseji", "Eseji"),
    ("#kontakt", "Kontakt"),
];

/// Smooth-scroll to an in-page target, leaving room for the header.
fn scroll_to_anchor(ev: &MouseEvent, href: &str) {
    let Some(target) = anchor_target(href).and_then(dom::by_id) else {
        return;
    };
    let Some(window) = dom::window() else {
        return;
    };
    ev.prevent_default();

    let header_height = dom::by_id("header").map_or(0.0, |h| f64::from(h.offset_height()));
    let page_y = window.page_y_offset().unwrap_or(0.0);
    let options = ScrollToOptions::new();
    options.set_top(scroll_top(target.get_bounding_client_rect().top(), page_y, header_height));
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

fn listen_for_escape(menu: RwSignal<NavMenu>) {
    let Some(document) = dom::document() else {
        return;
    };
    let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
        let key = ev.key();
        menu.try_update(|m| m.handle_key(&key));
    });
    match document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref()) {
        Ok(()) => on_key.forget(),
        Err(e) => warn!(error = %dom::js_error(&e), "Could not listen for Escape on the menu"),
    }
}

#[component]
pub fn SiteHeader() -> impl IntoView {
    let menu = RwSignal::new(NavMenu::default());
    listen_for_escape(menu);

    Effect::new(move || {
        let overflow = menu.get().body_overflow();
        if let Some(body) = dom::document().and_then(|d| d.body()) {
            dom::set_style(&body, "overflow", overflow);
        }
    });

    let links = NAV_LINKS
        .into_iter()
        .map(|(href, label)| {
            view! {
                <li>
                    <a
                        href=href
                        on:click=move |ev: MouseEvent| {
                            menu.update(|m| {
                                m.close();
                            });
                            scroll_to_anchor(&ev, href);
                        }
                    >
                        {label}
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <header id="header">
            <div class="header-container">
                <a href="#" class="logo" aria-label="Početna strana">
                    <span class="logo-text">"Inkwell"</span>
                </a>
                <button
                    id="menu-toggle"
                    class="menu-toggle"
                    aria-label="Otvori meni"
                    aria-expanded=move || menu.get().is_open().to_string()
                    on:click=move |_| menu.update(NavMenu::toggle)
                >
                    <span class="hamburger"></span>
                </button>
                <nav
                    id="main-nav"
                    class=move || if menu.get().is_open() { "main-nav active" } else { "main-nav" }
                    aria-label="Glavna navigacija"
                >
                    <ul class="nav-list">{links}</ul>
                </nav>
                <ThemeToggle />
            </div>
        </header>
    }
}
