//! Day/night switch
//!
//! The initial theme comes from the visitor's session choice or the sun over
//! the site's location. Toggling plays a wipe in the direction of the new
//! theme.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::Local;
use gloo_timers::callback::Timeout;
use inkwell_core::theme::{Location, PreferenceStore, Theme, ThemeSwitch, WipeDirection};
use leptos::prelude::*;
use tracing::warn;
use web_sys::Storage;

use crate::dom;

/// `sessionStorage`; the choice lasts until the tab is closed.
pub struct SessionStore {
    storage: Option<Storage>,
}

impl SessionStore {
    pub fn new() -> Self {
        let storage = dom::window().and_then(|w| w.session_storage().ok().flatten());
        if storage.is_none() {
            warn!("sessionStorage unavailable, theme choice will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, value);
        }
    }
}

/// Light is marked on the root element; dark is the stylesheet default.
pub fn apply_theme(theme: Theme) {
    let Some(root) = dom::document().and_then(|d| d.document_element()) else {
        return;
    };
    let _ = match theme {
        Theme::Light => root.set_attribute("data-theme", Theme::Light.as_str()),
        Theme::Dark => root.remove_attribute("data-theme"),
    };
}

#[component]
pub fn ThemeToggle(
    /// Where the solar default is computed for
    #[prop(default = Location::BELGRADE)]
    location: Location,
) -> impl IntoView {
    let switch = ThemeSwitch::new(SessionStore::new(), location, &Local::now());
    let initial = switch.current();
    apply_theme(initial);

    let switch = Rc::new(RefCell::new(switch));
    let (theme, set_theme) = signal(initial);
    let (wipe, set_wipe) = signal::<Option<WipeDirection>>(None);
    // Only the latest toggle may clear the wipe class.
    let wipe_token = Rc::new(Cell::new(0u32));

    let on_change = move |_| {
        let Ok(mut switch) = switch.try_borrow_mut() else {
            return;
        };
        let wipe_effect = switch.toggle();
        let current = switch.current();
        apply_theme(current);
        set_theme.set(current);
        set_wipe.set(Some(wipe_effect.direction));

        let token = wipe_token.get().wrapping_add(1);
        wipe_token.set(token);
        let latest = Rc::clone(&wipe_token);
        let millis = u32::try_from(wipe_effect.clear_after.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || {
            if latest.get() == token {
                set_wipe.set(None);
            }
        })
        .forget();
    };

    let class = move || match wipe.get() {
        Some(direction) => format!("theme-switch {}", direction.class_name()),
        None => "theme-switch".to_string(),
    };

    view! {
        <label class=class aria-label="Prebaci temu dan/noć">
            <input
                type="checkbox"
                id="theme-switch-input"
                class="theme-switch__input"
                prop:checked=move || theme.get() == Theme::Light
                on:change=on_change
            />
            <span class="theme-switch__track">
                <span class="theme-switch__night-bg"></span>
                <span class="theme-switch__day-bg"></span>
                <span class="theme-switch__toggle">
                    <span class="theme-switch__moon">
                        <span class="theme-switch__crater theme-switch__crater--1"></span>
                        <span class="theme-switch__crater theme-switch__crater--2"></span>
                        <span class="theme-switch__crater theme-switch__crater--3"></span>
                    </span>
                    <span class="theme-switch__sun"></span>
                </span>
            </span>
        </label>
    }
}
