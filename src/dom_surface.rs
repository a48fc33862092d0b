//! [`ReaderSurface`] over a `.book-container` element
//!
//! Expected markup inside the container: `.book-cover`, `.book-flipbook`
//! (the engine mount point) and `.book-controls`. Elements are looked up on
//! every call because the engine replaces the mount point when destroyed.

use std::rc::Rc;

use inkwell_core::flipbook::{Bounds, Orientation, ReaderKey, ReaderSurface};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, KeyboardEvent, Node};

use crate::dom;

/// Part of the viewport height a page may take.
const VIEWPORT_HEIGHT_SHARE: f64 = 0.7;

pub struct DomSurface {
    root_id: String,
    mobile_breakpoint: u32,
    on_key: Rc<dyn Fn(ReaderKey)>,
    key_listener: Option<Closure<dyn FnMut(KeyboardEvent)>>,
}

impl DomSurface {
    pub fn new(root_id: impl Into<String>, mobile_breakpoint: u32, on_key: Rc<dyn Fn(ReaderKey)>) -> Self {
        Self {
            root_id: root_id.into(),
            mobile_breakpoint,
            on_key,
            key_listener: None,
        }
    }

    fn root(&self) -> Option<HtmlElement> {
        dom::by_id(&self.root_id)
    }

    fn part(&self, selector: &str) -> Option<HtmlElement> {
        self.root().and_then(|root| dom::query(&root, selector))
    }

    fn show(&self, selector: &str, display: &str) {
        if let Some(el) = self.part(selector) {
            dom::set_style(&el, "display", display);
        }
    }
}

impl ReaderSurface for DomSurface {
    /// Width comes from the container's parent and height from the viewport.
    /// The container itself shrinks to the controls row while the engine's
    /// absolutely positioned pages fill it.
    fn bounds(&self) -> Bounds {
        let (viewport_width, viewport_height) = dom::viewport();
        let width = self
            .root()
            .and_then(|root| root.parent_element())
            .map(|parent| f64::from(parent.client_width()))
            .filter(|width| *width > 0.0)
            .unwrap_or(viewport_width);
        Bounds::new(width, viewport_height * VIEWPORT_HEIGHT_SHARE)
    }

    fn orientation(&self) -> Orientation {
        let (width, height) = dom::viewport();
        Orientation::detect(width, height, self.mobile_breakpoint)
    }

    fn ensure_mount_point(&mut self) -> bool {
        if self.part(".book-flipbook").is_some() {
            return true;
        }
        let (Some(root), Some(mount)) = (self.root(), dom::create("div", "book-flipbook")) else {
            return false;
        };
        // Keep the controls after the surface.
        let controls = self.part(".book-controls").map(Node::from);
        let _ = root.insert_before(&mount, controls.as_ref());
        false
    }

    fn reveal(&mut self) {
        self.show(".book-cover", "none");
        self.show(".book-flipbook", "block");
        self.show(".book-controls", "flex");
        if let Some(root) = self.root() {
            let _ = root.class_list().add_1("is-open");
        }
    }

    fn set_offset(&mut self, offset: f64) {
        if let Some(mount) = self.part(".book-flipbook") {
            dom::set_style(&mount, "transform", &format!("translateX({offset}px)"));
        }
    }

    fn clear_engine_artifacts(&mut self) {
        if let Some(mount) = self.part(".book-flipbook") {
            mount.set_inner_html("");
            mount.set_class_name("book-flipbook");
        }
    }

    fn restore_cover(&mut self) {
        self.show(".book-flipbook", "none");
        self.show(".book-controls", "none");
        self.show(".book-cover", "block");
        if let Some(root) = self.root() {
            let _ = root.class_list().remove_1("is-open");
        }
    }

    fn attach_keys(&mut self) {
        if self.key_listener.is_some() {
            return;
        }
        let Some(document) = dom::document() else {
            return;
        };
        let on_key = Rc::clone(&self.on_key);
        let listener = Closure::<dyn FnMut(KeyboardEvent)>::new(move |ev: KeyboardEvent| {
            if let Some(key) = ReaderKey::from_key_name(&ev.key()) {
                ev.prevent_default();
                on_key(key);
            }
        });
        if document
            .add_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref())
            .is_ok()
        {
            self.key_listener = Some(listener);
        }
    }

    fn detach_keys(&mut self) {
        let Some(listener) = self.key_listener.take() else {
            return;
        };
        if let Some(document) = dom::document() {
            let _ = document.remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref());
        }
    }
}
