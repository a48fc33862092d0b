//! Runs the essay writer queue against the page
//!
//! The host owns the [`WriterQueue`] for one essays section, maps entry
//! indices to their `<article>` ids, and turns typing plans into Typed.js
//! runs. Handwriting mode also moves the quill image along with the caret.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use inkwell_core::config::PenConfig;
use inkwell_core::writer::{
    is_in_viewport, pen_position, pen_width, CaretRect, Completion, QueueTask, TypingPlan, STATUS_CLASSES,
};
use inkwell_core::{WriterConfig, WriterMode, WriterQueue};
use tracing::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{DomRect, HtmlElement, Node};

use crate::dom;
use crate::timers::TimeoutScheduler;
use crate::typed::TypedRun;

pub type SharedHost = Rc<RefCell<WriterHost>>;

pub struct WriterHost {
    this: Weak<RefCell<WriterHost>>,
    queue: WriterQueue<TimeoutScheduler<QueueTask>>,
    ids: Vec<String>,
    mobile_breakpoint: u32,
    typing: Option<(usize, TypedRun)>,
}

/// Borrow the host if it is still alive and not already borrowed.
pub fn with_host(host: &Weak<RefCell<WriterHost>>, f: impl FnOnce(&mut WriterHost)) {
    let Some(host) = host.upgrade() else {
        return;
    };
    match host.try_borrow_mut() {
        Ok(mut host) => f(&mut host),
        Err(_) => warn!("Writer host busy, dropping callback"),
    }
}

impl WriterHost {
    pub fn new(config: WriterConfig, mobile_breakpoint: u32) -> SharedHost {
        Rc::new_cyclic(|this: &Weak<RefCell<WriterHost>>| {
            let tasks = this.clone();
            let scheduler = TimeoutScheduler::new(move |task: QueueTask| match task {
                QueueTask::StartNext => with_host(&tasks, WriterHost::start_next),
            });
            RefCell::new(WriterHost {
                this: this.clone(),
                queue: WriterQueue::new(config, scheduler),
                ids: Vec::new(),
                mobile_breakpoint,
                typing: None,
            })
        })
    }

    /// Add an essay; `id` is its article element's id.
    pub fn register(&mut self, id: impl Into<String>, text: &str, preset: Option<WriterMode>) -> usize {
        self.ids.push(id.into());
        self.queue.add(text, preset.map(WriterMode::as_str))
    }

    pub fn mode(&self, index: usize) -> Option<WriterMode> {
        self.queue.entry(index).map(|sim| sim.mode())
    }

    pub fn select_mode(&mut self, index: usize, mode: WriterMode) -> bool {
        self.queue.select_mode(index, mode)
    }

    fn root(&self, index: usize) -> Option<HtmlElement> {
        self.ids.get(index).and_then(|id| dom::by_id(id))
    }

    fn is_typing(&self, index: usize) -> bool {
        matches!(self.typing, Some((current, _)) if current == index)
    }

    /// Start the first waiting essay in view, if nothing is typing.
    pub fn start_next(&mut self) {
        let (_, viewport_height) = dom::viewport();
        let ids = &self.ids;
        let visible = |index: usize| {
            ids.get(index).and_then(|id| dom::by_id(id)).is_some_and(|el| {
                let rect = el.get_bounding_client_rect();
                is_in_viewport(rect.top(), rect.bottom(), viewport_height)
            })
        };
        if let Some((index, plan)) = self.queue.start_next(visible) {
            self.begin(index, plan);
        }
    }

    fn begin(&mut self, index: usize, plan: TypingPlan) {
        let target = self.root(index).and_then(|root| {
            self.apply_status(index, &root);
            let content = dom::query(&root, ".essay-content")?;
            content.set_inner_html("");
            let wrapper = dom::create("span", "typed-wrapper")?;
            content.append_child(&wrapper).ok()?;
            Some((root, wrapper))
        });
        let Some((root, wrapper)) = target else {
            warn!(entry = index, "Essay markup missing, showing full text");
            self.skip(index);
            return;
        };

        let pen = self.queue.config().pen.clone();
        if plan.show_pen {
            self.prepare_pen(&root, &pen);
        }

        let this = self.this.clone();
        match TypedRun::start(&wrapper, &plan, move || with_host(&this, |host| host.complete(index))) {
            Ok(run) => {
                debug!(entry = index, mode = plan.mode.as_str(), "Essay typing");
                self.typing = Some((index, run));
                if plan.show_pen {
                    track_pen(self.this.clone(), index, root, pen);
                }
            }
            Err(e) => {
                error!(entry = index, error = %e, "Typed.js unavailable, showing full text");
                self.skip(index);
            }
        }
    }

    /// Typed.js reported the end of the text.
    pub fn complete(&mut self, index: usize) {
        if let Some(done) = self.queue.complete(index) {
            self.finish(index, done);
        }
    }

    /// The reader pressed skip.
    pub fn skip(&mut self, index: usize) {
        if let Some(done) = self.queue.skip(index) {
            self.finish(index, done);
        }
    }

    fn finish(&mut self, index: usize, done: Completion) {
        if self.is_typing(index) {
            if let Some((_, run)) = self.typing.take() {
                run.stop();
            }
        }
        let Some(root) = self.root(index) else {
            return;
        };
        if let Some(content) = dom::query(&root, ".essay-content") {
            content.set_inner_html(&done.html);
        }
        if let Some(pen) = dom::query(&root, ".essay-pen") {
            pen.remove();
        }
        self.apply_status(index, &root);
        if done.cursive {
            if let Some(toggle) = dom::query(&root, ".essay-font-toggle") {
                let _ = toggle.remove_attribute("hidden");
            }
        }
    }

    fn apply_status(&self, index: usize, root: &HtmlElement) {
        let Some(sim) = self.queue.entry(index) else {
            return;
        };
        let classes = root.class_list();
        for class in STATUS_CLASSES {
            let _ = classes.remove_1(class);
        }
        for class in sim.status_classes() {
            let _ = classes.add_1(class);
        }
    }

    fn prepare_pen(&self, root: &HtmlElement, config: &PenConfig) {
        let Some(pen) = dom::query(root, ".essay-pen") else {
            return;
        };
        let (viewport_width, _) = dom::viewport();
        let width = pen_width(config, viewport_width, self.mobile_breakpoint);
        // Hidden until the first caret position is known.
        dom::set_style(&pen, "opacity", "0");
        dom::set_style(&pen, "visibility", "hidden");
        dom::set_style(&pen, "width", &format!("{width}px"));
        dom::set_style(
            &pen,
            "animation",
            &format!("pen-writing {}s ease-in-out infinite alternate", config.animation_duration),
        );
        dom::set_style(&pen, "--pen-rot-min", &format!("{}deg", config.rotation_min));
        dom::set_style(&pen, "--pen-rot-max", &format!("{}deg", config.rotation_max));
    }
}

fn caret(rect: &DomRect) -> CaretRect {
    CaretRect {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
    }
}

/// Client rect just after the last typed character.
fn last_char_rect(wrapper: &HtmlElement) -> Option<DomRect> {
    let mut last: Node = wrapper.clone().into();
    while let Some(child) = last.last_child() {
        last = child;
    }
    if last.node_type() != Node::TEXT_NODE {
        return None;
    }
    // Range offsets count UTF-16 code units.
    let end = last.text_content()?.encode_utf16().count();
    if end == 0 {
        return None;
    }
    let end = u32::try_from(end).ok()?;
    let range = dom::document()?.create_range().ok()?;
    range.set_start(&last, end).ok()?;
    range.set_end(&last, end).ok()?;
    let rects = range.get_client_rects()?;
    rects.item(rects.length().checked_sub(1)?)
}

fn place_pen(root: &HtmlElement, config: &PenConfig) -> Option<()> {
    let wrapper = dom::query(root, ".typed-wrapper")?;
    let paper = dom::query(root, ".essay-paper")?;
    let pen = dom::query(root, ".essay-pen")?;

    let char_rect = last_char_rect(&wrapper)?;
    let paper_rect = paper.get_bounding_client_rect();
    let (x, y) = pen_position(
        caret(&char_rect),
        caret(&paper_rect),
        f64::from(pen.offset_height()),
        config,
    );
    dom::set_style(&pen, "left", &format!("{x}px"));
    dom::set_style(&pen, "top", &format!("{y}px"));
    dom::set_style(&pen, "opacity", "1");
    dom::set_style(&pen, "visibility", "visible");
    Some(())
}

fn still_typing(host: &Weak<RefCell<WriterHost>>, index: usize) -> bool {
    let Some(host) = host.upgrade() else {
        return false;
    };
    let typing = host.try_borrow().map(|h| h.is_typing(index)).unwrap_or(false);
    typing
}

/// Follow the caret every animation frame until entry `index` stops typing.
fn track_pen(host: Weak<RefCell<WriterHost>>, index: usize, root: HtmlElement, config: PenConfig) {
    let Some(window) = dom::window() else {
        return;
    };
    let frame: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let frame_loop = Rc::clone(&frame);
    let loop_window = window.clone();

    *frame.borrow_mut() = Some(Closure::new(move || {
        if !still_typing(&host, index) {
            // Breaks the closure's reference to itself.
            frame_loop.borrow_mut().take();
            return;
        }
        place_pen(&root, &config);
        if let Some(next) = frame_loop.borrow().as_ref() {
            let _ = loop_window.request_animation_frame(next.as_ref().unchecked_ref());
        }
    }));

    if let Some(first) = frame.borrow().as_ref() {
        let _ = window.request_animation_frame(first.as_ref().unchecked_ref());
    }
}
