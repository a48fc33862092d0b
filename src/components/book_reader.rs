//! Page-turning book reader component
//!
//! Renders the closed cover plus the empty flip surface and controls. A
//! [`FlipbookController`] does the rest: it owns the StPageFlip engine while
//! the book is open and drives the surface through [`DomSurface`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use inkwell_core::flipbook::{FlipbookController, ScheduledPhase};
use inkwell_core::{Book, ReaderConfig};
use leptos::prelude::*;
use tracing::{debug, warn};

use crate::content::BookEntry;
use crate::dom_surface::DomSurface;
use crate::page_flip::PageFlipFactory;
use crate::timers::{self, TimeoutScheduler};

type DomController = FlipbookController<PageFlipFactory, DomSurface, TimeoutScheduler<ScheduledPhase>>;

/// Run `f` on the controller unless it is gone or mid-call. Returns whether it ran.
fn with_controller(reader: &Weak<RefCell<DomController>>, f: impl FnOnce(&mut DomController)) -> bool {
    let Some(reader) = reader.upgrade() else {
        return false;
    };
    let Ok(mut controller) = reader.try_borrow_mut() else {
        return false;
    };
    f(&mut controller);
    true
}

fn deliver_position(reader: Weak<RefCell<DomController>>, leaf: usize) {
    if with_controller(&reader, |c| c.handle_position_change(leaf)) {
        return;
    }
    // Reported from inside a controller call; retry once it returns.
    timers::defer(move || {
        if !with_controller(&reader, |c| c.handle_position_change(leaf)) {
            debug!(leaf, "Dropped position change for a reader that is gone");
        }
    });
}

fn deliver_phase(reader: Weak<RefCell<DomController>>, phase: ScheduledPhase) {
    if with_controller(&reader, |c| c.run_phase(phase)) {
        return;
    }
    // A dropped phase could leave the reader locked, so wait for the current call.
    timers::defer(move || {
        if !with_controller(&reader, |c| c.run_phase(phase)) {
            warn!(phase = ?phase.phase, "Dropped phase for a reader that is gone or still busy");
        }
    });
}

fn build_controller(book: Book, config: ReaderConfig, mobile_breakpoint: u32, root_id: &str) -> Rc<RefCell<DomController>> {
    let reader = Rc::new_cyclic(|this: &Weak<RefCell<DomController>>| {
        let phases = this.clone();
        let scheduler = TimeoutScheduler::new(move |phase: ScheduledPhase| deliver_phase(phases.clone(), phase));
        let keys = this.clone();
        let surface = DomSurface::new(
            root_id,
            mobile_breakpoint,
            Rc::new(move |key| {
                with_controller(&keys, |c| {
                    c.handle_key(key);
                });
            }),
        );
        RefCell::new(FlipbookController::new(
            book,
            config,
            PageFlipFactory::new(root_id),
            surface,
            scheduler,
        ))
    });

    let sink_target = Rc::downgrade(&reader);
    reader
        .borrow_mut()
        .set_position_sink(Rc::new(move |leaf| deliver_position(sink_target.clone(), leaf)));
    reader
}

#[component]
pub fn BookReader(
    /// Shelf entry to show
    entry: BookEntry,
    /// Timing and sizing settings
    config: ReaderConfig,
    /// Viewport width below which the reader shows single pages
    #[prop(default = 768)]
    mobile_breakpoint: u32,
) -> impl IntoView {
    let root_id = format!("book-{}", entry.id);
    let book = Book::new(entry.id.clone(), entry.front.clone(), entry.back.clone(), entry.pages.clone());
    let reader = build_controller(book, config, mobile_breakpoint, &root_id);

    let open_reader = Rc::downgrade(&reader);
    let on_open = move |_| {
        with_controller(&open_reader, |c| {
            c.open();
        });
    };
    let prev_reader = Rc::downgrade(&reader);
    let on_prev = move |_| {
        with_controller(&prev_reader, |c| {
            c.prev();
        });
    };
    let next_reader = Rc::downgrade(&reader);
    let on_next = move |_| {
        with_controller(&next_reader, |c| {
            c.next();
        });
    };
    // The close handler keeps the controller alive for as long as the view exists.
    let on_close = move |_| {
        if let Ok(mut c) = reader.try_borrow_mut() {
            c.close();
        }
    };

    let cover_label = format!("Otvori knjigu {}", entry.title);
    let pages_json = serde_json::to_string(&entry.pages).unwrap_or_else(|_| "[]".to_string());

    view! {
        <div
            class="book-container"
            id=root_id
            data-id=entry.id.clone()
            data-pages=pages_json
            data-front=entry.front.clone()
            data-back=entry.back.clone()
        >
            <button type="button" class="book-cover" aria-label=cover_label on:click=on_open>
                <img src=entry.front.clone() alt=entry.title.clone() />
                <span class="book-cover-hint">"Klikni za čitanje"</span>
            </button>
            <div class="book-flipbook" style="display: none"></div>
            <div class="book-controls" style="display: none">
                <button type="button" class="btn-prev" aria-label="Prethodna" on:click=on_prev>
                    "‹"
                </button>
                <button type="button" class="btn-close" aria-label="Zatvori" on:click=on_close>
                    "✕"
                </button>
                <button type="button" class="btn-next" aria-label="Sledeća" on:click=on_next>
                    "›"
                </button>
            </div>
        </div>
    }
}
