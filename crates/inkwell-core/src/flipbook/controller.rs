//! Open/close/navigate state machine for a single book

use tracing::{debug, error, info, warn};

use super::book::{Book, PageSpec};
use super::engine::{EngineFactory, EngineSettings, PageTurnEngine, PositionSink};
use super::geometry::{centering_offset, Geometry};
use super::surface::{ReaderKey, ReaderSurface};
use super::ViewState;
use crate::config::ReaderConfig;
use crate::error::EngineError;
use crate::schedule::Scheduler;

/// Named timed steps of the open and close sequences.
///
/// Open: reveal (immediate) -> settle -> `AdvanceToFirstPage`.
/// Close: flip to cover (immediate) -> `SettleCenter` -> `Teardown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AdvanceToFirstPage,
    SettleCenter,
    Teardown,
}

/// A phase tagged with the operation that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledPhase {
    pub phase: Phase,
    pub generation: u64,
}

/// Mediates between reader input and a page-turn engine.
///
/// `view` is the single source of truth; the surface only renders it. Every
/// entry point is gated on `animating`, so at most one open/close/navigate
/// operation is in flight and late requests are dropped rather than queued.
pub struct FlipbookController<F, S, T>
where
    F: EngineFactory,
    S: ReaderSurface,
    T: Scheduler<ScheduledPhase>,
{
    book: Book,
    config: ReaderConfig,
    factory: F,
    surface: S,
    scheduler: T,
    engine: Option<F::Engine>,
    position_sink: Option<PositionSink>,
    view: ViewState,
    animating: bool,
    generation: u64,
    offset: f64,
}

impl<F, S, T> FlipbookController<F, S, T>
where
    F: EngineFactory,
    S: ReaderSurface,
    T: Scheduler<ScheduledPhase>,
{
    pub fn new(book: Book, config: ReaderConfig, factory: F, surface: S, scheduler: T) -> Self {
        Self {
            book,
            config,
            factory,
            surface,
            scheduler,
            engine: None,
            position_sink: None,
            view: ViewState::Closed,
            animating: false,
            generation: 0,
            offset: 0.0,
        }
    }

    /// Route the engine's position notifications back to this controller.
    /// Engines created after this call subscribe to `sink`.
    pub fn set_position_sink(&mut self, sink: PositionSink) {
        self.position_sink = Some(sink);
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn is_open(&self) -> bool {
        self.view.is_open()
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Leaves held by the live engine, if any.
    pub fn leaf_count(&self) -> Option<usize> {
        self.engine.as_ref().map(|engine| engine.leaf_count())
    }

    /// Last offset handed to the surface.
    pub fn current_offset(&self) -> f64 {
        self.offset
    }

    /// Page geometry for the surface as it is right now.
    pub fn geometry(&self) -> Geometry {
        Geometry::compute(
            self.surface.bounds(),
            self.config.aspect_ratio,
            self.surface.orientation(),
        )
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    /// Open the book on its front cover. Returns whether the request was
    /// accepted and the engine came up.
    pub fn open(&mut self) -> bool {
        if self.view.is_open() || self.animating {
            debug!(book = %self.book.id, view = ?self.view, animating = self.animating, "Ignoring open");
            return false;
        }

        self.animating = true;
        self.generation += 1;

        if !self.surface.ensure_mount_point() {
            warn!(book = %self.book.id, "Flip surface mount point was missing, recreated it");
        }
        // Measured while the cover still holds the layout open; an empty
        // surface may collapse once revealed.
        let orientation = self.surface.orientation();
        let geometry = self.geometry();
        self.surface.reveal();

        let settings = EngineSettings::new(geometry, orientation, &self.config);
        let pages = self.book.materialize();

        match self.start_engine(&settings, &pages) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                error!(book = %self.book.id, error = %e, "Could not open book");
                self.surface.clear_engine_artifacts();
                self.surface.restore_cover();
                self.set_offset(0.0);
                self.animating = false;
                return false;
            }
        }

        info!(
            book = %self.book.id,
            leaves = pages.len(),
            width = geometry.width,
            height = geometry.height,
            ?orientation,
            "Opened book"
        );

        self.view = ViewState::FrontCover;
        self.set_offset(centering_offset(self.view, geometry, orientation));
        self.surface.attach_keys();
        self.schedule(Phase::AdvanceToFirstPage, self.config.open_settle());
        true
    }

    /// Flip back to the cover and tear the engine down. Returns whether the
    /// request was accepted.
    pub fn close(&mut self) -> bool {
        if !self.view.is_open() || self.animating {
            debug!(book = %self.book.id, view = ?self.view, animating = self.animating, "Ignoring close");
            return false;
        }

        self.animating = true;
        self.generation += 1;
        self.surface.detach_keys();

        if let Some(engine) = self.engine.as_mut() {
            engine.go_to_leaf(0);
        }
        self.schedule(Phase::SettleCenter, self.config.flip_duration());
        true
    }

    pub fn next(&mut self) -> bool {
        self.navigate(<F::Engine as PageTurnEngine>::advance)
    }

    pub fn prev(&mut self) -> bool {
        self.navigate(<F::Engine as PageTurnEngine>::retreat)
    }

    /// Keyboard bridge. Keys are ignored while closed or animating.
    pub fn handle_key(&mut self, key: ReaderKey) -> bool {
        if !self.view.is_open() || self.animating {
            return false;
        }
        match key {
            ReaderKey::Escape => self.close(),
            ReaderKey::ArrowLeft => self.prev(),
            ReaderKey::ArrowRight => self.next(),
        }
    }

    /// Position-change notification from the engine.
    pub fn handle_position_change(&mut self, leaf: usize) {
        if !self.view.is_open() {
            debug!(book = %self.book.id, leaf, "Ignoring position change while closed");
            return;
        }
        let Some(leaf_count) = self.leaf_count() else {
            return;
        };
        if leaf >= leaf_count {
            warn!(book = %self.book.id, leaf, leaf_count, "Engine reported an unknown leaf");
            return;
        }

        self.view = ViewState::from_leaf(leaf, leaf_count);
        debug!(book = %self.book.id, leaf, view = ?self.view, "Position changed");
        self.recenter();
    }

    /// Fire a previously scheduled phase. Phases from an earlier operation are
    /// discarded, and each phase re-checks the current state before acting.
    pub fn run_phase(&mut self, scheduled: ScheduledPhase) {
        if scheduled.generation != self.generation {
            debug!(book = %self.book.id, phase = ?scheduled.phase, "Discarding stale phase");
            return;
        }
        debug!(book = %self.book.id, phase = ?scheduled.phase, "Running phase");

        match scheduled.phase {
            Phase::AdvanceToFirstPage => {
                if self.view.is_open() {
                    if let Some(engine) = self.engine.as_mut() {
                        engine.go_to_leaf(1);
                    }
                }
                self.animating = false;
            }
            Phase::SettleCenter => {
                if self.view.is_open() {
                    self.view = ViewState::FrontCover;
                    self.recenter();
                }
                self.schedule(Phase::Teardown, self.config.close_settle());
            }
            Phase::Teardown => self.teardown(),
        }
    }

    fn navigate(&mut self, step: fn(&mut F::Engine)) -> bool {
        if self.animating {
            return false;
        }
        match self.engine.as_mut() {
            Some(engine) => {
                step(engine);
                true
            }
            None => false,
        }
    }

    fn start_engine(
        &mut self,
        settings: &EngineSettings,
        pages: &[PageSpec],
    ) -> Result<F::Engine, EngineError> {
        let mut engine = self.factory.create(settings)?;
        if let Err(e) = engine.load_pages(pages) {
            if let Err(destroy_err) = engine.destroy() {
                warn!(book = %self.book.id, error = %destroy_err, "Could not destroy half-built engine");
            }
            return Err(e);
        }
        match &self.position_sink {
            Some(sink) => engine.subscribe(sink.clone()),
            None => debug!(book = %self.book.id, "No position sink; view will not follow flips"),
        }
        Ok(engine)
    }

    /// Runs to completion on every path so the lock can never stay held.
    fn teardown(&mut self) {
        if let Some(mut engine) = self.engine.take() {
            if let Err(e) = engine.destroy() {
                error!(book = %self.book.id, error = %e, "Engine destruction failed, cleaning up anyway");
            }
        }
        self.surface.clear_engine_artifacts();
        self.surface.restore_cover();
        self.set_offset(0.0);
        self.view = ViewState::Closed;
        self.animating = false;
        info!(book = %self.book.id, "Closed book");
    }

    fn recenter(&mut self) {
        let offset = centering_offset(self.view, self.geometry(), self.surface.orientation());
        self.set_offset(offset);
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.surface.set_offset(offset);
    }

    fn schedule(&mut self, phase: Phase, delay: std::time::Duration) {
        self.scheduler.schedule(
            delay,
            ScheduledPhase {
                phase,
                generation: self.generation,
            },
        );
    }
}
