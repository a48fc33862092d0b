//! Page-turning book reader
//!
//! [`FlipbookController`] owns the open/close/navigate state of one book and
//! drives an injected page-turn engine. Everything timing-dependent goes
//! through a [`Scheduler`](crate::schedule::Scheduler), so the whole state
//! machine runs headless in tests.

mod book;
mod controller;
mod engine;
mod geometry;
#[cfg(any(test, feature = "test-support"))]
pub mod mock;
mod surface;

#[cfg(test)]
mod tests;

pub use book::{Book, Density, PageSpec};
pub use controller::{FlipbookController, Phase, ScheduledPhase};
pub use engine::{EngineFactory, EngineSettings, PageTurnEngine, PositionSink, SizingMode};
pub use geometry::{centering_offset, Bounds, Geometry, Orientation};
pub use surface::{ReaderKey, ReaderSurface};

/// What the reader is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    /// Closed cover; no engine mounted
    #[default]
    Closed,
    /// Engine on its first leaf
    FrontCover,
    /// Two facing content leaves
    Spread,
    /// Engine on its last leaf
    BackCover,
}

impl ViewState {
    /// Map an engine leaf index to the view it shows.
    pub fn from_leaf(leaf: usize, leaf_count: usize) -> Self {
        if leaf == 0 {
            ViewState::FrontCover
        } else if leaf + 1 >= leaf_count {
            ViewState::BackCover
        } else {
            ViewState::Spread
        }
    }

    pub fn is_open(self) -> bool {
        self != ViewState::Closed
    }
}
