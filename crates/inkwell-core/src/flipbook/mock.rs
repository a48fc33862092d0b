//! In-memory engine and surface for driving the controller without a browser.
//!
//! One [`MockDom`] handle is shared by the surface, the engine factory and the
//! position sink, so a test can inspect everything after handing those parts
//! to a controller.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::rc::Rc;

use super::book::PageSpec;
use super::engine::{EngineFactory, EngineSettings, PageTurnEngine, PositionSink};
use super::geometry::{Bounds, Orientation};
use super::surface::ReaderSurface;
use crate::error::EngineError;

/// Commands received by mock engines, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Load(usize),
    Advance,
    Retreat,
    GoTo(usize),
    Destroy,
}

/// Everything the mock surface and engines have done.
#[derive(Debug)]
pub struct DomState {
    pub bounds: Bounds,
    /// Bounds the root reports once revealed, for layouts that collapse
    pub revealed_bounds: Option<Bounds>,
    pub orientation: Orientation,
    pub mount_present: bool,
    pub mounts_recreated: usize,
    pub cover_visible: bool,
    pub surface_visible: bool,
    pub offset: f64,
    pub keys_attached: bool,
    /// Nodes injected by engines and page sequences and not yet cleared
    pub injected_nodes: usize,
    pub engines_created: usize,
    pub engines_destroyed: usize,
    pub last_settings: Option<EngineSettings>,
    pub commands: Vec<EngineCommand>,
    /// Leaf indices reported through the position sink, not yet delivered
    pub notifications: VecDeque<usize>,
    pub fail_create: bool,
    pub fail_load: bool,
    pub fail_destroy: bool,
}

#[derive(Debug, Clone)]
pub struct MockDom {
    inner: Rc<RefCell<DomState>>,
}

impl MockDom {
    pub fn new(bounds: Bounds, orientation: Orientation) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DomState {
                bounds,
                revealed_bounds: None,
                orientation,
                mount_present: true,
                mounts_recreated: 0,
                cover_visible: true,
                surface_visible: false,
                offset: 0.0,
                keys_attached: false,
                injected_nodes: 0,
                engines_created: 0,
                engines_destroyed: 0,
                last_settings: None,
                commands: Vec::new(),
                notifications: VecDeque::new(),
                fail_create: false,
                fail_load: false,
                fail_destroy: false,
            })),
        }
    }

    pub fn state(&self) -> Ref<'_, DomState> {
        self.inner.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, DomState> {
        self.inner.borrow_mut()
    }

    pub fn surface(&self) -> MockSurface {
        MockSurface { dom: self.clone() }
    }

    pub fn factory(&self) -> MockEngineFactory {
        MockEngineFactory { dom: self.clone() }
    }

    /// Sink that queues notifications instead of delivering them, like an
    /// engine that reports once its flip animation has finished.
    pub fn position_sink(&self) -> PositionSink {
        let dom = self.clone();
        Rc::new(move |leaf| dom.state_mut().notifications.push_back(leaf))
    }

    pub fn take_notifications(&self) -> Vec<usize> {
        self.state_mut().notifications.drain(..).collect()
    }
}

pub struct MockSurface {
    dom: MockDom,
}

impl ReaderSurface for MockSurface {
    fn bounds(&self) -> Bounds {
        self.dom.state().bounds
    }

    fn orientation(&self) -> Orientation {
        self.dom.state().orientation
    }

    fn ensure_mount_point(&mut self) -> bool {
        let mut state = self.dom.state_mut();
        if state.mount_present {
            return true;
        }
        state.mount_present = true;
        state.mounts_recreated += 1;
        false
    }

    fn reveal(&mut self) {
        let mut state = self.dom.state_mut();
        state.cover_visible = false;
        state.surface_visible = true;
        if let Some(bounds) = state.revealed_bounds {
            state.bounds = bounds;
        }
    }

    fn set_offset(&mut self, offset: f64) {
        self.dom.state_mut().offset = offset;
    }

    fn clear_engine_artifacts(&mut self) {
        self.dom.state_mut().injected_nodes = 0;
    }

    fn restore_cover(&mut self) {
        let mut state = self.dom.state_mut();
        state.cover_visible = true;
        state.surface_visible = false;
    }

    fn attach_keys(&mut self) {
        self.dom.state_mut().keys_attached = true;
    }

    fn detach_keys(&mut self) {
        self.dom.state_mut().keys_attached = false;
    }
}

pub struct MockEngineFactory {
    dom: MockDom,
}

impl EngineFactory for MockEngineFactory {
    type Engine = MockEngine;

    fn create(&mut self, settings: &EngineSettings) -> Result<MockEngine, EngineError> {
        let mut state = self.dom.state_mut();
        state.last_settings = Some(settings.clone());
        if state.fail_create {
            return Err(EngineError::Construct("mock engine refused to start".into()));
        }
        state.engines_created += 1;
        // The engine wraps the mount point in its own block.
        state.injected_nodes += 1;
        Ok(MockEngine {
            dom: self.dom.clone(),
            leaves: 0,
            position: settings.start_leaf,
            sink: None,
        })
    }
}

/// Engine double that moves one leaf per command and reports every move.
pub struct MockEngine {
    dom: MockDom,
    leaves: usize,
    position: usize,
    sink: Option<PositionSink>,
}

impl MockEngine {
    fn move_to(&mut self, leaf: usize) {
        self.position = leaf.min(self.leaves.saturating_sub(1));
        if let Some(sink) = &self.sink {
            sink(self.position);
        }
    }
}

impl PageTurnEngine for MockEngine {
    fn load_pages(&mut self, pages: &[PageSpec]) -> Result<(), EngineError> {
        let mut state = self.dom.state_mut();
        state.commands.push(EngineCommand::Load(pages.len()));
        if state.fail_load {
            return Err(EngineError::Load("mock engine rejected pages".into()));
        }
        state.injected_nodes += pages.len();
        self.leaves = pages.len();
        Ok(())
    }

    fn subscribe(&mut self, sink: PositionSink) {
        self.sink = Some(sink);
    }

    fn advance(&mut self) {
        self.dom.state_mut().commands.push(EngineCommand::Advance);
        self.move_to(self.position + 1);
    }

    fn retreat(&mut self) {
        self.dom.state_mut().commands.push(EngineCommand::Retreat);
        self.move_to(self.position.saturating_sub(1));
    }

    fn go_to_leaf(&mut self, index: usize) {
        self.dom.state_mut().commands.push(EngineCommand::GoTo(index));
        self.move_to(index);
    }

    fn leaf_count(&self) -> usize {
        self.leaves
    }

    fn destroy(&mut self) -> Result<(), EngineError> {
        let mut state = self.dom.state_mut();
        state.commands.push(EngineCommand::Destroy);
        if state.fail_destroy {
            return Err(EngineError::Destroy("mock engine stuck mid-flip".into()));
        }
        state.engines_destroyed += 1;
        self.sink = None;
        Ok(())
    }
}
