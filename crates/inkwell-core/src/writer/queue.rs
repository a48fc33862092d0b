use std::time::Duration;

use tracing::debug;

use super::{Completion, TypingPlan, WriterMode, WriterPhase, WriterSimulator};
use crate::config::WriterConfig;
use crate::schedule::Scheduler;

/// Pause between one entry finishing and the next one starting.
pub const NEXT_ENTRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueTask {
    /// Look for the next visible entry; fire with [`WriterQueue::start_next`].
    StartNext,
}

/// Whether a vertical extent overlaps the viewport at all.
pub fn is_in_viewport(top: f64, bottom: f64, viewport_height: f64) -> bool {
    top < viewport_height && bottom > 0.0
}

/// Runs essay animations one at a time, in page order.
pub struct WriterQueue<T: Scheduler<QueueTask>> {
    config: WriterConfig,
    entries: Vec<WriterSimulator>,
    current: Option<usize>,
    scheduler: T,
}

impl<T: Scheduler<QueueTask>> WriterQueue<T> {
    pub fn new(config: WriterConfig, scheduler: T) -> Self {
        Self {
            config,
            entries: Vec::new(),
            current: None,
            scheduler,
        }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Register an entry; returns its index.
    pub fn add(&mut self, text: impl Into<String>, preset: Option<&str>) -> usize {
        let sim = WriterSimulator::new(text, preset, &self.config);
        self.entries.push(sim);
        self.entries.len() - 1
    }

    pub fn entry(&self, index: usize) -> Option<&WriterSimulator> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }

    pub fn select_mode(&mut self, index: usize, mode: WriterMode) -> bool {
        self.entries
            .get_mut(index)
            .is_some_and(|sim| sim.select_mode(mode))
    }

    /// Start the first waiting entry that `visible` accepts, unless one is
    /// already typing or animations are disabled.
    pub fn start_next(&mut self, visible: impl Fn(usize) -> bool) -> Option<(usize, TypingPlan)> {
        if self.current.is_some() || !self.config.enabled {
            return None;
        }
        let index = self
            .entries
            .iter()
            .enumerate()
            .find(|(i, sim)| sim.phase() == WriterPhase::Waiting && visible(*i))
            .map(|(i, _)| i)?;
        let plan = self.entries[index].start(&self.config)?;
        self.current = Some(index);
        debug!(entry = index, "Writer queue started entry");
        Some((index, plan))
    }

    /// Typing for `index` ran to the end.
    pub fn complete(&mut self, index: usize) -> Option<Completion> {
        let done = self.entries.get_mut(index)?.complete()?;
        self.release(index);
        Some(done)
    }

    /// Show `index` in full. Only frees the slot if `index` held it.
    pub fn skip(&mut self, index: usize) -> Option<Completion> {
        let done = self.entries.get_mut(index)?.skip()?;
        self.release(index);
        Some(done)
    }

    fn release(&mut self, index: usize) {
        if self.current == Some(index) {
            self.current = None;
            self.scheduler.schedule(NEXT_ENTRY_DELAY, QueueTask::StartNext);
        }
    }
}
