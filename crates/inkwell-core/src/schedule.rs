//! Deferred continuations
//!
//! Widgets never sleep. Anything that must happen "after the animation" is
//! handed to a [`Scheduler`] as a task value; the host fires it later by
//! calling back into the widget. The browser build backs this with
//! `gloo_timers`, tests with [`ManualScheduler`].

use std::time::Duration;

pub trait Scheduler<T> {
    fn schedule(&mut self, delay: Duration, task: T);
}

#[derive(Debug)]
struct Pending<T> {
    due: Duration,
    seq: u64,
    task: T,
}

/// Virtual-clock scheduler. Time only moves when the caller moves it.
#[derive(Debug)]
pub struct ManualScheduler<T> {
    now: Duration,
    seq: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for ManualScheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            seq: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> ManualScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the earliest pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove the earliest task due at or before `deadline`, moving the clock
    /// to its due time. Ties fire in scheduling order.
    pub fn pop_until(&mut self, deadline: Duration) -> Option<T> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= deadline)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let pending = self.pending.remove(index);
        self.now = self.now.max(pending.due);
        Some(pending.task)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl<T> Scheduler<T> for ManualScheduler<T> {
    fn schedule(&mut self, delay: Duration, task: T) {
        self.seq += 1;
        self.pending.push(Pending {
            due: self.now + delay,
            seq: self.seq,
            task,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tasks_fire_in_due_then_schedule_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_millis(500), "late");
        scheduler.schedule(Duration::from_millis(100), "early");
        scheduler.schedule(Duration::from_millis(100), "early-second");

        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(100)));
        assert_eq!(scheduler.pop_until(Duration::from_millis(99)), None);

        let deadline = Duration::from_millis(1000);
        assert_eq!(scheduler.pop_until(deadline), Some("early"));
        assert_eq!(scheduler.pop_until(deadline), Some("early-second"));
        assert_eq!(scheduler.now(), Duration::from_millis(100));
        assert_eq!(scheduler.pop_until(deadline), Some("late"));
        assert!(scheduler.is_idle());
    }

    #[test]
    fn test_delay_is_relative_to_virtual_now() {
        let mut scheduler = ManualScheduler::new();
        scheduler.set_now(Duration::from_millis(300));
        scheduler.schedule(Duration::from_millis(200), 1);
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(500)));
    }
}
