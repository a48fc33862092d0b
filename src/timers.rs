//! [`Scheduler`] backed by browser timeouts

use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use inkwell_core::Scheduler;

/// Fires each task through `fire` once its delay has passed.
///
/// Timeouts are never cancelled; receivers discard tasks that went stale.
pub struct TimeoutScheduler<T> {
    fire: Rc<dyn Fn(T)>,
}

impl<T: 'static> TimeoutScheduler<T> {
    pub fn new(fire: impl Fn(T) + 'static) -> Self {
        Self { fire: Rc::new(fire) }
    }
}

impl<T: 'static> Scheduler<T> for TimeoutScheduler<T> {
    fn schedule(&mut self, delay: Duration, task: T) {
        let fire = Rc::clone(&self.fire);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || fire(task)).forget();
    }
}

/// Run `f` once the current call stack has unwound.
pub fn defer(f: impl FnOnce() + 'static) {
    Timeout::new(0, f).forget();
}
