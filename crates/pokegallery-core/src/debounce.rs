//! Trailing-edge debouncer.
//!
//! Each [`schedule`](Debouncer::schedule) replaces the pending value and
//! pushes the deadline out to `now + delay`. The value is released once the
//! deadline passes with no newer call. There is no leading-edge release.
//!
//! The debouncer owns no timer task. Callers poll it with
//! [`take_due`](Debouncer::take_due) and can use
//! [`deadline`](Debouncer::deadline) to size their wait. Time is
//! `tokio::time::Instant`, so paused-clock tests drive it deterministically.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing any pending one and re-arming the timer.
    pub fn schedule(&mut self, value: T) {
        self.schedule_at(value, Instant::now());
    }

    pub fn schedule_at(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Drop the pending value, if any, without releasing it.
    pub fn cancel_pending(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Release the pending value if its deadline has passed.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }
}
