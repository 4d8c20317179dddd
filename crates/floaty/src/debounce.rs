//! Debouncing for UI inputs.

use std::time::{Duration, Instant};

/// Collapses bursts of calls into a leading and a trailing delivery.
///
/// The first call in a quiet period is delivered immediately. Every call
/// (re)arms a timer; when it runs out without further calls, the latest
/// value is delivered once more through [`poll`](Self::poll).
#[derive(Debug)]
pub struct Debouncer<T> {
    wait: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T: Clone> Debouncer<T> {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
            pending: None,
        }
    }

    /// Register a call. Returns the value when it should be applied right away.
    pub fn call(&mut self, value: T, now: Instant) -> Option<T> {
        let leading = self.deadline.is_none();
        self.deadline = Some(now + self.wait);
        self.pending = Some(value.clone());
        leading.then_some(value)
    }

    /// Deliver the trailing value once the wait has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// When the trailing value is due, if one is pending.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
