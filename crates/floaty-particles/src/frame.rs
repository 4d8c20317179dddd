//! Frame timing: clocks and the re-entry gate around the frame callback.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

/// Source of frame timestamps in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    /// Move the clock by `ms` (which may be negative to simulate skew).
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

const IDLE: u8 = 0;
const RENDERING: u8 = 1;

/// State machine guarding the frame callback against overlapping entry.
///
/// `Idle -> Rendering` is a single atomic check-and-set. A caller that loses
/// the race gets `None` and must return without doing any work.
#[derive(Debug, Default)]
pub struct FrameGate {
    state: AtomicU8,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start rendering. The returned ticket moves the gate back to idle on drop.
    pub fn try_enter(&self) -> Option<FrameTicket<'_>> {
        self.state
            .compare_exchange(IDLE, RENDERING, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| FrameTicket { gate: self })
    }

    pub fn is_rendering(&self) -> bool {
        self.state.load(Ordering::Acquire) == RENDERING
    }
}

/// Proof that the holder is the only one rendering.
#[derive(Debug)]
pub struct FrameTicket<'a> {
    gate: &'a FrameGate,
}

impl Drop for FrameTicket<'_> {
    fn drop(&mut self) {
        self.gate.state.store(IDLE, Ordering::Release);
    }
}
