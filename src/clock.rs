//! Elapsed-time bookkeeping.
//!
//! Elapsed time is always recomputed from instants; refresh ticks never
//! advance it, so late or dropped ticks cannot cause drift.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::time_format::Millis;

/// Source of "now".
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_ms(&self, ms: Millis) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Accumulated time plus the instant the current running window began.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stopwatch {
    accumulated: Duration,
    resumed_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl Stopwatch {
    pub fn is_running(&self) -> bool {
        self.resumed_at.is_some()
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn stopped_at(&self) -> Option<Instant> {
        self.stopped_at
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.resumed_at {
            Some(resumed) => self.accumulated + now.saturating_duration_since(resumed),
            None => self.accumulated,
        }
    }

    pub fn elapsed_ms(&self, now: Instant) -> Millis {
        Millis::try_from(self.elapsed(now).as_millis()).unwrap_or(Millis::MAX)
    }

    pub fn resume(&mut self, now: Instant) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(now);
        }
    }

    /// Fold the running window into the accumulated time.
    pub fn suspend(&mut self, now: Instant) {
        if let Some(resumed) = self.resumed_at.take() {
            self.accumulated += now.saturating_duration_since(resumed);
        }
    }

    /// Suspend and remember when, so the gap can be recovered later.
    pub fn stop(&mut self, now: Instant) {
        if self.is_running() {
            self.stopped_at = Some(now);
            self.suspend(now);
        }
    }

    /// Count the time since `stop` as if the watch never stopped.
    pub fn carry_over(&mut self, now: Instant) {
        if let Some(stopped) = self.stopped_at.take() {
            self.accumulated += now.saturating_duration_since(stopped);
        }
    }
}
