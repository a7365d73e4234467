//! Minimum-interval gate for idle-task draining.

use std::time::{Duration, Instant};

/// Limits how often the load queue is drained while the observer moves.
///
/// A stationary observer drains every time; a moving one at most once per
/// `min_interval`.
#[derive(Clone, Debug)]
pub struct DrainThrottle {
    min_interval: Duration,
    last_drain: Option<Instant>,
}

impl DrainThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_drain: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Returns `true` and records a drain at `now` if draining is allowed.
    pub fn should_drain(&mut self, now: Instant, moving: bool) -> bool {
        let due = match self.last_drain {
            None => true,
            Some(_) if !moving => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if due {
            self.last_drain = Some(now);
        }
        due
    }

    /// Forgets the last drain so the next check passes.
    pub fn reset(&mut self) {
        self.last_drain = None;
    }
}
