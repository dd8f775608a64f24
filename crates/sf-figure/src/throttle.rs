//! Drop-within-cooldown event throttle.

use std::time::Duration;

/// Accepts an event only if at least `cooldown` has elapsed since the last
/// accepted one. Rejected events are dropped, never replayed.
///
/// Timestamps come from a monotonic [`sf_core::Clock`]. The window is
/// anchored at construction, so the first event is subject to the cooldown
/// too.
#[derive(Debug, Clone, Copy)]
pub struct Throttle {
    cooldown: Duration,
    last: Duration,
}

impl Throttle {
    pub fn new(cooldown: Duration, now: Duration) -> Self {
        Self {
            cooldown,
            last: now,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Restart the window at `now` without accepting an event.
    pub fn rearm(&mut self, now: Duration) {
        self.last = now;
    }

    /// Returns true and records `now` if the event passes.
    pub fn try_accept(&mut self, now: Duration) -> bool {
        if now.saturating_sub(self.last) < self.cooldown {
            return false;
        }
        self.last = now;
        true
    }
}
