//! Tracks the last user activity so the menu can fall back to the home
//! screen after a quiet spell.

use embassy_time::{Duration, Instant};

pub struct IdleMonitor {
    last_activity: Instant,
}

impl IdleMonitor {
    #[must_use]
    pub const fn new(now: Instant) -> Self {
        Self { last_activity: now }
    }

    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// Whether the threshold has elapsed since the last recorded activity.
    /// The caller applies the not-at-home condition.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "last_activity is always a past instant, so the subtraction cannot underflow."
    )]
    pub fn is_idle(&self, now: Instant, threshold: Duration) -> bool {
        now - self.last_activity > threshold
    }
}
