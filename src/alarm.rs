//! The alarm latch: a single flag set from interrupt context when the RTC's
//! alarm line fires, consumed by the UI-loop task after confirming against
//! the chip itself.

use portable_atomic::{AtomicBool, Ordering};

use crate::ds3231::ClockChip;

/// Edge-latched alarm-pending flag.
///
/// `raise` runs in interrupt context and never blocks; `take` is an atomic
/// swap so a raise that lands mid-consume is either seen now or kept for the
/// next check, never lost. Raising while already raised coalesces.
pub struct AlarmLatch {
    raised: AtomicBool,
}

impl AlarmLatch {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Clears the latch, answering whether it was raised.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::AcqRel)
    }
}

impl Default for AlarmLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumes the latch and confirms the alarm against the RTC's own fired
/// flag, filtering stale or bounced edges. A latched-but-unconfirmed alarm
/// is dropped without annunciation. Confirming also clears the chip's flag,
/// which re-arms the daily match.
pub fn take_confirmed<C: ClockChip>(latch: &AlarmLatch, chip: &mut C) -> bool {
    latch.take() && chip.alarm_asserted()
}

#[cfg(feature = "pico")]
pub use watcher::alarm_watch_task;

#[cfg(feature = "pico")]
mod watcher {
    use embassy_rp::gpio::Input;

    use super::AlarmLatch;

    /// Minimal high-priority task standing in for a pin interrupt handler:
    /// it only awaits the RTC's active-low alarm line and sets the latch.
    #[embassy_executor::task]
    pub async fn alarm_watch_task(mut line: Input<'static>, latch: &'static AlarmLatch) -> ! {
        loop {
            line.wait_for_falling_edge().await;
            latch.raise();
        }
    }
}
