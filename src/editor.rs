//! Value editing: wraparound stepping within per-field ranges and the blink
//! cadence that marks the field being edited.

use embassy_time::Instant;

use crate::shared_constants::BLINK_PERIOD;

/// Which value the up/down buttons currently adjust. Derived from the menu
/// state; there is no separate cursor object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditField {
    Hour,
    Minute,
    Day,
    Month,
    Year,
    AlarmHour,
    AlarmMinute,
    AlarmOnOff,
}

impl EditField {
    /// Inclusive (min, max) for numeric fields; `None` for the on/off toggle.
    ///
    /// Day is 1-31 with no month-length validation; out-of-calendar
    /// combinations are accepted as-is.
    #[must_use]
    pub const fn bounds(self) -> Option<(u8, u8)> {
        match self {
            Self::Hour | Self::AlarmHour => Some((0, 23)),
            Self::Minute | Self::AlarmMinute => Some((0, 59)),
            Self::Day => Some((1, 31)),
            Self::Month => Some((1, 12)),
            Self::Year => Some((0, 99)),
            Self::AlarmOnOff => None,
        }
    }
}

/// Steps a value one up or down, wrapping past either end of `min..=max`.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "The wrap guards keep value strictly inside u8 before the increment or decrement."
)]
pub const fn step(value: u8, up: bool, min: u8, max: u8) -> u8 {
    if up {
        if value >= max { min } else { value + 1 }
    } else if value <= min {
        max
    } else {
        value - 1
    }
}

/// Blink phase for the edited field: alternates visible/blank at a fixed
/// cadence, forced visible while auto-repeat is running so the moving value
/// stays legible.
pub struct Blink {
    visible: bool,
    flipped_at: Instant,
}

impl Blink {
    #[must_use]
    pub const fn new(now: Instant) -> Self {
        Self {
            visible: true,
            flipped_at: now,
        }
    }

    /// Back to visible with a fresh cadence. Every edit calls this.
    pub fn reset(&mut self, now: Instant) {
        self.visible = true;
        self.flipped_at = now;
    }

    /// Advances the phase and answers whether the field renders blank this
    /// tick.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "flipped_at is always a past instant, so the subtraction cannot underflow."
    )]
    pub fn is_blank(&mut self, now: Instant, repeat_active: bool) -> bool {
        if repeat_active {
            self.reset(now);
            return false;
        }
        if now - self.flipped_at >= BLINK_PERIOD {
            self.visible = !self.visible;
            self.flipped_at = now;
        }
        !self.visible
    }
}
