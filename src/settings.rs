//! Clock settings: the records the menu edits and the persisted alarm codec.

/// Wall-clock time as the RTC stores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeParts {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Calendar date with a two-digit year (2000-2099).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DateParts {
    pub day: u8,
    pub month: u8,
    pub year: u8,
}

impl Default for DateParts {
    fn default() -> Self {
        Self {
            day: 1,
            month: 1,
            year: 0,
        }
    }
}

/// Daily alarm: hour, minute and whether it is armed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSettings {
    pub hour: u8,
    pub minute: u8,
    pub active: bool,
}

/// Persisted size of an alarm record: hour, minute, active flag.
pub const ALARM_RECORD_LEN: usize = 3;

impl AlarmSettings {
    #[must_use]
    pub const fn to_bytes(self) -> [u8; ALARM_RECORD_LEN] {
        [self.hour, self.minute, self.active as u8]
    }

    /// Decodes a persisted record, sanitizing out-of-range values to zero
    /// rather than rejecting them. Any nonzero third byte arms the alarm.
    #[must_use]
    pub fn from_bytes(bytes: [u8; ALARM_RECORD_LEN]) -> Self {
        let [mut hour, mut minute, active] = bytes;
        if hour > 23 {
            hour = 0;
        }
        if minute > 59 {
            minute = 0;
        }
        Self {
            hour,
            minute,
            active: active != 0,
        }
    }
}

/// Day of week for a date in 2000-2099, Sunday = 1 .. Saturday = 7.
///
/// Sakamoto's method; an out-of-range month answers Sunday.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "Every term is bounded well below u16::MAX for years 1999-2099."
)]
pub fn weekday_from_date(day: u8, month: u8, year: u8) -> u8 {
    const OFFSETS: [u16; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let Some(&offset) = OFFSETS.get((month as usize).wrapping_sub(1)) else {
        return 1;
    };
    let mut years = 2000u16 + u16::from(year);
    if month < 3 {
        years -= 1;
    }
    let sum = years + years / 4 - years / 100 + years / 400 + offset + u16::from(day);
    u8::try_from(sum % 7).unwrap_or_default() + 1
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Short English name for a 1-based weekday, `"???"` when out of range.
#[must_use]
pub fn weekday_name(weekday: u8) -> &'static str {
    WEEKDAY_NAMES
        .get((weekday as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("???")
}
