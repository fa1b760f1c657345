//! Shared fakes for the host-level controller tests.

#![expect(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "Counters and fixed-size buffers in test fakes."
)]
#![allow(dead_code, reason = "Each test binary uses a subset of the fakes.")]

use airclock::alarm_store::AlarmStore;
use airclock::ds3231::ClockChip;
use airclock::publish::Publisher;
use airclock::screen::{Glyph, Screen};
use airclock::settings::{AlarmSettings, DateParts, TimeParts, weekday_from_date};
use airclock::{Error, Result};

/// In-memory clock chip that records writes.
#[derive(Default)]
pub struct FakeClockChip {
    pub time: TimeParts,
    pub date: DateParts,
    pub alarm: Option<AlarmSettings>,
    pub alarm_flag: bool,
    pub time_writes: usize,
    pub date_writes: usize,
}

impl ClockChip for FakeClockChip {
    fn read_time(&mut self) -> TimeParts {
        self.time
    }

    fn write_time(&mut self, time: TimeParts) {
        self.time = time;
        self.time_writes += 1;
    }

    fn read_date(&mut self) -> DateParts {
        self.date
    }

    fn write_date(&mut self, date: DateParts) {
        self.date = date;
        self.date_writes += 1;
    }

    fn set_alarm(&mut self, alarm: AlarmSettings) {
        self.alarm = Some(alarm);
    }

    fn alarm_asserted(&mut self) -> bool {
        core::mem::take(&mut self.alarm_flag)
    }

    fn weekday(&mut self) -> u8 {
        weekday_from_date(self.date.day, self.date.month, self.date.year)
    }
}

/// In-memory alarm store that records saves and can be told to fail them.
#[derive(Default)]
pub struct FakeAlarmStore {
    pub stored: AlarmSettings,
    pub saves: usize,
    pub fail_saves: bool,
}

impl AlarmStore for FakeAlarmStore {
    fn load_alarm(&mut self) -> AlarmSettings {
        self.stored
    }

    fn save_alarm(&mut self, alarm: AlarmSettings) -> Result<()> {
        if self.fail_saves {
            return Err(Error::FormatError);
        }
        self.stored = alarm;
        self.saves += 1;
        Ok(())
    }
}

/// 16x2 character buffer. Glyphs render as markers no text uses, so
/// assertions can match on whole rows.
pub struct FakeScreen {
    cells: [[char; 16]; 2],
    row: usize,
    col: usize,
    pub backlight_on: bool,
    pub clears: usize,
}

impl FakeScreen {
    pub fn new() -> Self {
        Self {
            cells: [[' '; 16]; 2],
            row: 0,
            col: 0,
            backlight_on: true,
            clears: 0,
        }
    }

    pub fn row_text(&self, row: usize) -> String {
        self.cells[row].iter().collect()
    }

    fn put(&mut self, ch: char) {
        if let Some(cell) = self
            .cells
            .get_mut(self.row)
            .and_then(|cells| cells.get_mut(self.col))
        {
            *cell = ch;
        }
        self.col += 1;
    }
}

impl Screen for FakeScreen {
    fn clear(&mut self) {
        self.cells = [[' '; 16]; 2];
        self.row = 0;
        self.col = 0;
        self.clears += 1;
    }

    fn set_cursor(&mut self, row: u8, col: u8) {
        self.row = row as usize;
        self.col = col as usize;
    }

    fn print(&mut self, text: &str) {
        for ch in text.chars() {
            self.put(ch);
        }
    }

    fn write_glyph(&mut self, glyph: Glyph) {
        let marker = match glyph {
            Glyph::Bell => '*',
            Glyph::Thermometer => '#',
            Glyph::ArrowLeft => '<',
            Glyph::ArrowRight => '>',
            Glyph::Degree => '\u{b0}',
        };
        self.put(marker);
    }

    fn backlight(&mut self, on: bool) {
        self.backlight_on = on;
    }
}

/// Publisher that records deliveries and can fail on demand.
#[derive(Default)]
pub struct FakePublisher {
    pub up: bool,
    pub connects: usize,
    pub fail_connect: bool,
    pub published: Vec<(String, String)>,
}

impl Publisher for FakePublisher {
    async fn connect(&mut self) -> Result<()> {
        self.connects += 1;
        if self.fail_connect {
            return Err(Error::NotConnected);
        }
        self.up = true;
        Ok(())
    }

    fn connected(&self) -> bool {
        self.up
    }

    async fn publish(&mut self, topic: &str, payload: &str) -> Result<()> {
        self.published.push((topic.to_owned(), payload.to_owned()));
        Ok(())
    }
}
