//! Host-level tests for the menu controller: transitions, editing, commit
//! and cancel semantics, idle fallback and screen layout.

#![expect(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "Fixed test instants and known screen positions cannot go out of range."
)]

mod common;

use airclock::keypad::{Button, KeyLevels, Keypad};
use airclock::menu::{Menu, MenuState};
use airclock::settings::{AlarmSettings, DateParts, TimeParts};
use airclock::telemetry::Readings;
use common::{FakeAlarmStore, FakeClockChip, FakeScreen};
use embassy_time::{Duration, Instant};

/// One controller plus its fakes, ticking at the firmware's 100 ms cadence.
struct Rig {
    menu: Menu,
    chip: FakeClockChip,
    store: FakeAlarmStore,
    screen: FakeScreen,
    readings: Readings,
    now: Instant,
}

impl Rig {
    fn new() -> Self {
        let now = Instant::from_ticks(0);
        Self {
            menu: Menu::new(now),
            chip: FakeClockChip::default(),
            store: FakeAlarmStore::default(),
            screen: FakeScreen::new(),
            readings: Readings::default(),
            now,
        }
    }

    fn tick_after(&mut self, elapsed: Duration, event: Option<Button>) {
        self.now += elapsed;
        let _ = self.try_tick(event);
    }

    fn try_tick(&mut self, event: Option<Button>) -> airclock::Result<()> {
        self.menu.tick(
            event,
            self.now,
            false,
            &self.readings,
            &mut self.chip,
            &mut self.store,
            &mut self.screen,
        )
    }

    fn tick(&mut self, event: Option<Button>) {
        self.tick_after(Duration::from_millis(100), event);
    }

    fn press(&mut self, button: Button) {
        self.tick(Some(button));
    }
}

#[test]
fn untabled_triggers_are_no_ops() {
    let mut rig = Rig::new();

    rig.press(Button::Back);
    assert_eq!(rig.menu.state(), MenuState::Home);
    rig.press(Button::Up);
    assert_eq!(rig.menu.state(), MenuState::Home);

    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::MenuSetTime);
    rig.press(Button::Left);
    assert_eq!(rig.menu.state(), MenuState::MenuSetTime);
    rig.press(Button::Up);
    assert_eq!(rig.menu.state(), MenuState::MenuSetTime);
}

#[test]
fn menu_walk_reaches_each_editor() {
    let mut rig = Rig::new();

    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::MenuSetTime);
    rig.press(Button::Right);
    assert_eq!(rig.menu.state(), MenuState::MenuSetDate);
    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::EditDay);
    rig.press(Button::Back);
    assert_eq!(rig.menu.state(), MenuState::Home);

    rig.press(Button::Confirm);
    rig.press(Button::Right);
    rig.press(Button::Right);
    assert_eq!(rig.menu.state(), MenuState::MenuSetAlarm);
    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::EditAlarmHour);
}

#[test]
fn commit_time_resets_seconds() {
    let mut rig = Rig::new();
    rig.chip.time = TimeParts {
        hour: 8,
        minute: 30,
        second: 45,
    };

    rig.press(Button::Confirm);
    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::EditHour);
    rig.press(Button::Up);
    rig.press(Button::Up);
    rig.press(Button::Confirm);

    assert_eq!(rig.menu.state(), MenuState::Home);
    assert_eq!(rig.chip.time_writes, 1);
    assert_eq!(
        rig.chip.time,
        TimeParts {
            hour: 10,
            minute: 30,
            second: 0,
        }
    );
    assert!(rig.screen.row_text(0).contains("Time Set!"));
}

#[test]
fn cancel_discards_edits() {
    let mut rig = Rig::new();
    rig.chip.time = TimeParts {
        hour: 8,
        minute: 30,
        second: 0,
    };

    rig.press(Button::Confirm);
    rig.press(Button::Confirm);
    rig.press(Button::Up);
    rig.press(Button::Back);

    assert_eq!(rig.menu.state(), MenuState::Home);
    assert_eq!(rig.chip.time_writes, 0);
    assert!(rig.screen.row_text(0).contains("Canceled!"));
}

#[test]
fn day_wraps_past_both_ends() {
    let mut rig = Rig::new();
    rig.chip.date = DateParts {
        day: 31,
        month: 1,
        year: 26,
    };

    rig.press(Button::Confirm);
    rig.press(Button::Right);
    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::EditDay);

    rig.press(Button::Up); // 31 -> 1
    rig.press(Button::Down); // 1 -> 31
    for _ in 0..31 {
        rig.press(Button::Up); // a full lap lands back on 31
    }
    rig.press(Button::Confirm);

    assert_eq!(rig.chip.date_writes, 1);
    assert_eq!(rig.chip.date.day, 31);
    assert!(rig.screen.row_text(0).contains("Date Set!"));
}

#[test]
fn alarm_toggle_commits_to_store_and_chip() {
    let mut rig = Rig::new();
    rig.store.stored = AlarmSettings {
        hour: 6,
        minute: 30,
        active: false,
    };

    rig.press(Button::Confirm);
    rig.press(Button::Right);
    rig.press(Button::Right);
    rig.press(Button::Confirm);
    rig.press(Button::Right);
    rig.press(Button::Right);
    assert_eq!(rig.menu.state(), MenuState::EditAlarmOnOff);
    rig.press(Button::Up);
    rig.press(Button::Confirm);

    let expected = AlarmSettings {
        hour: 6,
        minute: 30,
        active: true,
    };
    assert_eq!(rig.store.saves, 1);
    assert_eq!(rig.store.stored, expected);
    assert_eq!(rig.chip.alarm, Some(expected));
    assert!(rig.screen.row_text(0).contains("Alarm Set!"));
}

#[test]
fn storage_failure_still_arms_the_chip_and_surfaces_the_error() {
    let mut rig = Rig::new();
    rig.store.fail_saves = true;

    rig.press(Button::Confirm);
    rig.press(Button::Right);
    rig.press(Button::Right);
    rig.press(Button::Confirm);

    rig.now += Duration::from_millis(100);
    let outcome = rig.try_tick(Some(Button::Confirm));

    assert!(outcome.is_err());
    assert_eq!(rig.menu.state(), MenuState::Home);
    assert!(rig.chip.alarm.is_some());
    assert!(rig.screen.row_text(0).contains("Alarm Set!"));
}

#[test]
fn onoff_adjust_never_touches_the_minute() {
    let mut rig = Rig::new();
    rig.store.stored = AlarmSettings {
        hour: 6,
        minute: 45,
        active: false,
    };

    rig.press(Button::Confirm);
    rig.press(Button::Right);
    rig.press(Button::Right);
    rig.press(Button::Confirm);
    rig.press(Button::Right);
    rig.press(Button::Right);
    assert_eq!(rig.menu.state(), MenuState::EditAlarmOnOff);

    rig.press(Button::Up);
    rig.press(Button::Down);
    rig.press(Button::Up);
    rig.press(Button::Confirm);

    assert_eq!(
        rig.store.stored,
        AlarmSettings {
            hour: 6,
            minute: 45,
            active: true,
        }
    );
}

#[test]
fn silencing_press_does_not_leak_into_the_menu() {
    let mut rig = Rig::new();
    let mut keypad = Keypad::new();

    for _ in 0..3 {
        let event = keypad.poll(&KeyLevels::none(), rig.now);
        rig.tick(event);
    }

    // The alarm fires; the annunciation loop consumes a raw confirm press
    // and the classifier adopts the held levels afterwards.
    let held = KeyLevels::none().with(Button::Confirm);
    keypad.sync(&held, rig.now);

    // The button is still held on the following ticks; no press may reach
    // the menu until it is released and pressed again.
    for _ in 0..3 {
        let event = keypad.poll(&held, rig.now);
        rig.tick(event);
    }
    assert_eq!(rig.menu.state(), MenuState::Home);
}

#[test]
fn idle_away_from_home_acts_as_back() {
    let mut rig = Rig::new();
    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::MenuSetTime);

    rig.tick_after(Duration::from_millis(10_100), None);
    assert_eq!(rig.menu.state(), MenuState::Home);
}

#[test]
fn idle_never_fires_at_home() {
    let mut rig = Rig::new();
    rig.tick_after(Duration::from_secs(60), None);
    assert_eq!(rig.menu.state(), MenuState::Home);
}

#[test]
fn alarm_dashboard_returns_after_dwell() {
    let mut rig = Rig::new();
    rig.store.stored = AlarmSettings {
        hour: 7,
        minute: 15,
        active: true,
    };

    rig.press(Button::Right);
    assert_eq!(rig.menu.state(), MenuState::AlarmSummary);
    assert!(rig.screen.row_text(0).contains("Alarm"));
    assert!(rig.screen.row_text(1).contains("07:15"));
    assert!(rig.screen.row_text(1).contains("ON"));

    rig.tick_after(Duration::from_millis(2_000), None);
    assert_eq!(rig.menu.state(), MenuState::AlarmSummary);
    rig.tick_after(Duration::from_millis(1_100), None);
    assert_eq!(rig.menu.state(), MenuState::Home);
}

#[test]
fn notice_expires_back_to_the_clock() {
    let mut rig = Rig::new();
    rig.chip.time = TimeParts {
        hour: 9,
        minute: 0,
        second: 0,
    };

    rig.press(Button::Confirm);
    rig.press(Button::Confirm);
    rig.press(Button::Confirm);
    assert!(rig.screen.row_text(0).contains("Time Set!"));

    rig.tick_after(Duration::from_millis(1_100), None);
    rig.tick(None);
    assert!(rig.screen.row_text(0).starts_with("09:00:0"));
}

#[test]
fn home_screen_layout() {
    let mut rig = Rig::new();
    rig.chip.time = TimeParts {
        hour: 12,
        minute: 34,
        second: 56,
    };
    // 2026-08-25 is a Tuesday.
    rig.chip.date = DateParts {
        day: 25,
        month: 8,
        year: 26,
    };
    rig.store.stored = AlarmSettings {
        hour: 7,
        minute: 0,
        active: true,
    };
    rig.readings.temperature = 23;

    rig.tick(None);
    assert_eq!(rig.screen.row_text(0), "12:34:56   #23\u{b0}C");
    assert_eq!(rig.screen.row_text(1), "Tue  *  25/08/26");
}

#[test]
fn sensor_summary_layout() {
    let mut rig = Rig::new();
    rig.readings = Readings {
        humidity: 47,
        temperature: 23,
        pm1_0: 5,
        pm2_5: 12,
        pm10_0: 18,
    };

    rig.press(Button::Left);
    assert_eq!(rig.menu.state(), MenuState::SensorSummary);
    assert_eq!(rig.screen.row_text(0), "PM   5  12  18  ");
    assert_eq!(rig.screen.row_text(1), "Hum  47%        ");

    rig.press(Button::Back);
    assert_eq!(rig.menu.state(), MenuState::Home);
}

#[test]
fn edit_field_blinks_and_edits_restore_visibility() {
    let mut rig = Rig::new();
    rig.chip.time = TimeParts {
        hour: 8,
        minute: 30,
        second: 0,
    };

    rig.press(Button::Confirm);
    rig.press(Button::Confirm);
    assert_eq!(rig.menu.state(), MenuState::EditHour);
    let row = rig.screen.row_text(1);
    assert!(row.contains("08"));
    assert!(row.contains(":30"));
    assert!(row.contains('H'));

    // No input for three ticks crosses the blink period; the field blanks.
    rig.tick(None);
    rig.tick(None);
    rig.tick(None);
    assert_eq!(&rig.screen.row_text(1)[4..6], "  ");

    // An edit snaps it back to visible with the new value.
    rig.press(Button::Up);
    assert_eq!(&rig.screen.row_text(1)[4..6], "09");
}
