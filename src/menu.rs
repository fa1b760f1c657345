//! The menu state machine: what the screen shows and what each button does,
//! tick by tick.
//!
//! Transitions live in one static table mapping (state, trigger) to
//! (target, optional action); up/down never transition, they are routed to
//! the value editor while an editing state is active. Home is the initial
//! state and the terminal for every commit, cancel and timeout.

use core::fmt::Write as _;

use embassy_time::Instant;
use heapless::String;

use crate::Result;
use crate::alarm_store::AlarmStore;
use crate::ds3231::ClockChip;
use crate::editor::{Blink, EditField, step};
use crate::idle::IdleMonitor;
use crate::keypad::Button;
use crate::screen::{Glyph, Screen, print_two_digits};
use crate::settings::{AlarmSettings, DateParts, TimeParts, weekday_name};
use crate::shared_constants::{ALARM_SUMMARY_DWELL, IDLE_TIMEOUT, NOTICE_DWELL};
use crate::telemetry::Readings;

#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    #[default]
    Home,
    AlarmSummary,
    SensorSummary,
    MenuSetTime,
    MenuSetDate,
    MenuSetAlarm,
    EditHour,
    EditMinute,
    EditDay,
    EditMonth,
    EditYear,
    EditAlarmHour,
    EditAlarmMinute,
    EditAlarmOnOff,
}

impl MenuState {
    /// The field up/down adjust in this state, if it is an editing state.
    #[must_use]
    pub const fn edit_field(self) -> Option<EditField> {
        match self {
            Self::EditHour => Some(EditField::Hour),
            Self::EditMinute => Some(EditField::Minute),
            Self::EditDay => Some(EditField::Day),
            Self::EditMonth => Some(EditField::Month),
            Self::EditYear => Some(EditField::Year),
            Self::EditAlarmHour => Some(EditField::AlarmHour),
            Self::EditAlarmMinute => Some(EditField::AlarmMinute),
            Self::EditAlarmOnOff => Some(EditField::AlarmOnOff),
            _ => None,
        }
    }
}

/// Side effect attached to a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    /// Mirror the chip's time into the working buffer.
    LoadTime,
    /// Mirror the chip's date into the working buffer.
    LoadDate,
    /// Mirror the persisted alarm into the working buffer.
    LoadAlarm,
    CommitTime,
    CommitDate,
    CommitAlarm,
    Cancel,
}

struct Transition {
    from: MenuState,
    trigger: Button,
    to: MenuState,
    action: Option<Action>,
}

const fn t(from: MenuState, trigger: Button, to: MenuState) -> Transition {
    Transition {
        from,
        trigger,
        to,
        action: None,
    }
}

const fn ta(from: MenuState, trigger: Button, to: MenuState, action: Action) -> Transition {
    Transition {
        from,
        trigger,
        to,
        action: Some(action),
    }
}

/// The transition table. Triggers absent for a state are no-ops; the alarm
/// dashboard has no triggers at all, it returns home on a timed dwell.
static TRANSITIONS: [Transition; 40] = [
    t(MenuState::Home, Button::Confirm, MenuState::MenuSetTime),
    t(MenuState::Home, Button::Right, MenuState::AlarmSummary),
    t(MenuState::Home, Button::Left, MenuState::SensorSummary),
    t(MenuState::SensorSummary, Button::Back, MenuState::Home),
    t(MenuState::MenuSetTime, Button::Right, MenuState::MenuSetDate),
    ta(
        MenuState::MenuSetTime,
        Button::Confirm,
        MenuState::EditHour,
        Action::LoadTime,
    ),
    t(MenuState::MenuSetTime, Button::Back, MenuState::Home),
    t(MenuState::MenuSetDate, Button::Right, MenuState::MenuSetAlarm),
    t(MenuState::MenuSetDate, Button::Left, MenuState::MenuSetTime),
    ta(
        MenuState::MenuSetDate,
        Button::Confirm,
        MenuState::EditDay,
        Action::LoadDate,
    ),
    t(MenuState::MenuSetDate, Button::Back, MenuState::Home),
    t(MenuState::MenuSetAlarm, Button::Left, MenuState::MenuSetDate),
    ta(
        MenuState::MenuSetAlarm,
        Button::Confirm,
        MenuState::EditAlarmHour,
        Action::LoadAlarm,
    ),
    t(MenuState::MenuSetAlarm, Button::Back, MenuState::Home),
    t(MenuState::EditHour, Button::Right, MenuState::EditMinute),
    ta(
        MenuState::EditHour,
        Button::Confirm,
        MenuState::Home,
        Action::CommitTime,
    ),
    ta(
        MenuState::EditHour,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
    t(MenuState::EditMinute, Button::Left, MenuState::EditHour),
    ta(
        MenuState::EditMinute,
        Button::Confirm,
        MenuState::Home,
        Action::CommitTime,
    ),
    ta(
        MenuState::EditMinute,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
    t(MenuState::EditDay, Button::Right, MenuState::EditMonth),
    ta(
        MenuState::EditDay,
        Button::Confirm,
        MenuState::Home,
        Action::CommitDate,
    ),
    ta(
        MenuState::EditDay,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
    t(MenuState::EditMonth, Button::Left, MenuState::EditDay),
    t(MenuState::EditMonth, Button::Right, MenuState::EditYear),
    ta(
        MenuState::EditMonth,
        Button::Confirm,
        MenuState::Home,
        Action::CommitDate,
    ),
    ta(
        MenuState::EditMonth,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
    t(MenuState::EditYear, Button::Left, MenuState::EditMonth),
    ta(
        MenuState::EditYear,
        Button::Confirm,
        MenuState::Home,
        Action::CommitDate,
    ),
    ta(
        MenuState::EditYear,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
    // Alarm edits share one commit: hour, minute and the switch are saved
    // together from whichever of the three states confirm is pressed in.
    t(
        MenuState::EditAlarmHour,
        Button::Right,
        MenuState::EditAlarmMinute,
    ),
    ta(
        MenuState::EditAlarmHour,
        Button::Confirm,
        MenuState::Home,
        Action::CommitAlarm,
    ),
    ta(
        MenuState::EditAlarmHour,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
    t(
        MenuState::EditAlarmMinute,
        Button::Left,
        MenuState::EditAlarmHour,
    ),
    t(
        MenuState::EditAlarmMinute,
        Button::Right,
        MenuState::EditAlarmOnOff,
    ),
    ta(
        MenuState::EditAlarmMinute,
        Button::Confirm,
        MenuState::Home,
        Action::CommitAlarm,
    ),
    ta(
        MenuState::EditAlarmMinute,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
    t(
        MenuState::EditAlarmOnOff,
        Button::Left,
        MenuState::EditAlarmMinute,
    ),
    ta(
        MenuState::EditAlarmOnOff,
        Button::Confirm,
        MenuState::Home,
        Action::CommitAlarm,
    ),
    ta(
        MenuState::EditAlarmOnOff,
        Button::Back,
        MenuState::Home,
        Action::Cancel,
    ),
];

fn lookup(state: MenuState, trigger: Button) -> Option<&'static Transition> {
    TRANSITIONS
        .iter()
        .find(|transition| transition.from == state && transition.trigger == trigger)
}

/// Confirmation shown on the home screen for [`NOTICE_DWELL`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Notice {
    TimeSet,
    DateSet,
    AlarmSet,
    Canceled,
}

impl Notice {
    const fn text(self) -> &'static str {
        match self {
            Self::TimeSet => "Time Set!",
            Self::DateSet => "Date Set!",
            Self::AlarmSet => "Alarm Set!",
            Self::Canceled => "Canceled!",
        }
    }
}

/// The interaction controller: current state, working edit buffers, blink
/// phase, idle bookkeeping and the notice overlay.
///
/// One [`Menu::tick`] per polling period does everything: idle injection,
/// transition dispatch, value editing and the screen update for the tick.
pub struct Menu {
    state: MenuState,
    entered_at: Instant,
    idle: IdleMonitor,
    blink: Blink,
    time_value: TimeParts,
    date_value: DateParts,
    alarm_value: AlarmSettings,
    notice: Option<(Notice, Instant)>,
    chrome_drawn: bool,
}

impl Menu {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            state: MenuState::Home,
            entered_at: now,
            idle: IdleMonitor::new(now),
            blink: Blink::new(now),
            time_value: TimeParts::default(),
            date_value: DateParts::default(),
            alarm_value: AlarmSettings::default(),
            notice: None,
            chrome_drawn: false,
        }
    }

    #[must_use]
    pub const fn state(&self) -> MenuState {
        self.state
    }

    #[must_use]
    pub fn at_home(&self) -> bool {
        self.state == MenuState::Home
    }

    /// Forces a full redraw on the next tick. Called after anything outside
    /// the menu (the annunciation loop) has scribbled on the screen.
    pub fn invalidate(&mut self) {
        self.chrome_drawn = false;
    }

    /// One controller pass: consume at most one button event, fire a
    /// transition or an edit, and refresh the dynamic screen fields.
    ///
    /// # Errors
    ///
    /// A commit whose persisted write fails hands the storage error up for
    /// logging, after the screen update; the chip side of the commit has
    /// already been applied.
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "entered_at is always a past instant, so the subtraction cannot underflow."
    )]
    pub fn tick<C: ClockChip, A: AlarmStore, S: Screen>(
        &mut self,
        mut event: Option<Button>,
        now: Instant,
        repeat_active: bool,
        readings: &Readings,
        chip: &mut C,
        store: &mut A,
        screen: &mut S,
    ) -> Result<()> {
        if event.is_some() {
            self.idle.record_activity(now);
        } else if !self.at_home() && self.idle.is_idle(now, IDLE_TIMEOUT) {
            // A quiet spell away from home acts exactly like a back-press.
            event = Some(Button::Back);
            self.idle.record_activity(now);
        }

        if self.state == MenuState::AlarmSummary && now - self.entered_at >= ALARM_SUMMARY_DWELL {
            self.enter(MenuState::Home, now);
        }

        let mut outcome = Ok(());
        match (self.state.edit_field(), event) {
            (Some(field), Some(Button::Up)) => self.adjust(field, true, now),
            (Some(field), Some(Button::Down)) => self.adjust(field, false, now),
            (_, Some(button)) => {
                if let Some(transition) = lookup(self.state, button) {
                    outcome = self.apply(transition, now, chip, store);
                }
            }
            (_, None) => {}
        }

        self.render(now, repeat_active, readings, chip, store, screen);
        outcome
    }

    fn apply<C: ClockChip, A: AlarmStore>(
        &mut self,
        transition: &Transition,
        now: Instant,
        chip: &mut C,
        store: &mut A,
    ) -> Result<()> {
        self.notice = None;
        let mut outcome = Ok(());
        match transition.action {
            Some(Action::LoadTime) => self.time_value = chip.read_time(),
            Some(Action::LoadDate) => self.date_value = chip.read_date(),
            Some(Action::LoadAlarm) => self.alarm_value = store.load_alarm(),
            Some(Action::CommitTime) => {
                // Seconds are not editable; every manual set restarts them
                // at zero.
                self.time_value.second = 0;
                chip.write_time(self.time_value);
                self.set_notice(Notice::TimeSet, now);
            }
            Some(Action::CommitDate) => {
                chip.write_date(self.date_value);
                self.set_notice(Notice::DateSet, now);
            }
            Some(Action::CommitAlarm) => {
                // A storage failure is non-fatal; the chip still holds the
                // armed alarm until the next restart. The error goes up so
                // the device loop can log it.
                outcome = store.save_alarm(self.alarm_value);
                chip.set_alarm(self.alarm_value);
                self.set_notice(Notice::AlarmSet, now);
            }
            Some(Action::Cancel) => {
                // Discard: the working buffers are simply never written.
                self.set_notice(Notice::Canceled, now);
            }
            None => {}
        }
        self.enter(transition.to, now);
        outcome
    }

    #[expect(
        clippy::arithmetic_side_effects,
        reason = "Instant plus a small Duration stays far from the u64 tick range."
    )]
    fn set_notice(&mut self, notice: Notice, now: Instant) {
        self.notice = Some((notice, now + NOTICE_DWELL));
    }

    fn enter(&mut self, next: MenuState, now: Instant) {
        self.blink.reset(now);
        self.state = next;
        self.entered_at = now;
        self.idle.record_activity(now);
        self.chrome_drawn = false;
    }

    fn adjust(&mut self, field: EditField, up: bool, now: Instant) {
        self.blink.reset(now);
        let Some((min, max)) = field.bounds() else {
            // The on/off switch toggles on either adjust button.
            self.alarm_value.active = !self.alarm_value.active;
            return;
        };
        if let Some(value) = self.field_mut(field) {
            *value = step(*value, up, min, max);
        }
    }

    /// The numeric buffer a field edits; the on/off switch has none.
    fn field_mut(&mut self, field: EditField) -> Option<&mut u8> {
        match field {
            EditField::Hour => Some(&mut self.time_value.hour),
            EditField::Minute => Some(&mut self.time_value.minute),
            EditField::Day => Some(&mut self.date_value.day),
            EditField::Month => Some(&mut self.date_value.month),
            EditField::Year => Some(&mut self.date_value.year),
            EditField::AlarmHour => Some(&mut self.alarm_value.hour),
            EditField::AlarmMinute => Some(&mut self.alarm_value.minute),
            EditField::AlarmOnOff => None,
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn render<C: ClockChip, A: AlarmStore, S: Screen>(
        &mut self,
        now: Instant,
        repeat_active: bool,
        readings: &Readings,
        chip: &mut C,
        store: &mut A,
        screen: &mut S,
    ) {
        if !self.chrome_drawn {
            screen.clear();
            self.draw_chrome(store, screen);
            self.chrome_drawn = true;
        }

        match self.state {
            MenuState::Home => self.render_home(now, readings, chip, store, screen),
            MenuState::SensorSummary => render_sensor_summary(readings, screen),
            MenuState::AlarmSummary
            | MenuState::MenuSetTime
            | MenuState::MenuSetDate
            | MenuState::MenuSetAlarm => {}
            _ => self.render_edit_field(now, repeat_active, screen),
        }
    }

    /// Static chrome for the current state, drawn once on entry.
    fn draw_chrome<A: AlarmStore, S: Screen>(&mut self, store: &mut A, screen: &mut S) {
        match self.state {
            MenuState::Home => {
                if let Some((notice, _)) = self.notice {
                    screen.set_cursor(0, 4);
                    screen.print(notice.text());
                }
            }
            MenuState::AlarmSummary => {
                let alarm = store.load_alarm();
                screen.set_cursor(0, 5);
                screen.print("Alarm");
                screen.set_cursor(1, 4);
                screen.write_glyph(Glyph::Bell);
                screen.print(" ");
                print_two_digits(screen, alarm.hour);
                screen.print(":");
                print_two_digits(screen, alarm.minute);
                screen.set_cursor(1, 12);
                screen.print(if alarm.active { "ON" } else { "OFF" });
            }
            MenuState::SensorSummary => {
                screen.set_cursor(0, 0);
                screen.print("PM");
                screen.set_cursor(1, 0);
                screen.print("Hum");
            }
            MenuState::MenuSetTime => draw_menu_chrome(screen, "Set Time", false, true),
            MenuState::MenuSetDate => draw_menu_chrome(screen, "Set Date", true, true),
            MenuState::MenuSetAlarm => draw_menu_chrome(screen, "Set Alarm", true, false),
            MenuState::EditHour => {
                draw_time_edit_chrome(screen, "H");
                screen.set_cursor(1, 7);
                print_two_digits(screen, self.time_value.minute);
            }
            MenuState::EditMinute => {
                draw_time_edit_chrome(screen, "M");
                screen.set_cursor(1, 4);
                print_two_digits(screen, self.time_value.hour);
            }
            MenuState::EditDay => {
                draw_date_edit_chrome(screen);
                screen.set_cursor(1, 7);
                print_two_digits(screen, self.date_value.month);
                screen.set_cursor(1, 10);
                print_two_digits(screen, self.date_value.year);
            }
            MenuState::EditMonth => {
                draw_date_edit_chrome(screen);
                screen.set_cursor(1, 4);
                print_two_digits(screen, self.date_value.day);
                screen.set_cursor(1, 10);
                print_two_digits(screen, self.date_value.year);
            }
            MenuState::EditYear => {
                draw_date_edit_chrome(screen);
                screen.set_cursor(1, 4);
                print_two_digits(screen, self.date_value.day);
                screen.set_cursor(1, 7);
                print_two_digits(screen, self.date_value.month);
            }
            MenuState::EditAlarmHour => {
                draw_alarm_edit_chrome(screen, self.alarm_value.active);
                screen.set_cursor(1, 7);
                print_two_digits(screen, self.alarm_value.minute);
            }
            MenuState::EditAlarmMinute => {
                draw_alarm_edit_chrome(screen, self.alarm_value.active);
                screen.set_cursor(1, 4);
                print_two_digits(screen, self.alarm_value.hour);
            }
            MenuState::EditAlarmOnOff => {
                draw_alarm_edit_chrome(screen, self.alarm_value.active);
                screen.set_cursor(1, 4);
                print_two_digits(screen, self.alarm_value.hour);
                screen.set_cursor(1, 7);
                print_two_digits(screen, self.alarm_value.minute);
            }
        }
    }

    fn render_home<C: ClockChip, A: AlarmStore, S: Screen>(
        &mut self,
        now: Instant,
        readings: &Readings,
        chip: &mut C,
        store: &mut A,
        screen: &mut S,
    ) {
        if let Some((_, until)) = self.notice {
            if now < until {
                return;
            }
            self.notice = None;
            self.chrome_drawn = false;
            return;
        }

        let time = chip.read_time();
        screen.set_cursor(0, 0);
        print_two_digits(screen, time.hour);
        screen.print(":");
        print_two_digits(screen, time.minute);
        screen.print(":");
        print_two_digits(screen, time.second);

        screen.set_cursor(0, 11);
        screen.write_glyph(Glyph::Thermometer);
        print_two_digits(screen, clamp_display(readings.temperature));
        screen.write_glyph(Glyph::Degree);
        screen.print("C");

        screen.set_cursor(1, 0);
        screen.print(weekday_name(chip.weekday()));

        screen.set_cursor(1, 5);
        if store.load_alarm().active {
            screen.write_glyph(Glyph::Bell);
        } else {
            screen.print(" ");
        }

        let date = chip.read_date();
        screen.set_cursor(1, 8);
        print_two_digits(screen, date.day);
        screen.print("/");
        print_two_digits(screen, date.month);
        screen.print("/");
        print_two_digits(screen, date.year);
    }

    fn render_edit_field<S: Screen>(&mut self, now: Instant, repeat_active: bool, screen: &mut S) {
        let Some(field) = self.state.edit_field() else {
            return;
        };
        let blank = self.blink.is_blank(now, repeat_active);
        match field {
            EditField::AlarmOnOff => {
                screen.set_cursor(1, 12);
                if blank {
                    screen.print("   ");
                } else if self.alarm_value.active {
                    screen.print("ON ");
                } else {
                    screen.print("OFF");
                }
            }
            _ => {
                let column = match field {
                    EditField::Year => 10,
                    EditField::Minute | EditField::Month | EditField::AlarmMinute => 7,
                    _ => 4,
                };
                let Some(value) = self.field_mut(field).copied() else {
                    return;
                };
                screen.set_cursor(1, column);
                if blank {
                    screen.print("  ");
                } else {
                    print_two_digits(screen, value);
                }
            }
        }
    }
}

fn draw_menu_chrome<S: Screen>(screen: &mut S, label: &str, left: bool, right: bool) {
    screen.set_cursor(0, 6);
    screen.print("MENU");
    screen.set_cursor(1, 4);
    screen.print(label);
    if left {
        screen.set_cursor(1, 0);
        screen.write_glyph(Glyph::ArrowLeft);
    }
    if right {
        screen.set_cursor(1, 15);
        screen.write_glyph(Glyph::ArrowRight);
    }
}

fn draw_time_edit_chrome<S: Screen>(screen: &mut S, marker: &str) {
    screen.set_cursor(0, 4);
    screen.print("Set Time:");
    screen.set_cursor(1, 6);
    screen.print(":");
    screen.set_cursor(1, 10);
    screen.print(marker);
}

fn draw_date_edit_chrome<S: Screen>(screen: &mut S) {
    screen.set_cursor(0, 4);
    screen.print("Set Date:");
    screen.set_cursor(1, 6);
    screen.print("/");
    screen.set_cursor(1, 9);
    screen.print("/");
}

fn draw_alarm_edit_chrome<S: Screen>(screen: &mut S, active: bool) {
    screen.set_cursor(0, 4);
    screen.print("Set Alarm:");
    screen.set_cursor(1, 6);
    screen.print(":");
    screen.set_cursor(1, 12);
    screen.print(if active { "ON" } else { "OFF" });
}

fn render_sensor_summary<S: Screen>(readings: &Readings, screen: &mut S) {
    screen.set_cursor(0, 3);
    print_u16_padded(screen, readings.pm1_0);
    screen.print(" ");
    print_u16_padded(screen, readings.pm2_5);
    screen.print(" ");
    print_u16_padded(screen, readings.pm10_0);
    screen.set_cursor(1, 4);
    print_u16_padded(screen, clamp_display(readings.humidity).into());
    screen.print("%");
}

/// Right-aligned in three cells so columns stay put as values change.
fn print_u16_padded<S: Screen>(screen: &mut S, value: u16) {
    let mut text: String<8> = String::new();
    if write!(text, "{:>3}", value.min(999)).is_ok() {
        screen.print(&text);
    }
}

/// Negative or three-digit readings clamp to the two display cells.
fn clamp_display(value: i16) -> u8 {
    u8::try_from(value.clamp(0, 99)).unwrap_or_default()
}
