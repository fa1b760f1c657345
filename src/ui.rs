//! The UI-loop task: one tick at a time it polls sensors, consumes the alarm
//! latch, classifies input and runs the menu controller.

#![cfg(feature = "pico")]

use defmt::{Debug2Format, info, warn};
use embassy_rp::gpio::Output;
use embassy_time::{Instant, Ticker, Timer};

use crate::alarm::{AlarmLatch, take_confirmed};
use crate::alarm_store::FlashAlarmStore;
use crate::dht22::{Dht22, EnvSensor as _};
use crate::ds3231::Ds3231;
use crate::keypad::{Keypad, KeypadPins};
use crate::lcd::Lcd;
use crate::menu::Menu;
use crate::particulate::PmFrames;
use crate::screen::Screen;
use crate::shared_constants::{
    ANNUNCIATE_HALF_PERIOD, ANNUNCIATE_MAX_CYCLES, ENV_POLL_PERIOD, SPLASH_DWELL, TICK_PERIOD,
};
use crate::telemetry::{Readings, TelemetryStore};

const DEVICE_NAME: &str = "AirClock";

/// Everything interactive happens here, serialized on one task: the menu is
/// the sole screen writer and the telemetry store's sole writer, so no state
/// needs locking beyond the store itself.
#[expect(
    clippy::arithmetic_side_effects,
    reason = "Instant plus a small Duration stays far from the u64 tick range."
)]
#[embassy_executor::task]
pub async fn ui_task(
    pins: KeypadPins,
    mut buzzer: Output<'static>,
    mut lcd: Lcd,
    mut rtc: Ds3231,
    mut store: FlashAlarmStore,
    mut env: Dht22,
    latch: &'static AlarmLatch,
    frames: &'static PmFrames,
    telemetry: &'static TelemetryStore,
) -> ! {
    lcd.clear();
    lcd.set_cursor(0, 4);
    lcd.print(DEVICE_NAME);
    Timer::after(SPLASH_DWELL).await;

    let mut keypad = Keypad::new();
    let mut menu = Menu::new(Instant::now());
    let mut readings = Readings::default();
    let mut next_env_poll = Instant::now();

    let mut ticker = Ticker::every(TICK_PERIOD);
    loop {
        ticker.next().await;
        let now = Instant::now();

        // The DHT22 conversion blocks ~5 ms; pacing it keeps the tick light.
        if now >= next_env_poll {
            let (humidity, temperature) = env.read();
            readings.humidity = humidity;
            readings.temperature = temperature;
            next_env_poll = now + ENV_POLL_PERIOD;
        }
        if let Some(frame) = frames.try_take() {
            readings.pm1_0 = frame.pm1_0;
            readings.pm2_5 = frame.pm2_5;
            readings.pm10_0 = frame.pm10_0;
        }
        telemetry.update(readings);

        // Alarms annunciate only from the home screen; while editing, the
        // latch just stays raised until the menu returns home.
        if menu.at_home() && take_confirmed(latch, &mut rtc) {
            annunciate(&pins, &mut buzzer, &mut lcd).await;
            // The silencing press was consumed raw; adopt the held levels
            // so it does not replay as a menu press.
            keypad.sync(&pins.read(), Instant::now());
            menu.invalidate();
        }

        let event = keypad.poll(&pins.read(), now);
        let repeat_active = keypad.repeat_active();
        let outcome = menu.tick(
            event,
            now,
            repeat_active,
            &readings,
            &mut rtc,
            &mut store,
            &mut lcd,
        );
        if let Err(err) = outcome {
            warn!("Settings save failed: {}", Debug2Format(&err));
        }
    }
}

/// Pulses the buzzer and flashes the backlight until confirm is pressed or
/// the cycle budget runs out. The raw confirm level is polled between
/// half-periods; the debouncer is not involved.
async fn annunciate(pins: &KeypadPins, buzzer: &mut Output<'static>, screen: &mut impl Screen) {
    info!("Alarm fired, annunciating");
    for _ in 0..ANNUNCIATE_MAX_CYCLES {
        if pins.confirm_pressed() {
            break;
        }
        buzzer.set_high();
        screen.backlight(false);
        Timer::after(ANNUNCIATE_HALF_PERIOD).await;
        if pins.confirm_pressed() {
            break;
        }
        buzzer.set_low();
        screen.backlight(true);
        Timer::after(ANNUNCIATE_HALF_PERIOD).await;
    }
    buzzer.set_low();
    screen.backlight(true);
}
