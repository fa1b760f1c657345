//! Firmware entry point for the Pico W air-quality clock.
//!
//! Task layout:
//! - high-priority interrupt executor: the RTC alarm-line watcher, so a
//!   fired alarm is latched even while the UI loop blocks on a sensor
//! - thread-mode executor: the UI loop, the particulate reader and the
//!   publish pipeline
#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use airclock::alarm::{AlarmLatch, alarm_watch_task};
use airclock::alarm_store::FlashAlarmStore;
use airclock::dht22::Dht22;
use airclock::ds3231::Ds3231;
use airclock::keypad::KeypadPins;
use airclock::lcd::Lcd;
use airclock::net::Net;
use airclock::particulate::{PmFrames, particulate_task};
use airclock::publish::{PublishReady, publish_task, publish_timer_task};
use airclock::telemetry::TelemetryStore;
use airclock::ui::ui_task;
use airclock::{ONE_DAY, Result};
use defmt::info;
use defmt_rtt as _;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt as _, Priority};
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{self, UartRx};
use embassy_time::Timer;
use panic_probe as _;

bind_interrupts!(struct Irqs {
    UART1_IRQ => uart::InterruptHandler<UART1>;
});

static ALARM_LATCH: AlarmLatch = AlarmLatch::new();
static TELEMETRY: TelemetryStore = TelemetryStore::new();
static PM_FRAMES: PmFrames = PmFrames::new();
static PUBLISH_READY: PublishReady = PublishReady::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[expect(unsafe_code, reason = "Interrupt handlers are unsafe by signature.")]
#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt();
}

#[embassy_executor::main]
pub async fn main(spawner: Spawner) -> ! {
    // If it returns, something went wrong.
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());
    info!("AirClock starting");

    // Alarm watcher on the high-priority executor. The DS3231's INT line is
    // open-drain, active low.
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    let alarm_line = Input::new(p.PIN_8, Pull::Up);
    high_spawner.spawn(alarm_watch_task(alarm_line, &ALARM_LATCH))?;

    let keypad_pins = KeypadPins::new(
        Input::new(p.PIN_2, Pull::Up),  // left
        Input::new(p.PIN_3, Pull::Up),  // right
        Input::new(p.PIN_6, Pull::Up),  // up
        Input::new(p.PIN_7, Pull::Up),  // down
        Input::new(p.PIN_10, Pull::Up), // confirm
        Input::new(p.PIN_11, Pull::Up), // back
    );
    let buzzer = Output::new(p.PIN_15, Level::Low);

    let lcd = Lcd::new(p.I2C0, p.PIN_5, p.PIN_4);
    let rtc = Ds3231::new(p.I2C1, p.PIN_27, p.PIN_26);
    let store = FlashAlarmStore::new(p.FLASH);
    let env = Dht22::new(p.PIN_16);

    // PMS sensor transmits unsolicited at 9600 8N1; only RX is wired.
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = 9600;
    let pm_rx = UartRx::new(p.UART1, p.PIN_9, Irqs, p.DMA_CH1, uart_config);
    spawner.spawn(particulate_task(pm_rx, &PM_FRAMES))?;

    spawner.spawn(ui_task(
        keypad_pins,
        buzzer,
        lcd,
        rtc,
        store,
        env,
        &ALARM_LATCH,
        &PM_FRAMES,
        &TELEMETRY,
    ))?;

    let net = Net::new(
        spawner, p.PIN_23, p.PIN_25, p.PIO0, p.PIN_24, p.PIN_29, p.DMA_CH0,
    )
    .await?;
    spawner.spawn(publish_timer_task(&PUBLISH_READY))?;
    spawner.spawn(publish_task(net, &TELEMETRY, &PUBLISH_READY))?;

    // All the work lives in the spawned tasks.
    loop {
        Timer::after(ONE_DAY).await;
    }
}
