use embassy_time::Duration;

/// One UI tick: buttons are sampled and the screen refreshed at this period.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

pub const BUTTON_DEBOUNCE: Duration = Duration::from_millis(20);
/// Hold-down time before the first auto-repeat event on up/down.
pub const REPEAT_DELAY: Duration = Duration::from_millis(1000);
pub const REPEAT_INTERVAL_START: Duration = Duration::from_millis(250);
pub const REPEAT_INTERVAL_STEP: Duration = Duration::from_millis(25);
pub const REPEAT_INTERVAL_FLOOR: Duration = Duration::from_millis(100);

/// Cadence of the edited-field blink. Edits reset the phase to visible.
pub const BLINK_PERIOD: Duration = Duration::from_millis(300);

/// No button activity for this long outside the home screen acts as "back".
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(10);
/// The alarm dashboard returns to the home screen by itself after this dwell.
pub const ALARM_SUMMARY_DWELL: Duration = Duration::from_secs(3);
/// How long "Time Set!" style confirmations stay on screen.
pub const NOTICE_DWELL: Duration = Duration::from_secs(1);
pub const SPLASH_DWELL: Duration = Duration::from_millis(1800);

/// The DHT22 needs ~2 s between conversions.
pub const ENV_POLL_PERIOD: Duration = Duration::from_secs(2);

pub const PUBLISH_PERIOD: Duration = Duration::from_secs(60);
pub const WIFI_JOIN_TIMEOUT: Duration = Duration::from_secs(15);
pub const BROKER_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Buzzer/backlight toggle half-period while annunciating a fired alarm.
pub const ANNUNCIATE_HALF_PERIOD: Duration = Duration::from_millis(500);
/// Upper bound on full buzzer on/off cycles when nobody presses confirm.
pub const ANNUNCIATE_MAX_CYCLES: u32 = 25;

/// Sleep quantum for tasks that have handed all their work off.
pub const ONE_DAY: Duration = Duration::from_secs(60 * 60 * 24);

pub const MQTT_BROKER_HOST: &str = "mqtt3.thingspeak.com";
pub const MQTT_BROKER_PORT: u16 = 1883;
pub const MQTT_KEEP_ALIVE_SECS: u16 = 240;

// Build-time credentials; see build.rs for the .env fallbacks.
pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASS: &str = env!("WIFI_PASS");
pub const MQTT_CLIENT_ID: &str = env!("MQTT_CLIENT_ID");
pub const MQTT_USER: &str = env!("MQTT_USER");
pub const MQTT_PASS: &str = env!("MQTT_PASS");
pub const THINGSPEAK_CHANNEL_ID: &str = env!("THINGSPEAK_CHANNEL_ID");
