//! Host-level tests for the small pure codecs: the persisted alarm record,
//! BCD conversion, weekday derivation, and the publish payload/topic.

#![expect(clippy::unwrap_used, reason = "Tests panic on unexpected failure.")]

use airclock::ds3231::{bcd_to_dec, dec_to_bcd};
use airclock::publish::{render_payload, render_topic};
use airclock::settings::{AlarmSettings, weekday_from_date, weekday_name};
use airclock::telemetry::Readings;

#[test]
fn alarm_record_round_trips() {
    let alarm = AlarmSettings {
        hour: 7,
        minute: 30,
        active: true,
    };
    assert_eq!(alarm.to_bytes(), [7, 30, 1]);
    assert_eq!(AlarmSettings::from_bytes(alarm.to_bytes()), alarm);
}

#[test]
fn alarm_record_sanitizes_out_of_range_fields() {
    assert_eq!(
        AlarmSettings::from_bytes([24, 60, 5]),
        AlarmSettings {
            hour: 0,
            minute: 0,
            active: true,
        }
    );
    // Erased flash reads as all ones.
    assert_eq!(
        AlarmSettings::from_bytes([0xFF, 0xFF, 0xFF]),
        AlarmSettings {
            hour: 0,
            minute: 0,
            active: true,
        }
    );
    assert_eq!(
        AlarmSettings::from_bytes([23, 59, 0]),
        AlarmSettings {
            hour: 23,
            minute: 59,
            active: false,
        }
    );
}

#[test]
fn bcd_round_trips_for_register_range() {
    for value in 0..=99u8 {
        assert_eq!(bcd_to_dec(dec_to_bcd(value)), value);
    }
    assert_eq!(dec_to_bcd(59), 0x59);
    assert_eq!(bcd_to_dec(0x23), 23);
}

#[test]
fn weekday_matches_known_dates() {
    // 2000-01-01 was a Saturday.
    assert_eq!(weekday_from_date(1, 1, 0), 7);
    // 2024-02-29 was a Thursday.
    assert_eq!(weekday_from_date(29, 2, 24), 5);
    // 2026-08-25 is a Tuesday.
    assert_eq!(weekday_from_date(25, 8, 26), 3);
    assert_eq!(weekday_name(3), "Tue");
    assert_eq!(weekday_name(0), "???");
}

#[test]
fn weekday_tolerates_garbage_month() {
    assert_eq!(weekday_from_date(1, 13, 26), 1);
}

#[test]
fn payload_renders_all_five_fields() {
    let readings = Readings {
        humidity: 47,
        temperature: 23,
        pm1_0: 5,
        pm2_5: 12,
        pm10_0: 18,
    };
    let payload = render_payload(&readings).unwrap();
    assert_eq!(
        payload.as_str(),
        "&field1=47&field2=23&field3=5&field4=12&field5=18"
    );
}

#[test]
fn payload_renders_negative_temperature() {
    let readings = Readings {
        humidity: 80,
        temperature: -3,
        ..Readings::default()
    };
    let payload = render_payload(&readings).unwrap();
    assert_eq!(
        payload.as_str(),
        "&field1=80&field2=-3&field3=0&field4=0&field5=0"
    );
}

#[test]
fn topic_embeds_the_channel_id() {
    let topic = render_topic("2468013").unwrap();
    assert_eq!(topic.as_str(), "channels/2468013/publish");
}
