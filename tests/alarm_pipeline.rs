//! Host-level tests for the alarm latch, its RTC confirmation, and the
//! publish cycle.

#![expect(clippy::unwrap_used, reason = "Tests panic on unexpected failure.")]

mod common;

use airclock::alarm::{AlarmLatch, take_confirmed};
use airclock::publish::{PublishReady, publish_cycle};
use airclock::telemetry::Readings;
use common::{FakeClockChip, FakePublisher};
use embassy_futures::block_on;

#[test]
fn latch_is_edge_triggered_and_coalescing() {
    let latch = AlarmLatch::new();
    assert!(!latch.take());

    latch.raise();
    latch.raise();
    assert!(latch.take());
    assert!(!latch.take());
}

#[test]
fn unconfirmed_latch_is_dropped_without_side_effects() {
    let latch = AlarmLatch::new();
    let mut chip = FakeClockChip::default();

    latch.raise();
    assert!(!take_confirmed(&latch, &mut chip));
    // The spurious edge is consumed, not left pending.
    assert!(!latch.take());
}

#[test]
fn confirmed_latch_consumes_the_chip_flag() {
    let latch = AlarmLatch::new();
    let mut chip = FakeClockChip::default();
    chip.alarm_flag = true;

    latch.raise();
    assert!(take_confirmed(&latch, &mut chip));
    assert!(!chip.alarm_flag);

    // A second pass with nothing latched stays quiet even if the chip's
    // flag were somehow set again.
    chip.alarm_flag = true;
    assert!(!take_confirmed(&latch, &mut chip));
}

#[test]
fn publish_trigger_coalesces() {
    let ready: PublishReady = PublishReady::new();
    ready.signal(());
    ready.signal(());
    assert!(ready.try_take().is_some());
    assert!(ready.try_take().is_none());
}

#[test]
fn publish_cycle_connects_lazily_and_delivers() {
    let mut publisher = FakePublisher::default();
    let readings = Readings {
        humidity: 47,
        temperature: 23,
        pm1_0: 5,
        pm2_5: 12,
        pm10_0: 18,
    };

    block_on(publish_cycle(&mut publisher, "42", &readings)).unwrap();
    assert_eq!(publisher.connects, 1);
    assert_eq!(
        publisher.published,
        vec![(
            "channels/42/publish".to_owned(),
            "&field1=47&field2=23&field3=5&field4=12&field5=18".to_owned()
        )]
    );

    // A second cycle reuses the live link.
    block_on(publish_cycle(&mut publisher, "42", &readings)).unwrap();
    assert_eq!(publisher.connects, 1);
    assert_eq!(publisher.published.len(), 2);
}

#[test]
fn publish_cycle_propagates_connect_failure() {
    let mut publisher = FakePublisher {
        fail_connect: true,
        ..FakePublisher::default()
    };

    let result = block_on(publish_cycle(&mut publisher, "42", &Readings::default()));
    assert!(result.is_err());
    assert!(publisher.published.is_empty());
}
