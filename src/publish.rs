//! Telemetry publishing: payload/topic rendering, the coalescing publish
//! trigger, and the MQTT pipeline behind the `wifi` feature.

use core::fmt::Write as _;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::String;

use crate::Result;
use crate::telemetry::Readings;

/// Publish trigger. A [`Signal`] rather than a channel on purpose: triggers
/// that pile up while a slow cycle is in flight coalesce into one pending
/// trigger, so the pipeline can never fall behind the timer.
pub type PublishReady = Signal<CriticalSectionRawMutex, ()>;

/// A sink for rendered telemetry. `connect` brings the link up; `publish`
/// delivers one message. The pipeline re-connects lazily before each cycle
/// that finds the link down.
pub trait Publisher {
    async fn connect(&mut self) -> Result<()>;
    fn connected(&self) -> bool;
    async fn publish(&mut self, topic: &str, payload: &str) -> Result<()>;
}

/// Renders one update in ThingSpeak's field form, humidity first:
/// `&field1=47&field2=23&field3=5&field4=12&field5=18`.
///
/// # Errors
///
/// `FormatError` if the rendering outgrows the buffer (it cannot for
/// in-range readings).
pub fn render_payload(readings: &Readings) -> Result<String<96>> {
    let mut payload = String::new();
    write!(
        payload,
        "&field1={}&field2={}&field3={}&field4={}&field5={}",
        readings.humidity, readings.temperature, readings.pm1_0, readings.pm2_5, readings.pm10_0
    )?;
    Ok(payload)
}

/// The per-channel publish topic, `channels/<id>/publish`.
///
/// # Errors
///
/// `FormatError` if the channel id outgrows the buffer.
pub fn render_topic(channel_id: &str) -> Result<String<48>> {
    let mut topic = String::new();
    write!(topic, "channels/{channel_id}/publish")?;
    Ok(topic)
}

/// One publish cycle: (re)connect if the link is down, render, deliver.
///
/// # Errors
///
/// Propagates connect and publish failures; the caller logs and waits for
/// the next trigger, readings are never queued.
pub async fn publish_cycle<P: Publisher>(
    publisher: &mut P,
    channel_id: &str,
    readings: &Readings,
) -> Result<()> {
    if !publisher.connected() {
        publisher.connect().await?;
    }
    let topic = render_topic(channel_id)?;
    let payload = render_payload(readings)?;
    publisher.publish(&topic, &payload).await
}

#[cfg(feature = "wifi")]
pub use pipeline::{MqttPublisher, publish_task, publish_timer_task};

#[cfg(feature = "wifi")]
mod pipeline {
    use defmt::{Debug2Format, info, warn};
    use embassy_net::dns::DnsQueryType;
    use embassy_net::tcp::TcpSocket;
    use embassy_time::{Ticker, with_timeout};
    use rust_mqtt::client::client::MqttClient;
    use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
    use rust_mqtt::packet::v5::publish_packet::QualityOfService;
    use rust_mqtt::utils::rng_generator::CountingRng;

    use super::{PublishReady, Publisher, publish_cycle};
    use crate::net::Net;
    use crate::shared_constants::{
        BROKER_CONNECT_TIMEOUT, MQTT_BROKER_HOST, MQTT_BROKER_PORT, MQTT_CLIENT_ID,
        MQTT_KEEP_ALIVE_SECS, MQTT_PASS, MQTT_USER, PUBLISH_PERIOD, THINGSPEAK_CHANNEL_ID,
    };
    use crate::telemetry::TelemetryStore;
    use crate::{Error, Result};

    /// Raises the publish trigger once at startup (so the first reading goes
    /// out without waiting a full period) and then every [`PUBLISH_PERIOD`].
    #[embassy_executor::task]
    pub async fn publish_timer_task(ready: &'static PublishReady) -> ! {
        ready.signal(());
        let mut ticker = Ticker::every(PUBLISH_PERIOD);
        loop {
            ticker.next().await;
            ready.signal(());
        }
    }

    /// Waits for the trigger, snapshots the shared telemetry and runs one
    /// publish cycle. Failures are logged and dropped; the next trigger
    /// retries with fresh readings.
    #[embassy_executor::task]
    pub async fn publish_task(
        net: Net,
        telemetry: &'static TelemetryStore,
        ready: &'static PublishReady,
    ) -> ! {
        let mut publisher = MqttPublisher::new(net);
        loop {
            ready.wait().await;
            let readings = telemetry.snapshot();
            match publish_cycle(&mut publisher, THINGSPEAK_CHANNEL_ID, &readings).await {
                Ok(()) => info!("Published telemetry update"),
                Err(err) => warn!("Publish cycle failed: {}", Debug2Format(&err)),
            }
        }
    }

    /// ThingSpeak publisher over the Pico W radio.
    ///
    /// Sessions are per-cycle: each publish opens a TCP connection to the
    /// broker, delivers one QoS-0 message and disconnects. At one update a
    /// minute that is cheaper than babysitting a long-lived session through
    /// keep-alives and half-open detection.
    pub struct MqttPublisher {
        net: Net,
    }

    impl MqttPublisher {
        #[must_use]
        pub const fn new(net: Net) -> Self {
            Self { net }
        }
    }

    impl Publisher for MqttPublisher {
        async fn connect(&mut self) -> Result<()> {
            self.net.ensure_up().await
        }

        fn connected(&self) -> bool {
            self.net.is_up()
        }

        async fn publish(&mut self, topic: &str, payload: &str) -> Result<()> {
            let addresses = self
                .net
                .stack()
                .dns_query(MQTT_BROKER_HOST, DnsQueryType::A)
                .await
                .map_err(|_| Error::DnsLookup)?;
            let address = *addresses.first().ok_or(Error::DnsLookup)?;

            let mut rx_buffer = [0u8; 1024];
            let mut tx_buffer = [0u8; 1024];
            let mut socket = TcpSocket::new(self.net.stack(), &mut rx_buffer, &mut tx_buffer);
            with_timeout(
                BROKER_CONNECT_TIMEOUT,
                socket.connect((address, MQTT_BROKER_PORT)),
            )
            .await??;

            let mut config: ClientConfig<'_, 5, CountingRng> =
                ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
            config.add_client_id(MQTT_CLIENT_ID);
            config.add_username(MQTT_USER);
            config.add_password(MQTT_PASS);
            config.keep_alive = MQTT_KEEP_ALIVE_SECS;

            let mut recv_buffer = [0u8; 512];
            let mut write_buffer = [0u8; 512];
            let mut client = MqttClient::new(
                socket,
                &mut write_buffer,
                512,
                &mut recv_buffer,
                512,
                config,
            );
            with_timeout(BROKER_CONNECT_TIMEOUT, client.connect_to_broker()).await??;
            client
                .send_message(topic, payload.as_bytes(), QualityOfService::QoS0, false)
                .await?;
            client.disconnect().await?;
            Ok(())
        }
    }
}
