//! Humidity/temperature sensing: the best-effort contract plus the DHT22
//! one-wire driver behind the `pico` feature.

/// Best-effort environmental sensor. `read` answers (humidity %, whole °C)
/// and falls back to the last good reading on a transient failure.
pub trait EnvSensor {
    fn read(&mut self) -> (i16, i16);
}

#[cfg(feature = "pico")]
pub use driver::Dht22;

#[cfg(feature = "pico")]
mod driver {
    use defmt::warn;
    use embassy_rp::Peri;
    use embassy_rp::gpio::{Flex, Pin, Pull};
    use embassy_time::{Duration, Instant, block_for};

    use super::EnvSensor;

    /// DHT22 on a single data line with an external or internal pull-up.
    ///
    /// A conversion is a blocking exchange of ~5 ms: a long start pulse from
    /// the host, then 40 bits from the sensor coded in high-pulse widths.
    /// Transient failures (timeout, bad checksum) keep the previous reading.
    pub struct Dht22 {
        pin: Flex<'static>,
        last: (i16, i16),
    }

    /// Longest level we ever wait on before declaring the exchange dead.
    const PULSE_TIMEOUT: Duration = Duration::from_micros(200);
    /// A high pulse longer than this is a one bit (zeros are ~26-28 µs,
    /// ones ~70 µs).
    const ONE_THRESHOLD: Duration = Duration::from_micros(50);

    impl Dht22 {
        #[must_use]
        pub fn new<P: Pin>(pin: Peri<'static, P>) -> Self {
            let mut pin = Flex::new(pin);
            pin.set_as_input();
            pin.set_pull(Pull::Up);
            Self { pin, last: (0, 0) }
        }

        /// Waits for the line to reach `high`, answering the time spent at
        /// the previous level, or `None` past the timeout.
        #[expect(
            clippy::arithmetic_side_effects,
            reason = "started is always a past instant, so the subtraction cannot underflow."
        )]
        fn wait_for_level(&mut self, high: bool) -> Option<Duration> {
            let started = Instant::now();
            while self.pin.is_high() != high {
                let waited = Instant::now() - started;
                if waited > PULSE_TIMEOUT {
                    return None;
                }
            }
            Some(Instant::now() - started)
        }

        #[expect(clippy::arithmetic_side_effects, reason = "Bit operations")]
        fn read_frame(&mut self) -> Option<[u8; 5]> {
            // Host start pulse: hold low >1 ms, then release the line.
            self.pin.set_as_output();
            self.pin.set_low();
            block_for(Duration::from_micros(1_100));
            self.pin.set_as_input();
            self.pin.set_pull(Pull::Up);

            // Sensor response: ~80 µs low, ~80 µs high.
            self.wait_for_level(false)?;
            self.wait_for_level(true)?;
            self.wait_for_level(false)?;

            let mut bytes = [0u8; 5];
            for byte in &mut bytes {
                for _ in 0..8 {
                    // ~50 µs low separator, then the width-coded high pulse.
                    self.wait_for_level(true)?;
                    let high = self.wait_for_level(false)?;
                    *byte <<= 1;
                    if high > ONE_THRESHOLD {
                        *byte |= 1;
                    }
                }
            }
            Some(bytes)
        }
    }

    impl EnvSensor for Dht22 {
        #[expect(
            clippy::arithmetic_side_effects,
            reason = "The sign bit is masked off before negation, so the magnitude fits i16."
        )]
        fn read(&mut self) -> (i16, i16) {
            let Some([hum_hi, hum_lo, temp_hi, temp_lo, checksum]) = self.read_frame() else {
                warn!("DHT22 exchange timed out");
                return self.last;
            };
            if hum_hi
                .wrapping_add(hum_lo)
                .wrapping_add(temp_hi)
                .wrapping_add(temp_lo)
                != checksum
            {
                warn!("DHT22 checksum mismatch");
                return self.last;
            }

            // Tenths on the wire; the display and payload use whole units.
            let humidity = i16::from_be_bytes([hum_hi, hum_lo]) / 10;
            let temp_tenths = i16::from_be_bytes([temp_hi & 0x7F, temp_lo]) / 10;
            let temperature = if temp_hi & 0x80 == 0 {
                temp_tenths
            } else {
                -temp_tenths
            };

            self.last = (humidity, temperature);
            self.last
        }
    }
}
