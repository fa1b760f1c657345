//! The external real-time clock: the contract the controller consumes plus
//! the DS3231 register driver behind the `pico` feature.

use crate::settings::{AlarmSettings, DateParts, TimeParts};

/// What the controller needs from the clock chip. The chip holds the
/// authoritative time; the menu only mirrors it while editing.
///
/// Implementations are best-effort: a transient bus failure answers the
/// last-known or zero value rather than an error.
pub trait ClockChip {
    fn read_time(&mut self) -> TimeParts;
    fn write_time(&mut self, time: TimeParts);
    fn read_date(&mut self) -> DateParts;
    /// Writes the date and refreshes the chip's weekday register from it.
    fn write_date(&mut self, date: DateParts);
    /// Programs the daily hours+minutes alarm match and its interrupt enable.
    fn set_alarm(&mut self, alarm: AlarmSettings);
    /// Test-and-clear of the chip's alarm-fired flag. Clearing the flag is
    /// what re-arms the daily match, so a `true` answer consumes the event.
    fn alarm_asserted(&mut self) -> bool;
    /// Day of week, 1 = Sunday .. 7 = Saturday.
    fn weekday(&mut self) -> u8;
}

/// Packed BCD to binary, as the DS3231 time registers store digits.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "Both terms stay below u8::MAX for any input byte."
)]
pub const fn bcd_to_dec(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}

/// Binary to packed BCD for values 0-99.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "value / 10 <= 9 for the 0-99 range the registers hold."
)]
pub const fn dec_to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

#[cfg(feature = "pico")]
pub use driver::Ds3231;

#[cfg(feature = "pico")]
mod driver {
    use defmt::warn;
    use embassy_rp::Peri;
    use embassy_rp::i2c::{self, Config as I2cConfig, SclPin, SdaPin};
    use embassy_rp::peripherals::I2C1;

    use super::{ClockChip, bcd_to_dec, dec_to_bcd};
    use crate::settings::{AlarmSettings, DateParts, TimeParts, weekday_from_date};

    const ADDRESS: u8 = 0x68;

    const REG_SECONDS: u8 = 0x00;
    const REG_WEEKDAY: u8 = 0x03;
    const REG_DAY: u8 = 0x04;
    const REG_ALARM1_SECONDS: u8 = 0x07;
    const REG_CONTROL: u8 = 0x0E;
    const REG_STATUS: u8 = 0x0F;

    /// Control register bits: interrupt output mode and alarm 1 enable.
    const CONTROL_INTCN: u8 = 0x04;
    const CONTROL_A1IE: u8 = 0x01;
    /// Status register bit: alarm 1 fired.
    const STATUS_A1F: u8 = 0x01;
    /// Alarm register mask bit: ignore this field when matching.
    const ALARM_MASK: u8 = 0x80;

    /// Blocking DS3231 driver on the dedicated I2C1 bus.
    pub struct Ds3231 {
        i2c: i2c::I2c<'static, I2C1, i2c::Blocking>,
    }

    impl Ds3231 {
        #[must_use]
        pub fn new<SCL, SDA>(
            i2c_peripheral: Peri<'static, I2C1>,
            scl: Peri<'static, SCL>,
            sda: Peri<'static, SDA>,
        ) -> Self
        where
            SCL: SclPin<I2C1>,
            SDA: SdaPin<I2C1>,
        {
            let i2c = i2c::I2c::new_blocking(i2c_peripheral, scl, sda, I2cConfig::default());
            Self { i2c }
        }

        /// Reads consecutive registers starting at `reg`. Answers false and
        /// leaves `buffer` untouched on a bus failure.
        fn read_registers(&mut self, reg: u8, buffer: &mut [u8]) -> bool {
            match self.i2c.blocking_write_read(ADDRESS, &[reg], buffer) {
                Ok(()) => true,
                Err(err) => {
                    warn!("DS3231 read at {=u8:#x} failed: {}", reg, err);
                    false
                }
            }
        }

        fn write_registers(&mut self, bytes: &[u8]) {
            if let Err(err) = self.i2c.blocking_write(ADDRESS, bytes) {
                let reg = bytes.first().copied().unwrap_or_default();
                warn!("DS3231 write at {=u8:#x} failed: {}", reg, err);
            }
        }

        fn update_register(&mut self, reg: u8, f: impl FnOnce(u8) -> u8) {
            let mut value = [0u8];
            if self.read_registers(reg, &mut value) {
                self.write_registers(&[reg, f(value[0])]);
            }
        }
    }

    impl ClockChip for Ds3231 {
        fn read_time(&mut self) -> TimeParts {
            let mut raw = [0u8; 3];
            if !self.read_registers(REG_SECONDS, &mut raw) {
                return TimeParts::default();
            }
            TimeParts {
                second: bcd_to_dec(raw[0] & 0x7F),
                minute: bcd_to_dec(raw[1]),
                hour: bcd_to_dec(raw[2] & 0x3F),
            }
        }

        fn write_time(&mut self, time: TimeParts) {
            self.write_registers(&[
                REG_SECONDS,
                dec_to_bcd(time.second),
                dec_to_bcd(time.minute),
                dec_to_bcd(time.hour),
            ]);
        }

        fn read_date(&mut self) -> DateParts {
            let mut raw = [0u8; 3];
            if !self.read_registers(REG_DAY, &mut raw) {
                return DateParts::default();
            }
            DateParts {
                day: bcd_to_dec(raw[0]),
                month: bcd_to_dec(raw[1] & 0x1F),
                year: bcd_to_dec(raw[2]),
            }
        }

        fn write_date(&mut self, date: DateParts) {
            let weekday = weekday_from_date(date.day, date.month, date.year);
            self.write_registers(&[
                REG_WEEKDAY,
                dec_to_bcd(weekday),
                dec_to_bcd(date.day),
                dec_to_bcd(date.month),
                dec_to_bcd(date.year),
            ]);
        }

        fn set_alarm(&mut self, alarm: AlarmSettings) {
            // Alarm 1 in hours+minutes match mode: seconds must be zero,
            // the day field is masked out so the match repeats daily.
            self.write_registers(&[
                REG_ALARM1_SECONDS,
                dec_to_bcd(0),
                dec_to_bcd(alarm.minute),
                dec_to_bcd(alarm.hour),
                ALARM_MASK,
            ]);
            self.update_register(REG_CONTROL, |control| {
                let armed = (control | CONTROL_INTCN) & !CONTROL_A1IE;
                if alarm.active {
                    armed | CONTROL_A1IE
                } else {
                    armed
                }
            });
            // Drop any stale fired flag so the new setting starts clean.
            self.update_register(REG_STATUS, |status| status & !STATUS_A1F);
        }

        fn alarm_asserted(&mut self) -> bool {
            let mut status = [0u8];
            if !self.read_registers(REG_STATUS, &mut status) {
                return false;
            }
            if status[0] & STATUS_A1F == 0 {
                return false;
            }
            self.write_registers(&[REG_STATUS, status[0] & !STATUS_A1F]);
            true
        }

        fn weekday(&mut self) -> u8 {
            let mut raw = [0u8];
            if !self.read_registers(REG_WEEKDAY, &mut raw) {
                return 1;
            }
            bcd_to_dec(raw[0] & 0x07)
        }
    }
}
