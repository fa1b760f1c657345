//! Persisted alarm settings: the contract the controller consumes plus the
//! flash-backed implementation behind the `pico` feature.

use crate::Result;
use crate::settings::AlarmSettings;

/// Non-volatile storage for the three-byte alarm record
/// {hour, minute, active}.
pub trait AlarmStore {
    /// Loads the persisted record, sanitizing out-of-range values to
    /// defaults. Never fails: unreadable storage answers the default record.
    fn load_alarm(&mut self) -> AlarmSettings;
    fn save_alarm(&mut self, alarm: AlarmSettings) -> Result<()>;
}

#[cfg(feature = "pico")]
pub use flash_impl::FlashAlarmStore;

#[cfg(feature = "pico")]
mod flash_impl {
    use defmt::warn;
    use embassy_rp::Peri;
    use embassy_rp::flash::{Blocking, ERASE_SIZE, Flash, WRITE_SIZE};
    use embassy_rp::peripherals::FLASH;

    use super::AlarmStore;
    use crate::Result;
    use crate::settings::{ALARM_RECORD_LEN, AlarmSettings};

    /// Pico W onboard flash.
    const FLASH_SIZE: usize = 2 * 1024 * 1024;

    /// The alarm record lives at the start of the last erase sector, clear
    /// of the program image at the front of flash.
    pub struct FlashAlarmStore {
        flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>,
    }

    impl FlashAlarmStore {
        #[must_use]
        pub fn new(flash: Peri<'static, FLASH>) -> Self {
            Self {
                flash: Flash::new_blocking(flash),
            }
        }

        #[expect(
            clippy::arithmetic_side_effects,
            clippy::cast_possible_truncation,
            reason = "The flash capacity is 2 MiB, far larger than one erase \
                      sector and well inside u32."
        )]
        fn record_offset(&self) -> u32 {
            self.flash.capacity() as u32 - ERASE_SIZE as u32
        }
    }

    impl AlarmStore for FlashAlarmStore {
        fn load_alarm(&mut self) -> AlarmSettings {
            let offset = self.record_offset();
            let mut bytes = [0u8; ALARM_RECORD_LEN];
            if let Err(err) = self.flash.blocking_read(offset, &mut bytes) {
                warn!("Alarm record read failed: {:?}", err);
                return AlarmSettings::default();
            }
            AlarmSettings::from_bytes(bytes)
        }

        #[expect(
            clippy::arithmetic_side_effects,
            clippy::indexing_slicing,
            clippy::cast_possible_truncation,
            reason = "offset + ERASE_SIZE stays within the flash capacity and \
                      ALARM_RECORD_LEN < WRITE_SIZE."
        )]
        fn save_alarm(&mut self, alarm: AlarmSettings) -> Result<()> {
            let offset = self.record_offset();
            // Flash writes are WRITE_SIZE-granular; pad the record out.
            let mut padded = [0u8; WRITE_SIZE];
            padded[..ALARM_RECORD_LEN].copy_from_slice(&alarm.to_bytes());
            self.flash
                .blocking_erase(offset, offset + ERASE_SIZE as u32)?;
            self.flash.blocking_write(offset, &padded)?;
            Ok(())
        }
    }
}
