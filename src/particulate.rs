//! Particulate-matter frames: assembles the sensor's serial byte stream into
//! validated readings, discarding malformed frames silently.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Concentrations in µg/m³ from one complete frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PmReading {
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10_0: u16,
}

/// Latest complete frame, newest wins. The UI-loop task drains this into its
/// sensor cache; it stays the sole telemetry writer.
pub type PmFrames = Signal<CriticalSectionRawMutex, PmReading>;

/// Fixed frame length including the header.
pub const FRAME_LEN: usize = 24;

const HEADER_0: u8 = 0x42;
const HEADER_1: u8 = 0x4D;

/// Byte offsets of the big-endian concentration fields.
const PM1_0_OFFSET: usize = 4;
const PM2_5_OFFSET: usize = 6;
const PM10_0_OFFSET: usize = 8;

/// Reassembles fixed-length frames from a byte stream.
///
/// Validation is the two-byte header only; there is no checksum pass. Any
/// byte that breaks the header match restarts the hunt, so garbage and
/// partial frames vanish without an error path.
pub struct FrameAssembler {
    frame: [u8; FRAME_LEN],
    filled: usize,
}

impl FrameAssembler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frame: [0; FRAME_LEN],
            filled: 0,
        }
    }

    /// Feeds one byte; answers a reading when it completes a frame.
    pub fn push_byte(&mut self, byte: u8) -> Option<PmReading> {
        match (self.filled, byte) {
            (0, HEADER_0) | (1, HEADER_1) => self.accept(byte),
            (0 | 1, _) => {
                // Resync: the stray byte may itself start a header.
                self.filled = 0;
                if byte == HEADER_0 {
                    self.accept(byte)
                } else {
                    None
                }
            }
            _ => self.accept(byte),
        }
    }

    fn accept(&mut self, byte: u8) -> Option<PmReading> {
        if let Some(slot) = self.frame.get_mut(self.filled) {
            *slot = byte;
        }
        self.filled = self.filled.saturating_add(1);
        if self.filled < FRAME_LEN {
            return None;
        }
        self.filled = 0;
        Some(PmReading {
            pm1_0: self.field(PM1_0_OFFSET),
            pm2_5: self.field(PM2_5_OFFSET),
            pm10_0: self.field(PM10_0_OFFSET),
        })
    }

    fn field(&self, offset: usize) -> u16 {
        let hi = self.frame.get(offset).copied().unwrap_or_default();
        let lo = self
            .frame
            .get(offset.saturating_add(1))
            .copied()
            .unwrap_or_default();
        u16::from_be_bytes([hi, lo])
    }
}

impl Default for FrameAssembler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "pico")]
pub use reader::particulate_task;

#[cfg(feature = "pico")]
mod reader {
    use defmt::info;
    use embassy_rp::uart::{Async, UartRx};
    use embedded_io_async::Read;

    use super::{FrameAssembler, PmFrames};

    /// Drains the sensor's UART and signals each completed frame. Read
    /// errors (overruns, breaks) are transient; the assembler resyncs on
    /// the next header.
    #[embassy_executor::task]
    pub async fn particulate_task(mut rx: UartRx<'static, Async>, frames: &'static PmFrames) -> ! {
        info!("Particulate reader started");
        let mut assembler = FrameAssembler::new();
        let mut chunk = [0u8; 32];
        loop {
            let Ok(count) = Read::read(&mut rx, &mut chunk).await else {
                continue;
            };
            for &byte in chunk.iter().take(count) {
                if let Some(reading) = assembler.push_byte(byte) {
                    frames.signal(reading);
                }
            }
        }
    }
}
