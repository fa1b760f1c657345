//! The latest environmental readings, shared between the UI-loop task (sole
//! writer) and the publish task (sole reader).

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

/// One telemetry snapshot. Integer units: percent relative humidity, whole
/// degrees Celsius, micrograms per cubic meter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Readings {
    pub humidity: i16,
    pub temperature: i16,
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10_0: u16,
}

/// Single-writer/single-reader snapshot store. Each access copies the whole
/// record under one critical section; there is no field-level ordering.
///
/// A publish that fires before the first sensor poll sends the zeroed
/// startup snapshot; that is accepted behavior, not an error.
pub struct TelemetryStore {
    snapshot: Mutex<CriticalSectionRawMutex, Cell<Readings>>,
}

impl TelemetryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshot: Mutex::new(Cell::new(Readings {
                humidity: 0,
                temperature: 0,
                pm1_0: 0,
                pm2_5: 0,
                pm10_0: 0,
            })),
        }
    }

    /// Overwrites the snapshot. Called only from the UI-loop task.
    pub fn update(&self, readings: Readings) {
        self.snapshot.lock(|cell| cell.set(readings));
    }

    /// Copies out the latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Readings {
        self.snapshot.lock(Cell::get)
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}
