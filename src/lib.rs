//! Shared items for the air-quality clock project.
#![no_std]

pub mod alarm;
pub mod alarm_store;
pub mod dht22;
pub mod ds3231;
pub mod editor;
mod error;
pub mod idle;
pub mod keypad;
pub mod lcd;
pub mod menu;
pub mod net;
pub mod particulate;
pub mod publish;
pub mod screen;
pub mod settings;
mod shared_constants;
pub mod telemetry;
pub mod ui;

// Re-export commonly used items
pub use alarm::AlarmLatch;
pub use error::{Error, Result};
pub use keypad::{Button, KeyLevels, Keypad};
pub use menu::{Menu, MenuState};
pub use particulate::PmFrames;
pub use publish::PublishReady;
pub use screen::Screen;
pub use settings::AlarmSettings;
pub use shared_constants::*;
pub use telemetry::{Readings, TelemetryStore};
