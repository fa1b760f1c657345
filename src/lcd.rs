//! HD44780 16x2 LCD behind a PCF8574 I2C backpack.
//!
//! The [`Screen`] contract is synchronous, so the nibble protocol uses
//! `block_for`; the longest single operation (clear, ~2 ms) is well inside
//! the UI tick.

#![cfg(feature = "pico")]

use embassy_rp::Peri;
use embassy_rp::i2c::{self, Config as I2cConfig, SclPin, SdaPin};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, block_for};

use crate::screen::{Glyph, Screen};

// PCF8574 pin mapping: P0=RS, P1=RW, P2=E, P3=Backlight, P4-P7=Data
const LCD_BACKLIGHT: u8 = 0x08;
const LCD_ENABLE: u8 = 0x04;
const LCD_RS: u8 = 0x01;

const LCD_ADDRESS: u8 = 0x27;

/// The display driver. Owns I2C0; the RTC gets the other I2C block.
pub struct Lcd {
    i2c: i2c::I2c<'static, I2C0, i2c::Blocking>,
    backlight_bit: u8,
}

impl Lcd {
    /// Brings the panel up in 4-bit mode and uploads the custom glyphs.
    pub fn new<SCL, SDA>(
        i2c_peripheral: Peri<'static, I2C0>,
        scl: Peri<'static, SCL>,
        sda: Peri<'static, SDA>,
    ) -> Self
    where
        SCL: SclPin<I2C0>,
        SDA: SdaPin<I2C0>,
    {
        let i2c = i2c::I2c::new_blocking(i2c_peripheral, scl, sda, I2cConfig::default());
        let mut lcd = Self {
            i2c,
            backlight_bit: LCD_BACKLIGHT,
        };
        lcd.init();
        lcd
    }

    fn init(&mut self) {
        block_for(Duration::from_millis(50));

        // Initialize in 4-bit mode
        self.write_nibble(0x03, false);
        block_for(Duration::from_millis(5));
        self.write_nibble(0x03, false);
        block_for(Duration::from_micros(150));
        self.write_nibble(0x03, false);
        self.write_nibble(0x02, false);

        // Function set: 4-bit, 2 lines, 5x8 font
        self.write_byte(0x28, false);
        // Display control: display on, cursor off, blink off
        self.write_byte(0x0C, false);
        self.write_byte(0x01, false);
        block_for(Duration::from_millis(2));
        // Entry mode: increment cursor, no shift
        self.write_byte(0x06, false);

        self.upload_glyphs();
    }

    /// Writes the CGRAM glyph bitmaps; codes 0..=3 then render them.
    #[expect(clippy::arithmetic_side_effects, reason = "Bit operations")]
    fn upload_glyphs(&mut self) {
        for (glyph, rows) in Glyph::CUSTOM {
            // Set CGRAM address: 0x40 | (code * 8)
            self.write_byte(0x40 | (glyph.code() << 3), false);
            for row in rows {
                self.write_byte(row, true);
            }
        }
        // Back to DDRAM addressing.
        self.write_byte(0x80, false);
    }

    #[expect(clippy::arithmetic_side_effects, reason = "Bit operations")]
    fn write_nibble(&mut self, nibble: u8, rs: bool) {
        let rs_bit = if rs { LCD_RS } else { 0 };
        let data = (nibble << 4) | self.backlight_bit | rs_bit;

        // Pulse enable high then low around the data.
        let _ = self.i2c.blocking_write(LCD_ADDRESS, &[data | LCD_ENABLE]);
        block_for(Duration::from_micros(1));
        let _ = self.i2c.blocking_write(LCD_ADDRESS, &[data]);
        block_for(Duration::from_micros(50));
    }

    fn write_byte(&mut self, byte: u8, rs: bool) {
        self.write_nibble((byte >> 4) & 0x0F, rs);
        self.write_nibble(byte & 0x0F, rs);
    }
}

impl Screen for Lcd {
    fn clear(&mut self) {
        self.write_byte(0x01, false);
        block_for(Duration::from_millis(2));
    }

    #[expect(clippy::arithmetic_side_effects, reason = "Row/col values are small")]
    fn set_cursor(&mut self, row: u8, col: u8) {
        let address = match row {
            1 => 0x40 + col,
            _ => col,
        };
        self.write_byte(0x80 | address, false);
    }

    fn print(&mut self, text: &str) {
        for byte in text.bytes() {
            self.write_byte(byte, true);
        }
    }

    fn write_glyph(&mut self, glyph: Glyph) {
        self.write_byte(glyph.code(), true);
    }

    fn backlight(&mut self, on: bool) {
        self.backlight_bit = if on { LCD_BACKLIGHT } else { 0 };
        // Latch the new backlight state immediately with a no-op bus write.
        let _ = self.i2c.blocking_write(LCD_ADDRESS, &[self.backlight_bit]);
    }
}
