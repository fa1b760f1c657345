//! Character-cell display surface. The controller issues cursor-addressed
//! field writes only; it never repaints whole frames.

/// A 16x2 character display with a handful of custom glyphs.
pub trait Screen {
    fn clear(&mut self);
    fn set_cursor(&mut self, row: u8, col: u8);
    fn print(&mut self, text: &str);
    fn write_glyph(&mut self, glyph: Glyph);
    fn backlight(&mut self, on: bool);
}

/// Non-ASCII characters the clock renders. The first four live in CGRAM and
/// are uploaded at init; Degree is in the HD44780 character ROM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    Bell,
    Thermometer,
    ArrowLeft,
    ArrowRight,
    Degree,
}

impl Glyph {
    /// Character code the display understands.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Bell => 0,
            Self::Thermometer => 1,
            Self::ArrowLeft => 2,
            Self::ArrowRight => 3,
            Self::Degree => 0xDF,
        }
    }

    /// 5x8 pixel rows for the CGRAM glyphs, in upload order.
    pub const CUSTOM: [(Self, [u8; 8]); 4] = [
        (
            Self::Bell,
            [0x04, 0x0E, 0x0E, 0x0E, 0x1F, 0x00, 0x04, 0x00],
        ),
        (
            Self::Thermometer,
            [0x04, 0x0A, 0x0A, 0x0E, 0x0E, 0x1F, 0x1F, 0x0E],
        ),
        (
            Self::ArrowLeft,
            [0x02, 0x06, 0x0E, 0x1E, 0x0E, 0x06, 0x02, 0x00],
        ),
        (
            Self::ArrowRight,
            [0x08, 0x0C, 0x0E, 0x0F, 0x0E, 0x0C, 0x08, 0x00],
        ),
    ];
}

/// Two ASCII digits, zero padded, for values 0-99 (higher values keep the
/// low two digits).
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "Digits stay within '0'..='9' after the modulo."
)]
pub const fn two_digits(value: u8) -> [u8; 2] {
    let clamped = value % 100;
    [b'0' + clamped / 10, b'0' + clamped % 10]
}

/// Prints a value as two zero-padded digits at the current cursor.
pub fn print_two_digits(screen: &mut impl Screen, value: u8) {
    let digits = two_digits(value);
    if let Ok(text) = core::str::from_utf8(&digits) {
        screen.print(text);
    }
}
