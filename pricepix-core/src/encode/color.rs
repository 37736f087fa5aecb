//! Color codec: 24-bit integers packed as `red << 16 | green << 8 | blue`.

use crate::error::EncodeError;
use serde::{Deserialize, Serialize};

/// Largest valid color code (`0xFFFFFF`).
pub const MAX_COLOR_CODE: u32 = 0x00FF_FFFF;

/// A validated 24-bit color code.
///
/// The only way to build one from an arbitrary integer is [`ColorCode::new`],
/// so every value held by this type is in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct ColorCode(u32);

impl ColorCode {
    /// Validate `value` against `[0, MAX_COLOR_CODE]`.
    pub fn new(value: i64) -> Result<Self, EncodeError> {
        if (0..=MAX_COLOR_CODE as i64).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(EncodeError::Range { value })
        }
    }

    /// The packed integer.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Split into channels: red is bits 16..24, blue is the low byte.
    pub fn to_rgb(self) -> Rgb {
        Rgb {
            red: ((self.0 >> 16) & 0xFF) as u8,
            green: ((self.0 >> 8) & 0xFF) as u8,
            blue: (self.0 & 0xFF) as u8,
        }
    }
}

impl TryFrom<i64> for ColorCode {
    type Error = EncodeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColorCode> for u32 {
    fn from(code: ColorCode) -> Self {
        code.0
    }
}

/// One pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Pack back into a color code. Always in range.
    pub fn to_code(self) -> ColorCode {
        ColorCode((self.red as u32) << 16 | (self.green as u32) << 8 | self.blue as u32)
    }

    pub fn channels(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Convert an integer to its RGB triple, rejecting anything outside 24 bits.
pub fn encode(value: i64) -> Result<Rgb, EncodeError> {
    ColorCode::new(value).map(ColorCode::to_rgb)
}

/// Inverse of [`encode`].
pub fn decode(rgb: Rgb) -> u32 {
    rgb.to_code().value()
}
