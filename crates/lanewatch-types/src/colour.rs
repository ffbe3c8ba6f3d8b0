use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a `#RRGGBB` hex code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex colour code: {0:?}")]
pub struct ColourError(pub String);

/// 24-bit RGB colour, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Colour = Colour::rgb(0xFF, 0xFF, 0xFF);
    /// Timestamp prefix colour.
    pub const GRAY: Colour = Colour::rgb(0xBE, 0xBE, 0xBE);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB` with an optional leading `#`. Case-insensitive.
    pub fn parse_hex(code: &str) -> Result<Self, ColourError> {
        let digits = code.strip_prefix('#').unwrap_or(code);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColourError(code.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColourError(code.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Linear interpolation towards `end`. Channels are truncated, not rounded.
    ///
    /// `fraction` is clamped to `[0, 1]`; `0` yields `self`, `1` yields `end`.
    pub fn interpolate(self, end: Colour, fraction: f64) -> Colour {
        let t = fraction.clamp(0.0, 1.0);
        let mix = |s: u8, e: u8| {
            let v = s as f64 + (e as f64 - s as f64) * t;
            v.trunc().clamp(0.0, 255.0) as u8
        };
        Colour::rgb(mix(self.r, end.r), mix(self.g, end.g), mix(self.b, end.b))
    }

    /// Halfway towards white. Used for the idle part of a lane's slot.
    pub fn pale(self) -> Colour {
        self.interpolate(Colour::WHITE, 0.5)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_string()
    }
}
