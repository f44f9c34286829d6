//! Colours and enumerated style values shared by element variants.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors parsing a hex colour string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("colour must start with '#': {0:?}")]
    MissingHash(String),
    #[error("colour must have 3, 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit in colour {0:?}")]
    InvalidDigit(String),
}

/// RGBA8 colour, serialized as `#rrggbb` (opaque) or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or the keyword `transparent`.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("transparent") {
            return Ok(Self::transparent());
        }
        let hex = input
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(input.to_string()))?;
        let digit = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidDigit(input.to_string()))
        };
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(input.to_string()));
        }
        match hex.len() {
            3 => Ok(Self::rgb(
                digit(&hex[0..1])? * 17,
                digit(&hex[1..2])? * 17,
                digit(&hex[2..3])? * 17,
            )),
            6 => Ok(Self::rgb(digit(&hex[0..2])?, digit(&hex[2..4])?, digit(&hex[4..6])?)),
            8 => Ok(Self::new(
                digit(&hex[0..2])?,
                digit(&hex[2..4])?,
                digit(&hex[4..6])?,
                digit(&hex[6..8])?,
            )),
            n => Err(ColorParseError::InvalidLength(n)),
        }
    }

    /// Lower-case hex form; the alpha byte is omitted when fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Colour with an element's opacity folded into alpha.
    pub fn with_opacity(&self, opacity: f64) -> Color {
        let alpha = (self.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
        Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Dash pattern for outlines and connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl StrokeStyle {
    /// Dash lengths for a given stroke width; empty means solid.
    pub fn dash_pattern(&self, width: f64) -> Vec<f64> {
        match self {
            StrokeStyle::Solid => Vec::new(),
            StrokeStyle::Dashed => vec![width * 4.0, width * 3.0],
            StrokeStyle::Dotted => vec![width, width * 2.0],
        }
    }
}

/// Horizontal alignment of text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(SerializableColor::parse("#fff").unwrap(), SerializableColor::white());
        assert_eq!(
            SerializableColor::parse("#1e90ff").unwrap(),
            SerializableColor::rgb(0x1e, 0x90, 0xff)
        );
        assert_eq!(
            SerializableColor::parse("#00000080").unwrap(),
            SerializableColor::new(0, 0, 0, 0x80)
        );
        assert!(SerializableColor::parse("transparent").unwrap().is_transparent());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            SerializableColor::parse("fff"),
            Err(ColorParseError::MissingHash(_))
        ));
        assert_eq!(
            SerializableColor::parse("#ffff"),
            Err(ColorParseError::InvalidLength(4))
        );
        assert!(matches!(
            SerializableColor::parse("#gggggg"),
            Err(ColorParseError::InvalidDigit(_))
        ));
        // Sign characters are not hex digits.
        assert!(matches!(
            SerializableColor::parse("#+1+2+3"),
            Err(ColorParseError::InvalidDigit(_))
        ));
        assert!(matches!(
            SerializableColor::parse("#+ff"),
            Err(ColorParseError::InvalidDigit(_))
        ));
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let color = SerializableColor::new(255, 0, 0, 128);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#ff000080\"");
        let back: SerializableColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
        assert!(serde_json::from_str::<SerializableColor>("\"red\"").is_err());
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::rgb(10, 20, 30);
        let peniko: Color = color.into();
        assert_eq!(SerializableColor::from(peniko), color);
        let faded = color.with_opacity(0.5).to_rgba8();
        assert_eq!(faded.a, 128);
    }
}
