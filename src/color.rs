//! Display colors
//!
//! Fighters carry a `#RRGGBB` color from the catalog; the renderer and the
//! hit overlay both consume it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional, case-insensitive)
    pub fn from_hex(s: &str) -> Result<Self, CatalogError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(CatalogError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| CatalogError::InvalidColor(s.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// CSS hex form, e.g. `#FF3131`
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    /// CSS `#RRGGBBAA` form with the given alpha (0.0 - 1.0)
    pub fn to_hex_alpha(self, alpha: f32) -> String {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("{}{:02X}", self, a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::from_hex("#FF3131").unwrap(), Color::rgb(0xFF, 0x31, 0x31));
        assert_eq!(Color::from_hex("3154ff").unwrap(), Color::rgb(0x31, 0x54, 0xFF));
    }

    #[test]
    fn test_reject_malformed() {
        assert!(Color::from_hex("#FFF").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
        assert!(Color::from_hex("#FF31311").is_err());
    }

    #[test]
    fn test_hex_output() {
        let c = Color::rgb(0x31, 0x54, 0xFF);
        assert_eq!(c.to_hex(), "#3154FF");
        // 0x20 / 255 ~= 0.125, the faint ring fill of the hit overlay
        assert_eq!(c.to_hex_alpha(32.0 / 255.0), "#3154FF20");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(255, 49, 49)).unwrap();
        assert_eq!(json, "\"#FF3131\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(255, 49, 49));
    }
}
