//! Hex color values for placed icons.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Default stroke color for placed icons.
pub const DEFAULT_ICON_COLOR: &str = "#000000";

/// RGB color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HexColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl HexColor {
    /// Creates a color from channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses "#RRGGBB", "RRGGBB", or the short "#RGB" form.
    pub fn from_hex(hex: &str) -> Result<Self> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

        let hex = hex.trim();
        let well_formed = PATTERN
            .get_or_init(|| Regex::new(r"^#?([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").ok())
            .as_ref()
            .is_some_and(|re| re.is_match(hex));
        if !well_formed {
            anyhow::bail!("Invalid hex color '{hex}'. Expected #RRGGBB or #RGB");
        }

        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };

        let r = u8::from_str_radix(&expanded[0..2], 16)
            .context(format!("Invalid red channel in hex color '{hex}'"))?;
        let g = u8::from_str_radix(&expanded[2..4], 16)
            .context(format!("Invalid green channel in hex color '{hex}'"))?;
        let b = u8::from_str_radix(&expanded[4..6], 16)
            .context(format!("Invalid blue channel in hex color '{hex}'"))?;

        Ok(Self::new(r, g, b))
    }

    /// Canonical "#RRGGBB" form (uppercase).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_long_and_short() {
        assert_eq!(HexColor::from_hex("#FF0000").unwrap(), HexColor::new(255, 0, 0));
        assert_eq!(HexColor::from_hex("00ff00").unwrap(), HexColor::new(0, 255, 0));
        assert_eq!(HexColor::from_hex("#abc").unwrap(), HexColor::new(0xAA, 0xBB, 0xCC));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(HexColor::from_hex("").is_err());
        assert!(HexColor::from_hex("#12345").is_err());
        assert!(HexColor::from_hex("#GG0000").is_err());
        assert!(HexColor::from_hex("#ÿÿÿ").is_err());
    }

    #[test]
    fn test_to_hex_round_trip() {
        let color = HexColor::from_hex(DEFAULT_ICON_COLOR).unwrap();
        assert_eq!(color.to_hex(), "#000000");
        assert_eq!(HexColor::new(0, 128, 255).to_string(), "#0080FF");
    }
}
