//! RGB colors as written in scene documents

use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit RGB color
///
/// Deserializes from an integer, `"0xRRGGBB"` or `"#RRGGBB"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "u32")]
pub struct Color(pub u32);

impl Color {
    /// White
    pub const WHITE: Color = Color(0xFF_FFFF);
    /// Magenta, used for objects without a material
    pub const MISSING: Color = Color(0xFF_00FF);
    /// Default scene background
    pub const BACKGROUND: Color = Color(0x10_1010);
    /// Debug bounding box yellow
    pub const DEBUG: Color = Color(0xFF_FF00);

    /// Parse `0xRRGGBB`, `#RRGGBB` or a plain decimal integer
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).ok()?
        } else if let Some(hex) = text.strip_prefix('#') {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            text.parse().ok()?
        };
        (value <= 0xFF_FFFF).then_some(Self(value))
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:06X}", self.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Int(u32),
    Text(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Int(value) if value <= 0xFF_FFFF => Ok(Self(value)),
            ColorRepr::Int(value) => Err(format!("color out of range: {value}")),
            ColorRepr::Text(text) => Self::parse(&text).ok_or_else(|| format!("invalid color: {text:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(Color::parse("0x101010"), Some(Color(0x10_1010)));
        assert_eq!(Color::parse("#ff0000"), Some(Color(0xFF_0000)));
        assert_eq!(Color::parse("255"), Some(Color(255)));
        assert_eq!(Color::parse("0x1000000"), None);
        assert_eq!(Color::parse("red"), None);
    }

    #[test]
    fn test_deserialize_string_and_int() {
        let colors: Vec<Color> = serde_json::from_str(r#"["0xFFFFFF", 16711680]"#).unwrap();
        assert_eq!(colors, vec![Color::WHITE, Color(0xFF_0000)]);
        assert!(serde_json::from_str::<Color>(r#""nope""#).is_err());
    }
}
