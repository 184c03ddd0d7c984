use crate::foundation::error::{GifError, GifResult};
use std::fmt;

/// 0-based position of a frame in the frame queue.
///
/// Task dispatch, result addressing and reassembly are all keyed by this index.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

impl fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Straight-alpha RGBA8 color.
///
/// Deserializes from a hex string (see [`Rgba8::from_hex`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the default background.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> GifResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || GifError::validation(format!("invalid hex color '{s}'"));
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| bad());
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => Ok(Self {
                r: nibble(0)? * 17,
                g: nibble(1)? * 17,
                b: nibble(2)? * 17,
                a: 255,
            }),
            6 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: 255,
            }),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(bad()),
        }
    }

    /// Channels as an `image` pixel.
    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = GifError;

    fn try_from(s: String) -> GifResult<Self> {
        Self::from_hex(&s)
    }
}

impl Default for Rgba8 {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Opaque RGB8 color, used as the GIF transparency marker.
///
/// Deserializes from a packed `0xRRGGBB` integer or a hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(try_from = "ColorValue")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build from a packed `0xRRGGBB` integer.
    pub fn from_u32(v: u32) -> GifResult<Self> {
        if v > 0x00FF_FFFF {
            return Err(GifError::validation(format!(
                "transparent color 0x{v:X} exceeds 0xFFFFFF"
            )));
        }
        Ok(Self {
            r: (v >> 16) as u8,
            g: (v >> 8) as u8,
            b: v as u8,
        })
    }

    /// Packed `0xRRGGBB` form.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

/// Wire forms accepted for [`Rgb8`].
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// Packed `0xRRGGBB`.
    Packed(u32),
    /// Hex string; any alpha component is ignored.
    Hex(String),
}

impl TryFrom<ColorValue> for Rgb8 {
    type Error = GifError;

    fn try_from(v: ColorValue) -> GifResult<Self> {
        match v {
            ColorValue::Packed(n) => Self::from_u32(n),
            ColorValue::Hex(s) => {
                let c = Rgba8::from_hex(&s)?;
                Ok(Self {
                    r: c.r,
                    g: c.g,
                    b: c.b,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
