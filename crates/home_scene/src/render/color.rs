//! Packed 24-bit RGB colors

use serde::{Deserialize, Serialize};
use std::fmt;

/// 24-bit RGB color stored as `0xRRGGBB`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(u32);

impl Color {
    /// Pure black
    pub const BLACK: Self = Self(0x000000);

    /// Pure white
    pub const WHITE: Self = Self(0xffffff);

    /// Create a color from a `0xRRGGBB` value; bits above 24 are discarded
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    /// The `0xRRGGBB` value
    pub const fn hex(self) -> u32 {
        self.0
    }

    /// Linear `[r, g, b]` components in `0.0..=1.0`
    pub fn to_rgb(self) -> [f32; 3] {
        let channel = |shift: u32| f32::from(((self.0 >> shift) & 0xff) as u8) / 255.0;
        [channel(16), channel(8), channel(0)]
    }

    /// `[r, g, b, a]` with the given alpha in the last slot
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_rgb();
        [r, g, b, alpha]
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:06x})", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}
