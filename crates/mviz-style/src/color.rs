#![forbid(unsafe_code)]

use std::fmt;

/// A straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced.
    #[inline]
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Same color with alpha scaled by `opacity` (clamped to `0.0..=1.0`).
    #[must_use]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let opacity = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        let a = (f32::from(self.a) * opacity).round() as u8;
        Self { a, ..self }
    }

    /// Whether the color is fully transparent.
    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(Color::rgb(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Color::rgba(0, 0, 0, 0x80).to_hex(), "#00000080");
    }

    #[test]
    fn opacity_scales_alpha() {
        let c = Color::rgb(10, 20, 30).with_opacity(0.5);
        assert_eq!(c.a, 128);
        assert_eq!((c.r, c.g, c.b), (10, 20, 30));
        assert_eq!(Color::WHITE.with_opacity(2.0).a, 255);
        assert!(Color::WHITE.with_opacity(-1.0).is_transparent());
        assert!(Color::WHITE.with_opacity(f32::NAN).is_transparent());
    }

    #[test]
    fn with_alpha_replaces_alpha_only() {
        let c = Color::rgb(1, 2, 3).with_alpha(7);
        assert_eq!(c, Color::rgba(1, 2, 3, 7));
        assert_eq!(c.to_hex(), "#01020307");
    }
}
