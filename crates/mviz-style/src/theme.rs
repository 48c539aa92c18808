#![forbid(unsafe_code)]

//! Theme system with semantic color slots.
//!
//! A [`Theme`] maps semantic names ("placeholder", "current step", "active
//! link") to colors that may differ between light and dark mode. The host
//! picks a [`ThemeMode`]; [`Theme::resolve`] flattens every slot to a fixed
//! color for that mode.
//!
//! # Example
//! ```
//! use mviz_style::{Color, Theme, ThemeMode};
//!
//! let theme = Theme::default();
//! let light = theme.resolve(ThemeMode::Light);
//! let dark = theme.resolve(ThemeMode::Dark);
//! assert_ne!(light.background, dark.background);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::color::Color;

/// Light or dark presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[inline]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// The other mode.
    #[inline]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// Returned when a theme name is neither `light` nor `dark`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThemeModeError(pub String);

impl fmt::Display for ParseThemeModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown theme mode {:?} (expected \"light\" or \"dark\")", self.0)
    }
}

impl std::error::Error for ParseThemeModeError {}

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ParseThemeModeError(s.to_string())),
        }
    }
}

/// An adaptive color that can change based on light/dark mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveColor {
    /// A fixed color that doesn't change with mode.
    Fixed(Color),
    /// A color that adapts to light/dark mode.
    Adaptive {
        /// Color to use in light mode.
        light: Color,
        /// Color to use in dark mode.
        dark: Color,
    },
}

impl AdaptiveColor {
    /// Create a fixed color.
    #[inline]
    pub const fn fixed(color: Color) -> Self {
        Self::Fixed(color)
    }

    /// Create an adaptive color with light/dark variants.
    #[inline]
    pub const fn adaptive(light: Color, dark: Color) -> Self {
        Self::Adaptive { light, dark }
    }

    /// Resolve the color for `mode`.
    #[inline]
    pub const fn resolve(&self, mode: ThemeMode) -> Color {
        match self {
            Self::Fixed(c) => *c,
            Self::Adaptive { light, dark } => {
                if mode.is_dark() {
                    *dark
                } else {
                    *light
                }
            }
        }
    }

    /// Check if this color adapts to mode.
    #[inline]
    pub const fn is_adaptive(&self) -> bool {
        matches!(self, Self::Adaptive { .. })
    }
}

impl From<Color> for AdaptiveColor {
    fn from(color: Color) -> Self {
        Self::Fixed(color)
    }
}

/// Semantic color slots for the triangle diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Canvas background.
    pub background: AdaptiveColor,
    /// Values and general text.
    pub text: AdaptiveColor,
    /// Secondary text (progress readout).
    pub text_muted: AdaptiveColor,
    /// Fill of cells not yet revealed.
    pub placeholder: AdaptiveColor,
    /// The unknown-value marker on placeholders.
    pub placeholder_text: AdaptiveColor,
    /// Fill of revealed interior cells.
    pub cell: AdaptiveColor,
    /// Outline of revealed interior cells.
    pub cell_border: AdaptiveColor,
    /// Fill of revealed edge cells (the 1s).
    pub edge_cell: AdaptiveColor,
    /// Outline of revealed edge cells.
    pub edge_border: AdaptiveColor,
    /// Fill of the cell at the current step.
    pub current: AdaptiveColor,
    /// Fill of the current cell while its addition is explained.
    pub active: AdaptiveColor,
    /// Glow ring around the current cell.
    pub glow: AdaptiveColor,
    /// Parent-to-child links, at rest.
    pub link: AdaptiveColor,
    /// Links feeding the active addition.
    pub link_active: AdaptiveColor,
    /// Formula annotation text.
    pub formula: AdaptiveColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: AdaptiveColor::adaptive(Color::rgb(248, 250, 252), Color::rgb(15, 23, 42)),
            text: AdaptiveColor::adaptive(Color::rgb(15, 23, 42), Color::rgb(241, 245, 249)),
            text_muted: AdaptiveColor::adaptive(
                Color::rgb(100, 116, 139),
                Color::rgb(148, 163, 184),
            ),
            placeholder: AdaptiveColor::adaptive(
                Color::rgb(226, 232, 240),
                Color::rgb(30, 41, 59),
            ),
            placeholder_text: AdaptiveColor::adaptive(
                Color::rgb(148, 163, 184),
                Color::rgb(71, 85, 105),
            ),
            cell: AdaptiveColor::adaptive(Color::rgb(255, 255, 255), Color::rgb(51, 65, 85)),
            cell_border: AdaptiveColor::adaptive(
                Color::rgb(148, 163, 184),
                Color::rgb(100, 116, 139),
            ),
            edge_cell: AdaptiveColor::adaptive(
                Color::rgb(219, 234, 254),
                Color::rgb(30, 58, 138),
            ),
            edge_border: AdaptiveColor::fixed(Color::rgb(59, 130, 246)),
            current: AdaptiveColor::adaptive(Color::rgb(254, 243, 199), Color::rgb(120, 53, 15)),
            active: AdaptiveColor::adaptive(Color::rgb(220, 252, 231), Color::rgb(20, 83, 45)),
            glow: AdaptiveColor::adaptive(Color::rgb(245, 158, 11), Color::rgb(251, 191, 36)),
            link: AdaptiveColor::adaptive(Color::rgb(203, 213, 225), Color::rgb(71, 85, 105)),
            link_active: AdaptiveColor::fixed(Color::rgb(34, 197, 94)),
            formula: AdaptiveColor::adaptive(Color::rgb(21, 128, 61), Color::rgb(134, 239, 172)),
        }
    }
}

impl Theme {
    /// Flatten every slot for `mode`.
    #[must_use]
    pub fn resolve(&self, mode: ThemeMode) -> ResolvedTheme {
        ResolvedTheme {
            mode,
            background: self.background.resolve(mode),
            text: self.text.resolve(mode),
            text_muted: self.text_muted.resolve(mode),
            placeholder: self.placeholder.resolve(mode),
            placeholder_text: self.placeholder_text.resolve(mode),
            cell: self.cell.resolve(mode),
            cell_border: self.cell_border.resolve(mode),
            edge_cell: self.edge_cell.resolve(mode),
            edge_border: self.edge_border.resolve(mode),
            current: self.current.resolve(mode),
            active: self.active.resolve(mode),
            glow: self.glow.resolve(mode),
            link: self.link.resolve(mode),
            link_active: self.link_active.resolve(mode),
            formula: self.formula.resolve(mode),
        }
    }
}

/// A theme with all colors fixed for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub mode: ThemeMode,
    pub background: Color,
    pub text: Color,
    pub text_muted: Color,
    pub placeholder: Color,
    pub placeholder_text: Color,
    pub cell: Color,
    pub cell_border: Color,
    pub edge_cell: Color,
    pub edge_border: Color,
    pub current: Color,
    pub active: Color,
    pub glow: Color,
    pub link: Color,
    pub link_active: Color,
    pub formula: Color,
}
