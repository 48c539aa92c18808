#![forbid(unsafe_code)]

//! Style vocabulary for the mviz renderer.
//!
//! # This crate provides
//! - [`Color`]: straight RGBA8 colors with opacity helpers.
//! - [`Theme`] and [`AdaptiveColor`]: semantic color slots with light/dark
//!   variants, selected by [`ThemeMode`].
//! - [`StyleSheet`]: the per-visual-state styles the render engine consumes,
//!   resolved once from a theme and a mode.
//!
//! The stylesheet is an explicit value the host builds at startup (and again
//! only when the mode changes). Nothing here is global or lazily injected.

/// RGBA color type.
pub mod color;
/// Resolved styles per cell role.
pub mod stylesheet;
/// Theme slots and light/dark resolution.
pub mod theme;

pub use color::Color;
pub use stylesheet::{CellRole, CellStyle, GlowStyle, LinkStyle, StyleSheet, TextStyle};
pub use theme::{AdaptiveColor, ParseThemeModeError, ResolvedTheme, Theme, ThemeMode};
