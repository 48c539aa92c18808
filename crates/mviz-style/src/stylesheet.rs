#![forbid(unsafe_code)]

//! Per-visual-state styles consumed by the render engine.
//!
//! The renderer classifies every cell into a [`CellRole`] plus an independent
//! edge flag and looks up the matching [`CellStyle`] here. Glow rings and link
//! emphasis are plain data on the resolved style; there is no animation
//! resource to register at runtime.

use crate::color::Color;
use crate::theme::{ResolvedTheme, Theme, ThemeMode};

/// Visual role of a cell for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRole {
    /// Not revealed yet: dimmed placeholder with an unknown-value marker.
    Hidden,
    /// Revealed earlier.
    Revealed,
    /// Revealed at the current step.
    Current,
    /// Current step and the addition being explained.
    Active,
}

impl CellRole {
    const ALL: [CellRole; 4] = [
        CellRole::Hidden,
        CellRole::Revealed,
        CellRole::Current,
        CellRole::Active,
    ];

    const fn index(self) -> usize {
        match self {
            CellRole::Hidden => 0,
            CellRole::Revealed => 1,
            CellRole::Current => 2,
            CellRole::Active => 3,
        }
    }

    /// Whether a cell in this role shows its value.
    #[inline]
    pub const fn is_revealed(self) -> bool {
        !matches!(self, CellRole::Hidden)
    }
}

/// Text color and weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub bold: bool,
}

/// Soft ring drawn behind an emphasized cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowStyle {
    pub color: Color,
    /// Ring radius as a multiple of the cell radius.
    pub spread: f32,
}

/// Fill, outline, label and optional glow of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub fill: Color,
    pub border: Color,
    pub border_width: f32,
    pub text: TextStyle,
    pub glow: Option<GlowStyle>,
    /// Multiplier on the cell radius (emphasized cells are drawn larger).
    pub scale: f32,
}

/// Stroke of a parent-to-child link.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    pub color: Color,
    pub width: f32,
}

/// Every style the triangle renderer needs, resolved for one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSheet {
    mode: ThemeMode,
    background: Color,
    cells: [CellStyle; 4],
    edge_fill: Color,
    edge_border: Color,
    link: LinkStyle,
    link_active: LinkStyle,
    formula: TextStyle,
    progress: TextStyle,
}

impl StyleSheet {
    /// Resolve `theme` for `mode`.
    ///
    /// Hosts call this once at startup and again when the mode changes.
    #[must_use]
    pub fn resolve(theme: &Theme, mode: ThemeMode) -> Self {
        let palette = theme.resolve(mode);
        tracing::debug!(mode = %mode, "resolved stylesheet");
        Self::from_palette(&palette)
    }

    fn from_palette(p: &ResolvedTheme) -> Self {
        let cells = CellRole::ALL.map(|role| match role {
            CellRole::Hidden => CellStyle {
                fill: p.placeholder.with_opacity(0.6),
                border: p.placeholder_text.with_opacity(0.4),
                border_width: 1.0,
                text: TextStyle {
                    color: p.placeholder_text,
                    bold: false,
                },
                glow: None,
                scale: 1.0,
            },
            CellRole::Revealed => CellStyle {
                fill: p.cell,
                border: p.cell_border,
                border_width: 1.5,
                text: TextStyle {
                    color: p.text,
                    bold: false,
                },
                glow: None,
                scale: 1.0,
            },
            CellRole::Current => CellStyle {
                fill: p.current,
                border: p.glow,
                border_width: 2.5,
                text: TextStyle {
                    color: p.text,
                    bold: true,
                },
                glow: Some(GlowStyle {
                    color: p.glow.with_opacity(0.35),
                    spread: 1.35,
                }),
                scale: 1.1,
            },
            CellRole::Active => CellStyle {
                fill: p.active,
                border: p.link_active,
                border_width: 2.5,
                text: TextStyle {
                    color: p.text,
                    bold: true,
                },
                glow: Some(GlowStyle {
                    color: p.link_active.with_opacity(0.4),
                    spread: 1.45,
                }),
                scale: 1.15,
            },
        });
        Self {
            mode: p.mode,
            background: p.background,
            cells,
            edge_fill: p.edge_cell,
            edge_border: p.edge_border,
            link: LinkStyle {
                color: p.link.with_opacity(0.7),
                width: 1.5,
            },
            link_active: LinkStyle {
                color: p.link_active,
                width: 3.0,
            },
            formula: TextStyle {
                color: p.formula,
                bold: true,
            },
            progress: TextStyle {
                color: p.text_muted,
                bold: false,
            },
        }
    }

    /// Mode this sheet was resolved for.
    #[inline]
    pub const fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Canvas background.
    #[inline]
    pub const fn background(&self) -> Color {
        self.background
    }

    /// Style for a cell in `role`.
    ///
    /// Revealed edge cells keep the edge outline in every role; at rest they
    /// also use the edge fill. Hidden cells never get edge treatment.
    pub fn cell(&self, role: CellRole, edge: bool) -> CellStyle {
        let mut style = self.cells[role.index()];
        if edge && role.is_revealed() {
            style.border = self.edge_border;
            if role == CellRole::Revealed {
                style.fill = self.edge_fill;
                style.border_width = 2.0;
            }
        }
        style
    }

    /// Link style, emphasized for the active addition.
    #[inline]
    pub const fn link(&self, active: bool) -> LinkStyle {
        if active { self.link_active } else { self.link }
    }

    /// Formula annotation text.
    #[inline]
    pub const fn formula(&self) -> TextStyle {
        self.formula
    }

    /// Progress readout text.
    #[inline]
    pub const fn progress(&self) -> TextStyle {
        self.progress
    }
}

impl Default for StyleSheet {
    fn default() -> Self {
        Self::resolve(&Theme::default(), ThemeMode::default())
    }
}
