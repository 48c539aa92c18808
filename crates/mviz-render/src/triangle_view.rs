#![forbid(unsafe_code)]

//! The render engine: triangle state in, [`Frame`] out.
//!
//! Every cell is classified on its own each frame:
//!
//! | step of cell        | role            | shows            |
//! |---------------------|-----------------|------------------|
//! | `> stepIndex`       | `Hidden`        | `?` placeholder  |
//! | `< stepIndex`       | `Revealed`      | value            |
//! | `== stepIndex`      | `Current`       | value, glow      |
//! | `==`, active target | `Active`        | value, glow, formula, bright links |
//!
//! Revealed edge cells additionally keep the edge outline in every role.

use mviz_core::{Cell, Point, Progress, Triangle, Viewport, cell_to_step, cells};
use mviz_style::{CellRole, StyleSheet};

use crate::frame::{CellHit, Frame, Part, Shape, TextAlign};
use crate::layout::TriangleLayout;

/// Everything the engine reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub triangle: &'a Triangle,
    /// Last revealed step, `None` before the first reveal.
    pub step: Option<usize>,
    /// The interior cell whose addition is being explained.
    pub active: Option<Cell>,
    pub viewport: Viewport,
}

/// Role plus the edge flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellVisual {
    pub role: CellRole,
    /// Revealed edge cell. Always false while hidden.
    pub edge: bool,
}

/// Classify `cell` against the current step and active addition.
pub fn classify(cell: Cell, step: Option<usize>, active: Option<Cell>) -> CellVisual {
    let cell_step = cell_to_step(cell);
    let role = match step {
        Some(current) if cell_step < current => CellRole::Revealed,
        Some(current) if cell_step == current => {
            if active == Some(cell) {
                CellRole::Active
            } else {
                CellRole::Current
            }
        }
        _ => CellRole::Hidden,
    };
    CellVisual {
        role,
        edge: role.is_revealed() && cell.is_edge(),
    }
}

/// Label font size for a disc of diameter `cell` holding `chars` characters.
fn label_size(cell: f32, chars: usize) -> f32 {
    let base = cell * 0.42;
    if chars <= 3 {
        base
    } else {
        base * 3.0 / chars as f32
    }
}

/// Render the triangle.
///
/// A degenerate viewport yields an empty frame; the host retries once it has
/// a real size. A step beyond the triangle is a caller bug and is clamped in
/// release builds.
pub fn render_triangle(input: &RenderInput<'_>, sheet: &StyleSheet) -> Frame {
    let RenderInput {
        triangle,
        step,
        active,
        viewport,
    } = *input;

    let Some(layout) = TriangleLayout::compute(triangle.len(), viewport) else {
        tracing::trace!(
            width = viewport.width,
            height = viewport.height,
            "degenerate viewport, empty frame"
        );
        return Frame::empty(viewport.width, viewport.height);
    };

    let total = triangle.total_steps();
    debug_assert!(
        step.is_none_or(|s| s < total),
        "step {step:?} out of range for {total} steps"
    );
    let step = step.map(|s| s.min(total - 1));

    let mut frame = Frame::new(viewport.width, viewport.height);
    frame.push(
        Part::Background,
        Shape::Rect {
            origin: Point::new(0.0, 0.0),
            width: viewport.width,
            height: viewport.height,
            fill: sheet.background(),
        },
    );

    let n = triangle.len();
    let radius = layout.radius();
    let visuals: Vec<(Cell, CellVisual)> = cells(n)
        .map(|cell| (cell, classify(cell, step, active)))
        .collect();

    // Links first so discs paint over their ends.
    for &(cell, visual) in &visuals {
        if !visual.role.is_revealed() {
            continue;
        }
        let is_active = visual.role == CellRole::Active;
        let link = sheet.link(is_active);
        let child = layout.center(cell);
        for parent in cell.parents().iter() {
            let from = layout.center(parent);
            frame.push(
                Part::Link {
                    from: parent,
                    to: cell,
                    active: is_active,
                },
                Shape::Line {
                    from: from.towards(child, radius),
                    to: child.towards(from, radius),
                    color: link.color,
                    width: link.width,
                },
            );
        }
    }

    for &(cell, visual) in &visuals {
        let style = sheet.cell(visual.role, visual.edge);
        let center = layout.center(cell);
        let r = radius * style.scale;
        if let Some(glow) = style.glow {
            frame.push(
                Part::Glow(cell),
                Shape::Circle {
                    center,
                    radius: r * glow.spread,
                    fill: glow.color,
                    stroke: glow.color.with_alpha(0),
                    stroke_width: 0.0,
                },
            );
        }
        let part = Part::Cell {
            cell,
            role: visual.role,
            edge: visual.edge,
        };
        frame.push(
            part,
            Shape::Circle {
                center,
                radius: r,
                fill: style.fill,
                stroke: style.border,
                stroke_width: style.border_width,
            },
        );
        // Hidden cells must never carry their value.
        let text = if visual.role.is_revealed() {
            triangle.get(cell).map_or_else(String::new, |v| v.to_string())
        } else {
            "?".to_string()
        };
        frame.push(
            part,
            Shape::Text {
                at: center,
                size: label_size(layout.cell_size() * style.scale, text.len()),
                text,
                color: style.text.color,
                bold: style.text.bold,
                align: TextAlign::Center,
            },
        );
        frame.register_hit(CellHit {
            cell,
            center,
            radius,
        });
    }

    let current = step.and_then(|s| triangle.cell_at(s).ok());
    if let Some(addition) = active
        .filter(|cell| Some(*cell) == current)
        .and_then(|cell| triangle.addition(cell))
    {
        let formula = sheet.formula();
        frame.push(
            Part::Formula,
            Shape::Text {
                at: layout.formula_anchor(),
                text: addition.to_string(),
                color: formula.color,
                size: layout.cell_size() * 0.45,
                bold: formula.bold,
                align: TextAlign::Center,
            },
        );
    }

    let progress = sheet.progress();
    frame.push(
        Part::Progress,
        Shape::Text {
            at: layout.progress_anchor(),
            text: Progress::new(step, total).to_string(),
            color: progress.color,
            size: 14.0,
            bold: progress.bold,
            align: TextAlign::Center,
        },
    );

    tracing::trace!(
        rows = n,
        step = ?step,
        cell_size = layout.cell_size(),
        commands = frame.commands().len(),
        "rendered triangle"
    );
    frame
}
