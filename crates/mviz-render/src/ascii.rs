#![forbid(unsafe_code)]

//! Coarse text raster of a [`Frame`] for terminal hosts and snapshots.
//!
//! Pixel coordinates are scaled onto a `cols x lines` character grid. Links
//! become `/`, `\`, `|` or `-` runs, labels are centered on their anchor, and
//! the cell role is shown with brackets: `[v]` for the current step and
//! `<v>` for the active addition. Discs and glows are not drawn.

use unicode_width::UnicodeWidthChar;

use mviz_core::Point;
use mviz_style::CellRole;

use crate::frame::{Frame, Part, Shape, TextAlign};

struct Grid {
    cols: usize,
    lines: usize,
    cells: Vec<char>,
    sx: f32,
    sy: f32,
}

impl Grid {
    fn new(frame: &Frame, cols: usize, lines: usize) -> Self {
        Self {
            cols,
            lines,
            cells: vec![' '; cols * lines],
            sx: cols as f32 / frame.width(),
            sy: lines as f32 / frame.height(),
        }
    }

    fn project(&self, p: Point) -> (i64, i64) {
        (
            (p.x * self.sx).floor() as i64,
            (p.y * self.sy).floor() as i64,
        )
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.cols && y < self.lines).then(|| y * self.cols + x)
    }

    fn put(&mut self, x: i64, y: i64, ch: char) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = ch;
        }
    }

    fn put_if_blank(&mut self, x: i64, y: i64, ch: char) {
        if let Some(idx) = self.index(x, y)
            && self.cells[idx] == ' '
        {
            self.cells[idx] = ch;
        }
    }

    /// Bresenham line between projected endpoints.
    fn line(&mut self, from: Point, to: Point) {
        let (x0, y0) = self.project(from);
        let (x1, y1) = self.project(to);
        let ch = stroke_char(to.x - from.x, to.y - from.y);
        let dx = x1.saturating_sub(x0).saturating_abs();
        let dy = -y1.saturating_sub(y0).saturating_abs();
        // Content that overflows a tiny frame projects far off the grid.
        let limit = 4 * (self.cols + self.lines) as i64;
        if dx > limit || -dy > limit {
            return;
        }
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.put_if_blank(x, y, ch);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += step_x;
            }
            if e2 <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    fn text(&mut self, at: Point, text: &str, align: TextAlign) {
        let width: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
        let (cx, y) = self.project(at);
        let width = width as i64;
        let start = match align {
            TextAlign::Left => cx,
            TextAlign::Center => cx.saturating_sub(width / 2),
            TextAlign::Right => cx.saturating_sub(width),
        };
        for (i, ch) in text.chars().enumerate() {
            self.put(start.saturating_add(i as i64), y, ch);
        }
    }

    fn finish(self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().collect::<String>().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn stroke_char(dx: f32, dy: f32) -> char {
    if dx.abs() < f32::EPSILON {
        '|'
    } else if dy.abs() < dx.abs() * 0.25 {
        '-'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

fn decorate(text: &str, role: CellRole) -> String {
    match role {
        CellRole::Current => format!("[{text}]"),
        CellRole::Active => format!("<{text}>"),
        CellRole::Hidden | CellRole::Revealed => text.to_string(),
    }
}

/// Rasterize `frame` onto a `cols x lines` grid.
///
/// Returns an empty string for an empty frame or a zero-sized grid.
pub fn rasterize(frame: &Frame, cols: usize, lines: usize) -> String {
    if frame.is_empty() || cols == 0 || lines == 0 {
        return String::new();
    }
    let mut grid = Grid::new(frame, cols, lines);

    // Text after strokes so labels are never hidden by a link.
    for cmd in frame.commands() {
        if let Shape::Line { from, to, .. } = cmd.shape {
            grid.line(from, to);
        }
    }
    for cmd in frame.commands() {
        let Shape::Text {
            at, text, align, ..
        } = &cmd.shape
        else {
            continue;
        };
        match cmd.part {
            Part::Cell { role, .. } => grid.text(*at, &decorate(text, role), *align),
            _ => grid.text(*at, text, *align),
        }
    }
    grid.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangle_view::{RenderInput, render_triangle};
    use mviz_core::{Cell, RowCount, Triangle, Viewport};
    use mviz_style::StyleSheet;

    fn raster(step: Option<usize>, active: Option<Cell>) -> String {
        let t = Triangle::build(RowCount::new(3).unwrap());
        let frame = render_triangle(
            &RenderInput {
                triangle: &t,
                step,
                active,
                viewport: Viewport::new(480.0, 320.0),
            },
            &StyleSheet::default(),
        );
        rasterize(&frame, 60, 20)
    }

    #[test]
    fn stroke_chars() {
        assert_eq!(stroke_char(0.0, 5.0), '|');
        assert_eq!(stroke_char(5.0, 0.1), '-');
        assert_eq!(stroke_char(3.0, 3.0), '\\');
        assert_eq!(stroke_char(-3.0, 3.0), '/');
    }

    #[test]
    fn hidden_triangle_shows_only_markers() {
        let out = raster(None, None);
        assert_eq!(out.matches('?').count(), 6);
        assert!(out.contains("0/6 (0%)"));
        assert!(!out.contains('1') && !out.contains('2'), "{out}");
    }

    #[test]
    fn active_cell_is_angle_bracketed() {
        let out = raster(Some(4), Some(Cell::new(2, 1)));
        assert!(out.contains("<2>"), "{out}");
        assert!(out.contains("1 + 1 = 2"), "{out}");
        assert_eq!(out.matches('?').count(), 1);
    }

    #[test]
    fn current_cell_is_square_bracketed() {
        let out = raster(Some(1), None);
        assert!(out.contains("[1]"), "{out}");
    }

    #[test]
    fn empty_frame_rasterizes_to_nothing() {
        assert_eq!(rasterize(&Frame::empty(0.0, 0.0), 10, 10), "");
        assert_eq!(rasterize(&Frame::new(10.0, 10.0), 0, 10), "");
    }
}
