#![forbid(unsafe_code)]

//! Responsive placement of triangle cells.
//!
//! Cell size is `clamp(MIN_CELL, MAX_CELL, min(w/(n+2), (h-60)/(n+1)))`.
//! Rows are stacked top to bottom and each row is centered on its own; cells
//! in a row sit `1.25 * cell` apart and rows sit `cell + 2 * CELL_GAP` apart.
//! The 60px vertical reserve holds the progress readout above the triangle
//! and the formula banner below it.

use mviz_core::{Cell, Point, Viewport};

/// Smallest cell diameter, keeps large triangles legible.
pub const MIN_CELL: f32 = 32.0;
/// Largest cell diameter, keeps small triangles from ballooning.
pub const MAX_CELL: f32 = 48.0;
/// Vertical space not available to rows.
pub const VERTICAL_RESERVE: f32 = 60.0;
/// Band above the first row (progress readout).
pub const TOP_RESERVE: f32 = 40.0;
/// Band below the last row (formula banner).
pub const BOTTOM_RESERVE: f32 = VERTICAL_RESERVE - TOP_RESERVE;
/// Gap added above and below every row.
pub const CELL_GAP: f32 = 6.0;
/// Horizontal distance between neighbours, in cell diameters.
pub const HORIZONTAL_SPACING: f32 = 1.25;

/// Cell diameter for `rows` rows in `viewport`.
pub fn cell_size(rows: usize, viewport: Viewport) -> f32 {
    let n = rows as f32;
    let by_width = viewport.width / (n + 2.0);
    let by_height = (viewport.height - VERTICAL_RESERVE) / (n + 1.0);
    by_width.min(by_height).clamp(MIN_CELL, MAX_CELL)
}

/// Positions of every cell for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleLayout {
    rows: usize,
    viewport: Viewport,
    cell_size: f32,
}

impl TriangleLayout {
    /// Lay out `rows` rows, or `None` for a degenerate viewport.
    pub fn compute(rows: usize, viewport: Viewport) -> Option<Self> {
        if viewport.is_degenerate() || rows == 0 {
            return None;
        }
        Some(Self {
            rows,
            viewport,
            cell_size: cell_size(rows, viewport),
        })
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Cell diameter.
    #[inline]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Disc radius.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.cell_size / 2.0
    }

    /// Distance between neighbouring centers in a row.
    #[inline]
    pub fn horizontal_step(&self) -> f32 {
        self.cell_size * HORIZONTAL_SPACING
    }

    /// Distance between row centers.
    #[inline]
    pub fn vertical_step(&self) -> f32 {
        self.cell_size + 2.0 * CELL_GAP
    }

    fn first_row_y(&self) -> f32 {
        TOP_RESERVE + CELL_GAP + self.radius()
    }

    /// Center of `cell`.
    pub fn center(&self, cell: Cell) -> Point {
        let offset = cell.col as f32 - cell.row as f32 / 2.0;
        Point::new(
            self.viewport.width / 2.0 + offset * self.horizontal_step(),
            self.first_row_y() + cell.row as f32 * self.vertical_step(),
        )
    }

    /// Baseline of the progress readout.
    pub fn progress_anchor(&self) -> Point {
        Point::new(self.viewport.width / 2.0, TOP_RESERVE / 2.0)
    }

    /// Baseline of the formula banner, under the last row.
    ///
    /// Sits in the bottom reserve, or right below the triangle when the
    /// viewport is taller than the rows need.
    pub fn formula_anchor(&self) -> Point {
        let below_rows = self.first_row_y()
            + (self.rows as f32 - 1.0) * self.vertical_step()
            + self.radius()
            + CELL_GAP
            + BOTTOM_RESERVE / 2.0;
        let floor = self.viewport.height - BOTTOM_RESERVE / 2.0;
        Point::new(self.viewport.width / 2.0, below_rows.min(floor))
    }

    /// The cell whose disc contains `point`.
    pub fn hit_test(&self, point: Point) -> Option<Cell> {
        let row = ((point.y - self.first_row_y()) / self.vertical_step()).round();
        if !(0.0..self.rows as f32).contains(&row) {
            return None;
        }
        let row = row as usize;
        let col = ((point.x - self.viewport.width / 2.0) / self.horizontal_step()
            + row as f32 / 2.0)
            .round();
        if !(0.0..=row as f32).contains(&col) {
            return None;
        }
        let cell = Cell::new(row, col as usize);
        let r = self.radius();
        (self.center(cell).distance_squared(point) <= r * r).then_some(cell)
    }
}
