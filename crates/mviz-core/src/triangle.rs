#![forbid(unsafe_code)]

//! Pascal's triangle and the row-major step numbering.
//!
//! Steps are numbered row by row, left to right: step 0 is the apex and row
//! `r` occupies steps `r(r+1)/2 ..= r(r+1)/2 + r`. The visualizer reveals
//! cells in exactly this order.
//!
//! # Example
//! ```
//! use mviz_core::{Cell, RowCount, Triangle, step_to_cell};
//!
//! let triangle = Triangle::build(RowCount::new(3).unwrap());
//! assert_eq!(triangle.row(2), Some(&[1, 2, 1][..]));
//! assert_eq!(triangle.total_steps(), 6);
//! assert_eq!(step_to_cell(4, 3), Ok(Cell::new(2, 1)));
//! ```

use std::fmt;

use crate::cell::Cell;
use crate::error::ModelError;

/// Entry type. `C(63, 31)` is the largest entry of a 64-row triangle and fits.
pub type Value = u64;

/// A validated number of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowCount(usize);

impl RowCount {
    /// Smallest row count the model accepts.
    pub const MIN: usize = 1;
    /// Largest row count whose entries still fit in [`Value`].
    pub const MAX_SUPPORTED: usize = 64;

    /// Validate a row count against the model's own limits.
    pub fn new(rows: usize) -> Result<Self, ModelError> {
        Self::within(rows, Self::MIN, Self::MAX_SUPPORTED)
    }

    /// Validate against a narrower host range (e.g. the 2..=10 slider).
    ///
    /// The host range is intersected with the model limits.
    pub fn within(rows: usize, min: usize, max: usize) -> Result<Self, ModelError> {
        let min = min.max(Self::MIN);
        let max = max.min(Self::MAX_SUPPORTED);
        if rows < min || rows > max {
            return Err(ModelError::InvalidRowCount {
                requested: rows,
                min,
                max,
            });
        }
        Ok(Self(rows))
    }

    /// The row count as a plain number.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }

    /// `n(n+1)/2` for this row count.
    #[inline]
    pub const fn total_steps(self) -> usize {
        total_steps(self.0)
    }
}

impl TryFrom<i64> for RowCount {
    type Error = ModelError;

    fn try_from(rows: i64) -> Result<Self, Self::Error> {
        let requested = usize::try_from(rows).unwrap_or(0);
        Self::new(requested)
    }
}

impl fmt::Display for RowCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Number of cells (and reveal steps) in an `n`-row triangle.
#[inline]
pub const fn total_steps(n: usize) -> usize {
    n * (n + 1) / 2
}

/// First step of `row`.
#[inline]
pub const fn row_start(row: usize) -> usize {
    row * (row + 1) / 2
}

/// Forward mapping: the step at which `cell` is revealed.
#[inline]
pub const fn cell_to_step(cell: Cell) -> usize {
    row_start(cell.row) + cell.col
}

/// Inverse of the row-major numbering.
///
/// Fails with [`ModelError::StepOutOfRange`] when `step >= total_steps(n)`
/// instead of returning a coordinate outside the triangle.
pub fn step_to_cell(step: usize, n: usize) -> Result<Cell, ModelError> {
    let total = total_steps(n);
    if step >= total {
        return Err(ModelError::StepOutOfRange { step, total });
    }
    // Largest r with r(r+1)/2 <= step.
    let row = ((8 * step + 1).isqrt() - 1) / 2;
    Ok(Cell::new(row, step - row_start(row)))
}

/// All cells of an `n`-row triangle in reveal order.
pub fn cells(n: usize) -> impl Iterator<Item = Cell> {
    (0..n).flat_map(|row| (0..=row).map(move |col| Cell::new(row, col)))
}

/// The decomposition `left + right = value` of an interior cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addition {
    /// The cell being explained.
    pub cell: Cell,
    /// Value of `(row-1, col-1)`.
    pub left: Value,
    /// Value of `(row-1, col)`.
    pub right: Value,
    /// Value of `cell`, always `left + right`.
    pub value: Value,
}

impl fmt::Display for Addition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {} = {}", self.left, self.right, self.value)
    }
}

/// Immutable triangle of binomial coefficients.
///
/// Row `r` holds `r + 1` entries and `entry(r, c) = C(r, c)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
    rows: Vec<Vec<Value>>,
    row_count: RowCount,
}

impl Triangle {
    /// Build rows `0..n` with the Pascal recurrence.
    pub fn build(row_count: RowCount) -> Self {
        let n = row_count.get();
        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(n);
        for r in 0..n {
            let row = match rows.last() {
                None => vec![1],
                Some(prev) => {
                    let mut row = Vec::with_capacity(r + 1);
                    row.push(1);
                    row.extend(prev.windows(2).map(|pair| pair[0] + pair[1]));
                    row.push(1);
                    row
                }
            };
            rows.push(row);
        }
        tracing::trace!(rows = n, steps = row_count.total_steps(), "built triangle");
        Self { rows, row_count }
    }

    /// The row count this triangle was built for.
    #[inline]
    pub const fn row_count(&self) -> RowCount {
        self.row_count
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A built triangle always has at least the apex.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of reveal steps (`n(n+1)/2`).
    #[inline]
    pub const fn total_steps(&self) -> usize {
        self.row_count.total_steps()
    }

    /// Whether `cell` lies inside this triangle.
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows.len() && cell.col <= cell.row
    }

    /// Entry at `cell`, or `None` outside the triangle.
    pub fn get(&self, cell: Cell) -> Option<Value> {
        self.rows.get(cell.row)?.get(cell.col).copied()
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> Option<&[Value]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Value]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Inverse step mapping bounded by this triangle.
    pub fn cell_at(&self, step: usize) -> Result<Cell, ModelError> {
        step_to_cell(step, self.rows.len())
    }

    /// The addition that produced an interior cell.
    ///
    /// Edge cells are definitionally 1 and return `None`.
    pub fn addition(&self, cell: Cell) -> Option<Addition> {
        if !cell.is_interior() {
            return None;
        }
        let parents = cell.parents();
        let left = self.get(parents.left?)?;
        let right = self.get(parents.right?)?;
        let value = self.get(cell)?;
        Some(Addition {
            cell,
            left,
            right,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn triangle(n: usize) -> Triangle {
        Triangle::build(RowCount::new(n).unwrap())
    }

    #[test]
    fn three_rows() {
        let t = triangle(3);
        let rows: Vec<Vec<Value>> = t.rows().map(<[Value]>::to_vec).collect();
        assert_eq!(rows, vec![vec![1], vec![1, 1], vec![1, 2, 1]]);
        assert_eq!(t.total_steps(), 6);
    }

    #[test]
    fn sixth_row_values() {
        let t = triangle(7);
        assert_eq!(t.row(6), Some(&[1, 6, 15, 20, 15, 6, 1][..]));
    }

    #[test]
    fn largest_supported_triangle_fits() {
        let t = triangle(RowCount::MAX_SUPPORTED);
        assert_eq!(t.get(Cell::new(63, 31)), Some(916_312_070_471_295_267));
        assert_eq!(t.get(Cell::new(63, 63)), Some(1));
    }

    #[test]
    fn row_count_rejects_zero_and_too_many() {
        assert_eq!(
            RowCount::new(0),
            Err(ModelError::InvalidRowCount {
                requested: 0,
                min: 1,
                max: 64
            })
        );
        assert!(RowCount::new(65).is_err());
        assert!(RowCount::try_from(-3_i64).is_err());
        assert_eq!(RowCount::try_from(4_i64).map(RowCount::get), Ok(4));
    }

    #[test]
    fn row_count_within_host_range() {
        assert!(RowCount::within(1, 2, 10).is_err());
        assert!(RowCount::within(11, 2, 10).is_err());
        assert_eq!(RowCount::within(10, 2, 10).map(RowCount::get), Ok(10));
    }

    #[test]
    fn total_steps_formula() {
        assert_eq!(total_steps(1), 1);
        assert_eq!(total_steps(4), 10);
        assert_eq!(total_steps(10), 55);
    }

    #[test]
    fn step_to_cell_endpoints() {
        assert_eq!(step_to_cell(0, 5), Ok(Cell::new(0, 0)));
        assert_eq!(step_to_cell(14, 5), Ok(Cell::new(4, 4)));
        assert_eq!(
            step_to_cell(15, 5),
            Err(ModelError::StepOutOfRange { step: 15, total: 15 })
        );
    }

    #[test]
    fn step_to_cell_row_boundaries() {
        assert_eq!(step_to_cell(1, 4), Ok(Cell::new(1, 0)));
        assert_eq!(step_to_cell(2, 4), Ok(Cell::new(1, 1)));
        assert_eq!(step_to_cell(3, 4), Ok(Cell::new(2, 0)));
        assert_eq!(step_to_cell(6, 4), Ok(Cell::new(3, 0)));
    }

    #[test]
    fn scenario_reveal_order() {
        let order: Vec<_> = (0..6).map(|s| step_to_cell(s, 3).unwrap()).collect();
        assert_eq!(
            order,
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(1, 1),
                Cell::new(2, 0),
                Cell::new(2, 1),
                Cell::new(2, 2),
            ]
        );
    }

    #[test]
    fn addition_for_interior_only() {
        let t = triangle(5);
        let add = t.addition(Cell::new(2, 1)).unwrap();
        assert_eq!((add.left, add.right, add.value), (1, 1, 2));
        assert_eq!(add.to_string(), "1 + 1 = 2");
        assert_eq!(t.addition(Cell::new(2, 0)), None);
        assert_eq!(t.addition(Cell::new(4, 4)), None);
        assert_eq!(t.addition(Cell::new(7, 3)), None);
    }

    #[test]
    fn contains_and_get_outside() {
        let t = triangle(3);
        assert!(t.contains(Cell::new(2, 2)));
        assert!(!t.contains(Cell::new(3, 0)));
        assert!(!t.contains(Cell::new(1, 2)));
        assert_eq!(t.get(Cell::new(3, 0)), None);
    }
}
