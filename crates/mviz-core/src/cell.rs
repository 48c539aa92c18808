#![forbid(unsafe_code)]

//! Cell coordinates inside the triangle.

use std::fmt;

/// A `(row, col)` coordinate, both 0-indexed, with `col <= row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    /// Create a cell coordinate.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// First or last cell of its row. Always valued 1, never a sum.
    #[inline]
    pub const fn is_edge(self) -> bool {
        self.col == 0 || self.col == self.row
    }

    /// Strictly between the edges: `0 < col < row`.
    #[inline]
    pub const fn is_interior(self) -> bool {
        !self.is_edge()
    }

    /// The cells in the previous row that feed this one.
    ///
    /// Row 0 has no parents; edge cells have exactly one.
    pub const fn parents(self) -> Parents {
        if self.row == 0 {
            return Parents {
                left: None,
                right: None,
            };
        }
        let above = self.row - 1;
        let left = if self.col >= 1 {
            Some(Cell::new(above, self.col - 1))
        } else {
            None
        };
        let right = if self.col <= above {
            Some(Cell::new(above, self.col))
        } else {
            None
        };
        Parents { left, right }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Up to two parents of a cell: `(row-1, col-1)` and `(row-1, col)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parents {
    pub left: Option<Cell>,
    pub right: Option<Cell>,
}

impl Parents {
    /// Iterate the parents that exist, left first.
    pub fn iter(self) -> impl Iterator<Item = Cell> {
        self.left.into_iter().chain(self.right)
    }

    /// Number of existing parents (0, 1 or 2).
    pub fn len(self) -> usize {
        usize::from(self.left.is_some()) + usize::from(self.right.is_some())
    }

    /// True for the apex.
    pub fn is_empty(self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
