#![forbid(unsafe_code)]

//! Combinatorial model for the Pascal's triangle visualizer.
//!
//! # Role in mviz
//! `mviz-core` is the pure, stateless layer underneath the animation
//! controller and the render engine. It knows how to build a triangle of
//! binomial coefficients for a validated row count and how to translate a
//! linear reveal step into a `(row, col)` cell and back.
//!
//! # This crate provides
//! - [`Triangle`] built from a [`RowCount`] via the Pascal recurrence.
//! - [`Cell`] coordinates with edge/interior classification and parents.
//! - Row-major step numbering: [`total_steps`], [`step_to_cell`],
//!   [`cell_to_step`], [`cells`].
//! - [`Addition`]: the `left + right = value` decomposition of an interior cell.
//! - [`Progress`]: the `(stepIndex + 1)/total` readout shared by controller
//!   notifications and the renderer.
//! - Pixel geometry shared with the render engine ([`Point`], [`Viewport`]).
//!
//! Nothing in here owns mutable state; a triangle is immutable once built and
//! can be shared freely with the renderer.

pub mod cell;
pub mod error;
pub mod geometry;
pub mod progress;
pub mod triangle;

pub use cell::{Cell, Parents};
pub use error::ModelError;
pub use geometry::{Point, Viewport};
pub use progress::Progress;
pub use triangle::{
    Addition, RowCount, Triangle, Value, cell_to_step, cells, row_start, step_to_cell,
    total_steps,
};
