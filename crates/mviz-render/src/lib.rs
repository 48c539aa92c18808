#![forbid(unsafe_code)]

//! Layout and render engine for the Pascal's triangle diagram.
//!
//! # Role in mviz
//! `mviz-render` is a pure function of (triangle, step, active addition,
//! viewport, stylesheet) to a [`Frame`]. It owns no state: the runtime calls
//! it after every state change, on resize, and on theme change.
//!
//! # Primary responsibilities
//! - **Frame**: a display list of lines, discs and text plus per-cell hit
//!   regions for hover/click.
//! - **TriangleLayout**: responsive cell size and cell centers.
//! - **render_triangle**: per-cell visual state, parent links, formula
//!   annotation, and progress readout.
//! - **ascii**: a coarse text raster of a frame for terminal hosts.

pub mod ascii;
pub mod frame;
pub mod layout;
pub mod triangle_view;

pub use frame::{CellHit, DrawCmd, Frame, Part, Shape, TextAlign};
pub use layout::TriangleLayout;
pub use triangle_view::{CellVisual, RenderInput, classify, render_triangle};
