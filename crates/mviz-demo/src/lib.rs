#![forbid(unsafe_code)]

//! Headless host for the Pascal's triangle visualizer.
//!
//! Parses flags, builds a [`mviz_runtime::Visualizer`], and prints a text
//! raster of each frame together with the progress readout. `--play` runs
//! auto-advance on a deterministic clock; `--live` uses ticker threads and
//! wall-clock time instead.

pub mod cli;
pub mod error;
pub mod logging;

pub use cli::{Cli, run, run_from_env};
pub use error::{CliError, Result};
