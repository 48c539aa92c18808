#![forbid(unsafe_code)]

//! Errors surfaced by the animation controller and configuration loading.

use std::path::PathBuf;

/// Rejected controller input. State is left untouched when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ControllerError {
    /// Row count outside the host's allowed range.
    #[error("row count {requested} is outside the allowed range {min}..={max}")]
    InvalidRowCount {
        requested: usize,
        min: usize,
        max: usize,
    },
    /// Speed multiplier that is not finite or falls outside the accepted range.
    #[error("speed multiplier {speed} is outside {min}..={max}")]
    InvalidSpeed { speed: f64, min: f64, max: f64 },
}

/// Errors from loading or validating a [`crate::VisualizerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not valid TOML/JSON for this schema.
    #[error("{format} parse error: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
    /// The values parsed but are inconsistent.
    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
