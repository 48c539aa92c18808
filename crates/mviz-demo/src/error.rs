#![forbid(unsafe_code)]

use mviz_runtime::{ConfigError, ControllerError};

pub type Result<T> = std::result::Result<T, CliError>;

pub const EXIT_CONFIG: i32 = 2;
pub const EXIT_INPUT: i32 = 3;
pub const EXIT_IO: i32 = 74;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::Controller(_) => EXIT_INPUT,
            Self::Io(_) => EXIT_IO,
        }
    }
}
