#![forbid(unsafe_code)]

//! Typed errors for the combinatorial model.

/// Errors reported by the combinatorial model.
///
/// `InvalidRowCount` is the only variant a user can trigger; `StepOutOfRange`
/// means a caller asked for a step it should have clamped first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Row count outside the supported range.
    #[error("row count {requested} is outside the allowed range {min}..={max}")]
    InvalidRowCount {
        /// The rejected value (negative inputs are reported as 0).
        requested: usize,
        /// Smallest accepted row count.
        min: usize,
        /// Largest accepted row count.
        max: usize,
    },
    /// Step index outside `0..total`.
    #[error("step {step} is out of range for a triangle with {total} steps")]
    StepOutOfRange {
        /// The requested step.
        step: usize,
        /// Number of steps in the triangle.
        total: usize,
    },
}
