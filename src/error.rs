//! Error types for the validator.
//!
//! Geometry defects are reported as [`crate::ValidationError`] records, never
//! through this type. `ValidatorError` covers caller misuse and input that
//! cannot be interpreted at all.

use thiserror::Error;

/// Precondition violations that stop validation before it starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    /// A part has no rings.
    #[error("part {part} has no rings")]
    EmptyPart { part: usize },

    /// A line or point part has more than one ring.
    #[error("part {part} has {rings} rings, expected exactly one")]
    TooManyRings { part: usize, rings: usize },

    /// A coordinate is NaN or infinite.
    #[error("vertex {vertex} of ring {ring} of part {part} has a non-finite coordinate")]
    NonFiniteCoordinate {
        part: usize,
        ring: usize,
        vertex: usize,
    },

    /// `start()` was called on a run that is not idle.
    #[error("validation run already started")]
    AlreadyStarted,
}

/// Result type for validator operations.
pub type Result<T> = std::result::Result<T, ValidatorError>;
