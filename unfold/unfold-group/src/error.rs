//! Error types for grouping operations.

use thiserror::Error;

/// Result type for grouping operations.
pub type GroupResult<T> = Result<T, GroupError>;

/// Errors that can occur while grouping or classifying faces.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GroupError {
    /// An angular threshold outside the usable range was supplied.
    #[error("threshold of {radians} rad is outside the usable range (0, {max} rad)")]
    InvalidThreshold {
        /// The rejected threshold, in radians.
        radians: f64,
        /// Upper bound for this parameter, in radians.
        max: f64,
    },

    /// The up axis has (near-)zero length and defines no direction.
    #[error("up axis has near-zero length and cannot be normalized")]
    DegenerateUpAxis,
}
