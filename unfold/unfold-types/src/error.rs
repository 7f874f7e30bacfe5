//! Error types for mesh input validation.

use thiserror::Error;

/// Result type for mesh construction and validation.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised while building a triangle soup from raw buffers.
///
/// Only truly malformed input is a hard error; an empty buffer is a
/// valid (empty) mesh.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// The flat position buffer does not describe whole vertices/triangles.
    #[error("position buffer length {len} is not a multiple of {expected_multiple}")]
    InvalidBufferLength {
        /// Actual buffer length.
        len: usize,
        /// Required divisor (9 for a raw soup, 3 for an indexed buffer).
        expected_multiple: usize,
    },

    /// The index buffer does not describe whole triangles.
    #[error("index buffer length {len} is not a multiple of 3")]
    InvalidIndexLength {
        /// Actual index buffer length.
        len: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("coordinate at buffer offset {offset} is not finite")]
    NotFinite {
        /// Offset of the offending value in the flat position buffer.
        offset: usize,
    },

    /// An index refers past the end of the vertex list.
    #[error("vertex index {index} out of bounds (buffer has {vertex_count} vertices)")]
    IndexOutOfBounds {
        /// The invalid index.
        index: u32,
        /// Number of vertices in the position buffer.
        vertex_count: usize,
    },
}
