//! Error types for connectivity and planning.

use thiserror::Error;

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building connectivity or planning.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// The group set and soup describe different face counts.
    #[error("group set covers {group_faces} faces but the soup has {soup_faces}")]
    FaceCountMismatch {
        /// Faces covered by the group set.
        group_faces: usize,
        /// Faces in the soup.
        soup_faces: usize,
    },

    /// The graph and group set describe different group counts.
    #[error("graph has {graph_groups} groups but the set has {set_groups}")]
    GroupCountMismatch {
        /// Groups in the connectivity graph.
        graph_groups: usize,
        /// Groups in the group set.
        set_groups: usize,
    },

    /// A negative edge length bound was supplied.
    #[error("minimum edge length {0} is negative")]
    NegativeEdgeLength(f64),
}
