//! Error types for layout and the pipeline.

use thiserror::Error;
use unfold_graph::GraphError;
use unfold_group::GroupError;
use unfold_types::MeshError;

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Errors that can occur while laying out an unfolded net.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// Mesh normalization failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Grouping or classification failed.
    #[error(transparent)]
    Group(#[from] GroupError),

    /// Connectivity or planning failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A plan entry references a group the group set does not contain.
    #[error("plan references unknown group {0}")]
    UnknownGroup(usize),
}
