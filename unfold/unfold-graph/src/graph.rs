//! Connectivity graph over face groups.
//!
//! Nodes are group ids; an edge exists between two groups when they share
//! at least one triangle edge, and carries the longest such edge as the
//! fold hinge. Records are stored symmetrically, each side directed in its
//! own winding.

use tracing::debug;
use unfold_group::{GroupId, GroupSet};
use unfold_types::TriangleSoup;

use crate::edge::{find_shared_edge, SharedEdge};
use crate::error::{GraphError, GraphResult};

/// Parameters for connectivity construction.
#[derive(Debug, Clone)]
pub struct GraphParams {
    /// Distance tolerance for matching edge endpoints.
    pub tolerance: f64,
    /// Shared edges at or below this length are ignored as hinges. Folding
    /// about a near-zero hinge is numerically unstable, so the default
    /// rejects anything down at the endpoint-matching tolerance.
    pub min_edge_length: f64,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            min_edge_length: 1e-6,
        }
    }
}

impl GraphParams {
    /// Set the endpoint tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the minimum hinge length.
    #[must_use]
    pub fn with_min_edge_length(mut self, min_edge_length: f64) -> Self {
        self.min_edge_length = min_edge_length;
        self
    }
}

/// A link from one group to a neighboring group.
#[derive(Debug, Clone)]
pub struct Connection {
    /// The group on the other side of the hinge.
    pub neighbor: GroupId,
    /// The hinge, directed as the owning group winds it.
    pub edge: SharedEdge,
}

/// Adjacency between face groups, with fold hinges.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityGraph {
    connections: Vec<Vec<Connection>>,
}

impl ConnectivityGraph {
    /// Number of groups (nodes).
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections of a group, in ascending neighbor order.
    ///
    /// Empty for an out-of-bounds id.
    #[must_use]
    pub fn neighbors(&self, group: GroupId) -> &[Connection] {
        self.connections.get(group).map_or(&[], Vec::as_slice)
    }

    /// Whether two groups share a hinge.
    #[must_use]
    pub fn is_connected(&self, a: GroupId, b: GroupId) -> bool {
        self.edge_between(a, b).is_some()
    }

    /// The hinge between two groups, directed as `a` winds it.
    #[must_use]
    pub fn edge_between(&self, a: GroupId, b: GroupId) -> Option<&SharedEdge> {
        self.connections
            .get(a)?
            .iter()
            .find(|c| c.neighbor == b)
            .map(|c| &c.edge)
    }
}

/// Build the connectivity graph for a grouped soup.
///
/// For each unordered group pair the longest shared edge is found once and
/// recorded from both sides, the reverse side mirrored. The result is
/// symmetric: `is_connected(a, b) == is_connected(b, a)` always holds.
///
/// # Errors
///
/// Returns an error if the group set was built from a different soup (face
/// counts disagree) or `min_edge_length` is negative.
pub fn build_connectivity(
    soup: &TriangleSoup,
    groups: &GroupSet,
    params: &GraphParams,
) -> GraphResult<ConnectivityGraph> {
    if groups.face_count() != soup.len() {
        return Err(GraphError::FaceCountMismatch {
            group_faces: groups.face_count(),
            soup_faces: soup.len(),
        });
    }
    if params.min_edge_length < 0.0 {
        return Err(GraphError::NegativeEdgeLength(params.min_edge_length));
    }

    let mut connections: Vec<Vec<Connection>> = vec![Vec::new(); groups.len()];
    let mut hinge_count = 0usize;

    for a in 0..groups.len() {
        for b in (a + 1)..groups.len() {
            let Some(edge) =
                find_shared_edge(soup, groups, a, b, params.tolerance, params.min_edge_length)
            else {
                continue;
            };
            connections[b].push(Connection {
                neighbor: a,
                edge: edge.mirrored(),
            });
            connections[a].push(Connection { neighbor: b, edge });
            hinge_count += 1;
        }
    }

    debug!(
        groups = groups.len(),
        hinges = hinge_count,
        "connectivity graph built"
    );

    Ok(ConnectivityGraph { connections })
}
