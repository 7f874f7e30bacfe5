//! The end-to-end unfolding pipeline.
//!
//! Normalize, group, classify, connect, plan, place, project. Each stage
//! is available on its own from the stage crates; this module wires them
//! together with one parameter bag and one result type.

use tracing::info;
use unfold_graph::{build_connectivity, plan_unfold, GraphParams, PlanParams};
use unfold_group::{
    build_face_groups, classify_groups, ClassifyParams, GroupId, GroupSet, GroupingParams,
};
use unfold_types::TriangleSoup;

use crate::error::LayoutResult;
use crate::flatten::{layout_groups, PlacedMesh, TopBottomPolicy};
use crate::uv::{project_uvs, UvParams};

/// Parameters for the whole pipeline.
///
/// The up axis appears in both `classify` and `plan`; keep them equal
/// unless you deliberately want classification and root selection to use
/// different verticals. The defaults agree (Z-up).
#[derive(Debug, Clone, Default)]
pub struct UnfoldParams {
    /// Vertex weld epsilon used during normalization. Zero disables
    /// welding for pre-welded input.
    pub weld_epsilon: WeldEpsilon,
    /// Face grouping parameters.
    pub grouping: GroupingParams,
    /// Group classification parameters.
    pub classify: ClassifyParams,
    /// Connectivity parameters.
    pub graph: GraphParams,
    /// Planning parameters.
    pub plan: PlanParams,
    /// Fold policy for top and bottom caps.
    pub top_bottom: TopBottomPolicy,
}

/// Newtype so the weld epsilon has a sensible default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeldEpsilon(pub f64);

impl Default for WeldEpsilon {
    fn default() -> Self {
        Self(1e-6)
    }
}

/// The finished net.
#[derive(Debug, Clone)]
pub struct NetLayout {
    /// Placed groups in unfold order, with geometry, transforms, and UVs.
    pub placed: Vec<PlacedMesh>,
    /// Groups left at their original pose, ascending.
    pub unplaced: Vec<GroupId>,
    /// The group partition the net was built from.
    pub groups: GroupSet,
}

impl NetLayout {
    /// Whether every group made it into the net.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unplaced.is_empty()
    }
}

/// Unfold raw vertex buffers.
///
/// `indices` de-indexes on the fly; without it the positions are read as a
/// raw soup of 9 floats per triangle.
///
/// # Errors
///
/// Returns an error for malformed buffers or invalid parameters; see the
/// stage crates for the taxonomy.
pub fn unfold_buffers(
    positions: &[f64],
    indices: Option<&[u32]>,
    params: &UnfoldParams,
) -> LayoutResult<NetLayout> {
    let soup = TriangleSoup::from_buffers(positions, indices, params.weld_epsilon.0)?;
    unfold_soup(&soup, params)
}

/// Unfold a normalized triangle soup.
///
/// Deterministic: the same soup and parameters always yield the same net.
///
/// # Errors
///
/// Returns an error for invalid parameters or mismatched stage inputs.
pub fn unfold_soup(soup: &TriangleSoup, params: &UnfoldParams) -> LayoutResult<NetLayout> {
    info!(faces = soup.len(), "unfolding mesh");

    let mut groups = build_face_groups(soup, &params.grouping)?;
    classify_groups(&mut groups, &params.classify)?;
    info!(groups = groups.len(), "faces grouped and classified");

    let graph = build_connectivity(soup, &groups, &params.graph)?;
    let plan = plan_unfold(&groups, &graph, &params.plan)?;
    info!(
        planned = plan.len(),
        unplaced = plan.unplaced().len(),
        "unfold order planned"
    );

    let layout = layout_groups(soup, &groups, &graph, &plan, params.top_bottom)?;

    let mut placed = layout.placed;
    let uv_params = UvParams {
        up_axis: params.classify.up_axis,
    };
    project_uvs(&mut placed, &groups, &soup.bounds(), &uv_params);

    info!(
        placed = placed.len(),
        unplaced = layout.unplaced.len(),
        "net layout complete"
    );
    Ok(NetLayout {
        placed,
        unplaced: layout.unplaced,
        groups,
    })
}
