//! Flattening: computing the rigid placement of every group in the net.
//!
//! The root group is rotated so its normal points up (+Z) and its centroid
//! sits at the origin. Each child then folds out of its parent about their
//! shared hinge: the child's normal is rotated onto the parent's plane by
//! the signed dihedral angle, and the child is translated so the hinge
//! coincides with the parent's copy of it. Because the fold axis is the
//! hinge itself, both hinge endpoints land exactly.

use hashbrown::HashMap;
use nalgebra::{Point3, Unit, UnitQuaternion, Vector3};
use tracing::{debug, warn};
use unfold_graph::{ConnectivityGraph, SharedEdge, UnfoldPlan};
use unfold_group::{FaceGroup, GroupId, GroupKind, GroupSet};
use unfold_types::TriangleSoup;

use crate::error::{LayoutError, LayoutResult};
use crate::transform::{rotation_to, RigidTransform};

/// How Top and Bottom groups fold off their Side parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopBottomPolicy {
    /// Fold by the actual dihedral angle, same as side-to-side hinges.
    #[default]
    Dihedral,
    /// Fold by a fixed quarter turn, sign chosen to open away from the
    /// parent plane. Gives caps a uniform crease in the printed net.
    FixedRightAngle,
}

/// Standalone re-indexed geometry for one group, in model space.
#[derive(Debug, Clone, Default)]
pub struct GroupGeometry {
    /// Unique vertex positions.
    pub positions: Vec<Point3<f64>>,
    /// Triangles as index triples into `positions`.
    pub indices: Vec<[u32; 3]>,
    /// Per-vertex normals (the group normal, flat shading).
    pub normals: Vec<Vector3<f64>>,
    /// Per-vertex texture coordinates; empty until UV projection runs.
    pub uvs: Vec<[f64; 2]>,
}

impl GroupGeometry {
    /// Number of unique vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

/// A group with its geometry and final placement.
#[derive(Debug, Clone)]
pub struct PlacedMesh {
    /// Which group this is.
    pub group: GroupId,
    /// Orientation label carried over from classification.
    pub kind: GroupKind,
    /// Model-space geometry; apply `transform` to get net-space positions.
    pub geometry: GroupGeometry,
    /// Placement in the flattened net.
    pub transform: RigidTransform,
}

/// Output of [`layout_groups`].
#[derive(Debug, Clone, Default)]
pub struct GroupLayout {
    /// Placed groups in plan order.
    pub placed: Vec<PlacedMesh>,
    /// Groups left at their original pose, ascending.
    pub unplaced: Vec<GroupId>,
}

/// Extract one group's triangles as standalone indexed geometry.
///
/// Vertices are shared between triangles when their welded positions agree
/// bitwise, which normalization guarantees for coincident corners.
#[must_use]
pub fn build_group_geometry(soup: &TriangleSoup, group: &FaceGroup) -> GroupGeometry {
    let mut lookup: HashMap<(u64, u64, u64), u32> = HashMap::new();
    let mut geometry = GroupGeometry::default();

    for &face in &group.faces {
        let Some(triangle) = soup.triangle(face) else {
            continue;
        };
        let mut tri_indices = [0u32; 3];
        for (slot, vertex) in tri_indices.iter_mut().zip(triangle.vertices()) {
            let key = (vertex.x.to_bits(), vertex.y.to_bits(), vertex.z.to_bits());
            *slot = *lookup.entry(key).or_insert_with(|| {
                geometry.positions.push(vertex);
                geometry.normals.push(group.normal);
                u32::try_from(geometry.positions.len() - 1).unwrap_or(u32::MAX)
            });
        }
        geometry.indices.push(tri_indices);
    }
    geometry
}

/// Place every planned group in the flattened net.
///
/// Entries whose parent is missing a recorded hinge (or whose parent itself
/// went unplaced) are moved to `unplaced` with a warning instead of
/// aborting the whole layout.
///
/// # Errors
///
/// Returns an error if the plan references a group the set does not
/// contain.
pub fn layout_groups(
    soup: &TriangleSoup,
    groups: &GroupSet,
    graph: &ConnectivityGraph,
    plan: &UnfoldPlan,
    policy: TopBottomPolicy,
) -> LayoutResult<GroupLayout> {
    let mut transforms: HashMap<GroupId, RigidTransform> = HashMap::new();
    let mut placed = Vec::with_capacity(plan.len());
    let mut unplaced: Vec<GroupId> = plan.unplaced().to_vec();

    for entry in plan.entries() {
        let group = groups
            .group(entry.group)
            .ok_or(LayoutError::UnknownGroup(entry.group))?;

        let transform = match entry.parent {
            None => root_transform(group),
            Some(parent) => {
                let Some(parent_transform) = transforms.get(&parent).copied() else {
                    warn!(group = entry.group, parent, "parent went unplaced");
                    unplaced.push(entry.group);
                    continue;
                };
                let Some(edge) = graph.edge_between(entry.group, parent) else {
                    warn!(group = entry.group, parent, "no hinge recorded for plan entry");
                    unplaced.push(entry.group);
                    continue;
                };
                let Some(transform) =
                    child_transform(group, edge, &parent_transform, policy)
                else {
                    warn!(group = entry.group, parent, "degenerate hinge");
                    unplaced.push(entry.group);
                    continue;
                };
                transform
            }
        };

        transforms.insert(entry.group, transform);
        placed.push(PlacedMesh {
            group: entry.group,
            kind: group.kind,
            geometry: build_group_geometry(soup, group),
            transform,
        });
    }

    unplaced.sort_unstable();
    unplaced.dedup();
    debug!(
        placed = placed.len(),
        unplaced = unplaced.len(),
        "layout complete"
    );

    Ok(GroupLayout { placed, unplaced })
}

/// Root placement: normal up, centroid at the origin.
fn root_transform(group: &FaceGroup) -> RigidTransform {
    let rotation = if group.normal.norm_squared() < f64::EPSILON {
        UnitQuaternion::identity()
    } else {
        rotation_to(&group.normal, &Vector3::z())
    };
    let translation = -(rotation * group.centroid.coords);
    RigidTransform::new(rotation, translation)
}

/// Fold a child out of its already-placed parent about the shared hinge.
///
/// Returns `None` when the hinge is too short to define an axis.
fn child_transform(
    child: &FaceGroup,
    edge: &SharedEdge,
    parent: &RigidTransform,
    policy: TopBottomPolicy,
) -> Option<RigidTransform> {
    let axis = edge.axis()?;
    let local = match policy {
        TopBottomPolicy::FixedRightAngle if child.kind.is_cap() => {
            quarter_turn(&axis, &edge.owner_normal, &edge.neighbor_normal)
        }
        _ => dihedral_rotation(&axis, &edge.owner_normal, &edge.neighbor_normal),
    };

    let rotation = parent.rotation * local;
    // Pin the hinge: the child's copy of the edge start must land where the
    // parent put that same model-space point. The rotation fixes the axis
    // direction, so the far endpoint then coincides as well.
    let anchor = edge.start;
    let translation = parent.transform_point(&anchor) - rotation * anchor;
    Some(RigidTransform::new(rotation, translation))
}

/// Rotation about the hinge taking the child's normal onto the parent's.
///
/// The sign comes from which way the normals wind around the axis: positive
/// when `child × parent` points along it.
fn dihedral_rotation(
    axis: &Unit<Vector3<f64>>,
    child_normal: &Vector3<f64>,
    parent_normal: &Vector3<f64>,
) -> UnitQuaternion<f64> {
    if child_normal.norm_squared() < f64::EPSILON || parent_normal.norm_squared() < f64::EPSILON {
        return UnitQuaternion::identity();
    }
    let angle = child_normal.angle(parent_normal);
    let signed = if child_normal.cross(parent_normal).dot(axis) >= 0.0 {
        angle
    } else {
        -angle
    };
    UnitQuaternion::from_axis_angle(axis, signed)
}

/// Quarter turn about the hinge, signed to best align the normals.
fn quarter_turn(
    axis: &Unit<Vector3<f64>>,
    child_normal: &Vector3<f64>,
    parent_normal: &Vector3<f64>,
) -> UnitQuaternion<f64> {
    let positive = UnitQuaternion::from_axis_angle(axis, std::f64::consts::FRAC_PI_2);
    let negative = UnitQuaternion::from_axis_angle(axis, -std::f64::consts::FRAC_PI_2);
    if (positive * child_normal).dot(parent_normal) >= (negative * child_normal).dot(parent_normal)
    {
        positive
    } else {
        negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use unfold_graph::{build_connectivity, plan_unfold, GraphParams, PlanParams};
    use unfold_group::{build_face_groups, classify_groups, ClassifyParams, GroupingParams};

    fn folded_pair() -> (TriangleSoup, GroupSet, ConnectivityGraph, UnfoldPlan) {
        // A vertical wall hinged to a horizontal base along the x-axis
        let positions = [
            2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, // wall, -y normal (side)
            0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 0.0, // base, +z normal (top)
        ];
        let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).expect("soup");
        let mut groups = build_face_groups(&soup, &GroupingParams::default()).expect("groups");
        classify_groups(&mut groups, &ClassifyParams::default()).expect("classify");
        let graph = build_connectivity(&soup, &groups, &GraphParams::default()).expect("graph");
        let plan = plan_unfold(&groups, &graph, &PlanParams::default()).expect("plan");
        (soup, groups, graph, plan)
    }

    fn placed_positions(mesh: &PlacedMesh) -> Vec<Point3<f64>> {
        mesh.geometry
            .positions
            .iter()
            .map(|p| mesh.transform.transform_point(p))
            .collect()
    }

    #[test]
    fn root_lands_flat_at_origin() {
        let (soup, groups, graph, plan) = folded_pair();
        let layout =
            layout_groups(&soup, &groups, &graph, &plan, TopBottomPolicy::default())
                .expect("layout");
        assert_eq!(layout.placed.len(), 2);
        assert!(layout.unplaced.is_empty());

        let root = &layout.placed[0];
        let placed = placed_positions(root);
        // All root vertices end up in the z = 0 plane
        for p in &placed {
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-10);
        }
        // Centroid at the origin
        let centroid = placed
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / placed.len() as f64;
        assert_relative_eq!(centroid.norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn child_is_coplanar_with_parent() {
        let (soup, groups, graph, plan) = folded_pair();
        let layout =
            layout_groups(&soup, &groups, &graph, &plan, TopBottomPolicy::default())
                .expect("layout");
        let child = &layout.placed[1];
        for p in placed_positions(child) {
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn hinge_endpoints_coincide() {
        let (soup, groups, graph, plan) = folded_pair();
        let layout =
            layout_groups(&soup, &groups, &graph, &plan, TopBottomPolicy::default())
                .expect("layout");
        let parent = &layout.placed[0];
        let child = &layout.placed[1];

        let edge = graph
            .edge_between(child.group, parent.group)
            .expect("hinge");
        let child_start = child.transform.transform_point(&edge.start);
        let child_end = child.transform.transform_point(&edge.end);
        let parent_start = parent.transform.transform_point(&edge.start);
        let parent_end = parent.transform.transform_point(&edge.end);
        assert_relative_eq!((child_start - parent_start).norm(), 0.0, epsilon = 1e-10);
        assert_relative_eq!((child_end - parent_end).norm(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn fixed_right_angle_keeps_hinge_continuity() {
        let (soup, groups, graph, plan) = folded_pair();
        let layout =
            layout_groups(&soup, &groups, &graph, &plan, TopBottomPolicy::FixedRightAngle)
                .expect("layout");
        let parent = &layout.placed[0];
        let child = &layout.placed[1];
        let edge = graph
            .edge_between(child.group, parent.group)
            .expect("hinge");
        let gap = (child.transform.transform_point(&edge.end)
            - parent.transform.transform_point(&edge.end))
        .norm();
        assert_relative_eq!(gap, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn geometry_is_reindexed() {
        let (soup, groups, _, _) = folded_pair();
        let group = groups.group(0).expect("group");
        let geometry = build_group_geometry(&soup, group);
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.vertex_count(), 3);
        assert!(geometry.uvs.is_empty());
    }

    #[test]
    fn missing_hinge_moves_child_to_unplaced() {
        let (soup, groups, _, plan) = folded_pair();
        // A graph built with an impossible hinge length records no edges,
        // so the planned child has nothing to fold about
        let bare = build_connectivity(
            &soup,
            &groups,
            &GraphParams::default().with_min_edge_length(100.0),
        )
        .expect("graph");
        let layout =
            layout_groups(&soup, &groups, &bare, &plan, TopBottomPolicy::default())
                .expect("layout");
        assert_eq!(layout.placed.len(), 1);
        assert_eq!(layout.unplaced, vec![1]);
    }
}
