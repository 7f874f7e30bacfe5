//! UV projection for placed groups.
//!
//! Side groups get a planar projection in their own tangent frame, scaled
//! by the whole model's extent so texture density matches across walls.
//! Top and bottom caps are projected onto the horizontal plane and scaled
//! by their own planar extent, filling the texture tile per cap. Both
//! projections are centered on the group's planar bounding box, so a group
//! that is lopsided around its centroid still lands inside the tile.

use nalgebra::{Point3, Unit, Vector3};
use tracing::debug;
use unfold_group::{GroupId, GroupSet};
use unfold_types::Aabb;

use crate::flatten::PlacedMesh;

/// Parameters for UV projection.
#[derive(Debug, Clone)]
pub struct UvParams {
    /// Up axis defining the horizontal plane for cap projection.
    pub up_axis: Vector3<f64>,
}

impl Default for UvParams {
    fn default() -> Self {
        Self {
            up_axis: Vector3::z(),
        }
    }
}

/// Fill in the `uvs` of every placed mesh.
///
/// Projection reads model-space positions, so the result is independent of
/// where the net placed each group. Cap coordinates land exactly in the
/// unit square; side coordinates share one model-wide scale and stay close
/// to it.
pub fn project_uvs(
    placed: &mut [PlacedMesh],
    groups: &GroupSet,
    model_bounds: &Aabb,
    params: &UvParams,
) {
    let model_extent = positive_or_one(model_bounds.max_extent());

    for mesh in placed.iter_mut() {
        if mesh.kind.is_side() {
            project_side(mesh, groups, model_extent);
        } else {
            project_cap(mesh, &params.up_axis);
        }
    }
    debug!(meshes = placed.len(), "uv projection complete");
}

/// Planar projection in the group's tangent frame, model-extent scale.
fn project_side(mesh: &mut PlacedMesh, groups: &GroupSet, model_extent: f64) {
    let normal = group_normal(mesh.group, groups);
    let tangent = stable_tangent(&normal);
    let bitangent = normal.cross(&tangent);

    let coords = project_onto(&mesh.geometry.positions, &tangent, &bitangent);
    let (center_a, center_b) = planar_center(&coords);
    mesh.geometry.uvs = coords
        .iter()
        .map(|(a, b)| {
            [
                (a - center_a) / model_extent + 0.5,
                (b - center_b) / model_extent + 0.5,
            ]
        })
        .collect();
}

/// Horizontal-plane projection, scaled by the group's own planar extent.
fn project_cap(mesh: &mut PlacedMesh, up_axis: &Vector3<f64>) {
    let up = Unit::try_new(*up_axis, f64::EPSILON)
        .map_or_else(Vector3::z, |u| u.into_inner());
    let b1 = stable_tangent(&up);
    let b2 = up.cross(&b1);

    let coords = project_onto(&mesh.geometry.positions, &b1, &b2);
    let (center_a, center_b) = planar_center(&coords);
    let extent = positive_or_one(planar_extent(&coords));
    mesh.geometry.uvs = coords
        .iter()
        .map(|(a, b)| {
            [
                (a - center_a) / extent + 0.5,
                (b - center_b) / extent + 0.5,
            ]
        })
        .collect();
}

fn group_normal(group: GroupId, groups: &GroupSet) -> Vector3<f64> {
    groups.group(group).map_or_else(Vector3::z, |g| g.normal)
}

/// Project positions onto a 2D basis.
fn project_onto(
    positions: &[Point3<f64>],
    b1: &Vector3<f64>,
    b2: &Vector3<f64>,
) -> Vec<(f64, f64)> {
    positions
        .iter()
        .map(|p| (p.coords.dot(b1), p.coords.dot(b2)))
        .collect()
}

/// A unit tangent not parallel to the normal: world X, or world Y when the
/// normal is nearly along X.
fn stable_tangent(normal: &Vector3<f64>) -> Vector3<f64> {
    let candidate = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    // Orthogonalize against the normal so skewed normals still give a frame
    let projected = candidate - normal * candidate.dot(normal);
    Unit::try_new(projected, f64::EPSILON)
        .map_or(candidate, |u| u.into_inner())
}

/// Bounds of the projected coordinates, min then max per axis.
fn planar_bounds(coords: &[(f64, f64)]) -> ((f64, f64), (f64, f64)) {
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &(a, b) in coords {
        min = (min.0.min(a), min.1.min(b));
        max = (max.0.max(a), max.1.max(b));
    }
    (min, max)
}

/// Center of the planar bounding box.
fn planar_center(coords: &[(f64, f64)]) -> (f64, f64) {
    if coords.is_empty() {
        return (0.0, 0.0);
    }
    let (min, max) = planar_bounds(coords);
    ((min.0 + max.0) * 0.5, (min.1 + max.1) * 0.5)
}

/// Larger of the two coordinate ranges.
fn planar_extent(coords: &[(f64, f64)]) -> f64 {
    if coords.is_empty() {
        return 0.0;
    }
    let (min, max) = planar_bounds(coords);
    (max.0 - min.0).max(max.1 - min.1)
}

fn positive_or_one(value: f64) -> f64 {
    if value > f64::EPSILON {
        value
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use unfold_graph::{build_connectivity, plan_unfold, GraphParams, PlanParams, RootPolicy};
    use unfold_group::{build_face_groups, classify_groups, ClassifyParams, GroupingParams};
    use unfold_types::TriangleSoup;

    use crate::flatten::{layout_groups, TopBottomPolicy};

    fn project(positions: &[f64], plan_params: &PlanParams) -> Vec<PlacedMesh> {
        let soup = TriangleSoup::from_buffers(positions, None, 1e-6).expect("soup");
        let mut groups = build_face_groups(&soup, &GroupingParams::default()).expect("groups");
        classify_groups(&mut groups, &ClassifyParams::default()).expect("classify");
        let graph = build_connectivity(&soup, &groups, &GraphParams::default()).expect("graph");
        let plan = plan_unfold(&groups, &graph, plan_params).expect("plan");
        let layout = layout_groups(&soup, &groups, &graph, &plan, TopBottomPolicy::default())
            .expect("layout");
        let mut placed = layout.placed;
        project_uvs(&mut placed, &groups, &soup.bounds(), &UvParams::default());
        placed
    }

    fn wall_and_base() -> Vec<PlacedMesh> {
        let positions = [
            2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, // wall (side)
            0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 0.0, // base (top)
        ];
        project(&positions, &PlanParams::default())
    }

    #[test]
    fn every_vertex_gets_a_uv_in_range() {
        let placed = wall_and_base();
        for mesh in &placed {
            assert_eq!(mesh.geometry.uvs.len(), mesh.geometry.positions.len());
            for uv in &mesh.geometry.uvs {
                assert!(uv[0] > -0.1 && uv[0] < 1.1, "u out of range: {}", uv[0]);
                assert!(uv[1] > -0.1 && uv[1] < 1.1, "v out of range: {}", uv[1]);
            }
        }
    }

    #[test]
    fn uv_midrange_is_tile_center() {
        let placed = wall_and_base();
        for mesh in &placed {
            // Projections are centered on the planar bounding box, so the
            // middle of each uv range is the tile center
            for axis in 0..2 {
                let values: Vec<f64> = mesh.geometry.uvs.iter().map(|uv| uv[axis]).collect();
                let low = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
                let high = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
                assert_relative_eq!((low + high) * 0.5, 0.5, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn cap_extent_fills_tile() {
        let placed = wall_and_base();
        let cap = placed
            .iter()
            .find(|m| m.kind.is_cap())
            .expect("cap group");
        let us: Vec<f64> = cap.geometry.uvs.iter().map(|uv| uv[0]).collect();
        let span = us.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
            - us.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        // The cap's widest axis spans the whole tile
        assert_relative_eq!(span, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn lopsided_cap_stays_in_unit_square() {
        // A right triangle far from symmetric about its centroid; a
        // centroid-centered projection would push u past 1.1
        let positions = [0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let plan_params = PlanParams::default().with_root(RootPolicy::HighestCentroid);
        let placed = project(&positions, &plan_params);
        assert_eq!(placed.len(), 1);
        for uv in &placed[0].geometry.uvs {
            assert!(uv[0] >= -1e-10 && uv[0] <= 1.0 + 1e-10, "u: {}", uv[0]);
            assert!(uv[1] >= -1e-10 && uv[1] <= 1.0 + 1e-10, "v: {}", uv[1]);
        }
    }

    #[test]
    fn lopsided_side_group_stays_near_the_tile() {
        // Same lopsided shape standing vertically, projected as a side
        let positions = [0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let plan_params = PlanParams::default().with_root(RootPolicy::HighestCentroid);
        let placed = project(&positions, &plan_params);
        assert_eq!(placed.len(), 1);
        for uv in &placed[0].geometry.uvs {
            assert!(uv[0] > -0.1 && uv[0] < 1.1, "u: {}", uv[0]);
            assert!(uv[1] > -0.1 && uv[1] < 1.1, "v: {}", uv[1]);
        }
    }

    #[test]
    fn degenerate_up_axis_falls_back() {
        let positions = [
            2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -1.0, //
            0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 1.0, 0.0,
        ];
        let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).expect("soup");
        let mut groups = build_face_groups(&soup, &GroupingParams::default()).expect("groups");
        classify_groups(&mut groups, &ClassifyParams::default()).expect("classify");
        let graph = build_connectivity(&soup, &groups, &GraphParams::default()).expect("graph");
        let plan = plan_unfold(&groups, &graph, &PlanParams::default()).expect("plan");
        let layout = layout_groups(&soup, &groups, &graph, &plan, TopBottomPolicy::default())
            .expect("layout");
        let mut placed = layout.placed;
        let params = UvParams {
            up_axis: Vector3::zeros(),
        };
        project_uvs(&mut placed, &groups, &soup.bounds(), &params);
        for mesh in &placed {
            assert_eq!(mesh.geometry.uvs.len(), mesh.geometry.positions.len());
        }
    }
}
