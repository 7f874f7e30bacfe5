//! Shared-edge discovery between face groups.
//!
//! Two groups that meet along the surface share at least one triangle edge.
//! When they share several (a long crease split across triangles), the
//! longest one is the most numerically stable fold hinge, so that is the
//! one recorded.

use nalgebra::{Point3, Unit, Vector3};
use unfold_group::{GroupId, GroupSet};
use unfold_types::TriangleSoup;

/// The fold hinge between two face groups.
///
/// Directed as the owning group's triangles wind it; [`SharedEdge::mirrored`]
/// gives the same hinge from the neighbor's side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedEdge {
    /// Edge start, in model space.
    pub start: Point3<f64>,
    /// Edge end, in model space.
    pub end: Point3<f64>,
    /// Normal of the group that owns this record.
    pub owner_normal: Vector3<f64>,
    /// Normal of the group on the other side of the hinge.
    pub neighbor_normal: Vector3<f64>,
}

impl SharedEdge {
    /// Length of the edge.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end, or `None` for a degenerate edge.
    #[must_use]
    pub fn axis(&self) -> Option<Unit<Vector3<f64>>> {
        Unit::try_new(self.end - self.start, f64::EPSILON)
    }

    /// The same hinge as seen from the neighboring group.
    ///
    /// Consistently wound meshes traverse a shared edge in opposite
    /// directions from its two sides, so the mirror swaps the endpoints
    /// along with the normals.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            owner_normal: self.neighbor_normal,
            neighbor_normal: self.owner_normal,
        }
    }
}

/// Find the longest edge shared by two groups.
///
/// Every directed edge of every triangle in `owner` is compared against
/// every directed edge in `neighbor`; endpoints match within `tolerance` in
/// either orientation. Equal-length candidates resolve to the first found
/// in face order, so the choice is reproducible. Returns `None` when the
/// groups touch at most at a point, or when the only shared edges are
/// shorter than `min_length`.
///
/// The returned record is directed as `owner` winds the edge and carries
/// both group normals.
#[must_use]
pub fn find_shared_edge(
    soup: &TriangleSoup,
    groups: &GroupSet,
    owner: GroupId,
    neighbor: GroupId,
    tolerance: f64,
    min_length: f64,
) -> Option<SharedEdge> {
    let (owner_group, neighbor_group) = (groups.group(owner)?, groups.group(neighbor)?);

    let mut best: Option<(f64, Point3<f64>, Point3<f64>)> = None;
    for &fa in &owner_group.faces {
        let ta = soup.triangle(fa)?;
        for (a_start, a_end) in ta.edges() {
            let length = (a_end - a_start).norm();
            if length <= min_length {
                continue;
            }
            if best.as_ref().is_some_and(|(l, _, _)| length <= *l) {
                continue;
            }
            if neighbor_has_edge(soup, &neighbor_group.faces, &a_start, &a_end, tolerance) {
                best = Some((length, a_start, a_end));
            }
        }
    }

    best.map(|(_, start, end)| SharedEdge {
        start,
        end,
        owner_normal: owner_group.normal,
        neighbor_normal: neighbor_group.normal,
    })
}

/// Whether any triangle in `faces` has an edge matching (start, end) within
/// the tolerance, in either orientation.
fn neighbor_has_edge(
    soup: &TriangleSoup,
    faces: &[usize],
    start: &Point3<f64>,
    end: &Point3<f64>,
    tolerance: f64,
) -> bool {
    let close = |p: &Point3<f64>, q: &Point3<f64>| (p - q).norm() < tolerance;
    faces.iter().any(|&f| {
        soup.triangle(f).is_some_and(|t| {
            t.edges().iter().any(|(b_start, b_end)| {
                (close(start, b_start) && close(end, b_end))
                    || (close(start, b_end) && close(end, b_start))
            })
        })
    })
}
