//! Region growing of faces into near-coplanar groups.
//!
//! Faces are partitioned by breadth-first growth over the adjacency
//! relation: a face joins a group when its normal deviates from the group
//! seed's normal by less than the angular threshold. Comparing against the
//! seed (not the most recently added face) keeps a long chain of slightly
//! curved faces from drifting into one group.

use std::collections::VecDeque;

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};
use unfold_types::TriangleSoup;

use crate::adjacency::{FaceAdjacency, DEFAULT_TOLERANCE};
use crate::classify::GroupKind;
use crate::error::{GroupError, GroupResult};

/// Identifier of a face group, dense from zero.
pub type GroupId = usize;

/// Parameters controlling face grouping.
#[derive(Debug, Clone)]
pub struct GroupingParams {
    /// Maximum angle in radians between a face normal and the group seed's
    /// normal. Must lie in (0, π).
    pub max_angle: f64,
    /// Distance tolerance for the shared-edge adjacency test.
    pub tolerance: f64,
}

impl Default for GroupingParams {
    fn default() -> Self {
        Self {
            // Tight threshold: only faces that are flat within half a degree
            // merge, so every visible facet unfolds on its own.
            max_angle: 0.5_f64.to_radians(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl GroupingParams {
    /// Preset that merges gently curved surfaces (10 degrees).
    #[must_use]
    pub fn relaxed() -> Self {
        Self {
            max_angle: 10.0_f64.to_radians(),
            ..Self::default()
        }
    }

    /// Build params from a threshold in degrees.
    #[must_use]
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            max_angle: degrees.to_radians(),
            ..Self::default()
        }
    }

    /// Set the angular threshold in radians.
    #[must_use]
    pub fn with_max_angle(mut self, radians: f64) -> Self {
        self.max_angle = radians;
        self
    }

    /// Set the adjacency tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn validate(&self) -> GroupResult<()> {
        if !(self.max_angle > 0.0 && self.max_angle < std::f64::consts::PI) {
            return Err(GroupError::InvalidThreshold {
                radians: self.max_angle,
                max: std::f64::consts::PI,
            });
        }
        Ok(())
    }
}

/// A maximal set of connected, near-coplanar faces.
#[derive(Debug, Clone)]
pub struct FaceGroup {
    /// Dense group identifier.
    pub id: GroupId,
    /// Face indices into the soup, in discovery order (seed first).
    pub faces: Vec<usize>,
    /// Normal of the seed face. Zero for degenerate groups.
    pub normal: Vector3<f64>,
    /// Orientation label, filled in by classification.
    pub kind: GroupKind,
    /// Mean of the group's unique corner positions.
    pub centroid: Point3<f64>,
}

/// The partition of a soup's faces into groups.
#[derive(Debug, Clone, Default)]
pub struct GroupSet {
    groups: Vec<FaceGroup>,
    face_to_group: Vec<GroupId>,
}

impl GroupSet {
    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Get a group by id.
    #[must_use]
    pub fn group(&self, id: GroupId) -> Option<&FaceGroup> {
        self.groups.get(id)
    }

    /// The group a face belongs to.
    #[must_use]
    pub fn group_of(&self, face: usize) -> Option<GroupId> {
        self.face_to_group.get(face).copied()
    }

    /// Number of faces in the underlying soup.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.face_to_group.len()
    }

    /// Iterate over the groups in id order.
    pub fn iter(&self) -> impl Iterator<Item = &FaceGroup> {
        self.groups.iter()
    }

    /// Iterate mutably over the groups in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut FaceGroup> {
        self.groups.iter_mut()
    }

    /// Ids of all groups with the given kind.
    #[must_use]
    pub fn ids_of_kind(&self, kind: GroupKind) -> Vec<GroupId> {
        self.groups
            .iter()
            .filter(|g| g.kind == kind)
            .map(|g| g.id)
            .collect()
    }
}

/// Partition a soup's faces into near-coplanar groups.
///
/// Seeds are taken in ascending face index, so the output is deterministic
/// for a given soup. Faces without a usable normal become singleton
/// [`GroupKind::Unclassified`] groups.
///
/// # Errors
///
/// Returns an error if `max_angle` lies outside (0, π).
///
/// # Example
///
/// ```
/// use unfold_group::{build_face_groups, GroupingParams};
/// use unfold_types::TriangleSoup;
///
/// // Two coplanar triangles sharing an edge form one group
/// let positions = [
///     0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0,
///     1.0, 0.0, 0.0, 1.5, 1.0, 0.0, 0.5, 1.0, 0.0,
/// ];
/// let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).unwrap();
/// let groups = build_face_groups(&soup, &GroupingParams::default()).unwrap();
/// assert_eq!(groups.len(), 1);
/// ```
pub fn build_face_groups(soup: &TriangleSoup, params: &GroupingParams) -> GroupResult<GroupSet> {
    params.validate()?;

    if soup.is_empty() {
        return Ok(GroupSet::default());
    }

    let adjacency = FaceAdjacency::from_soup(soup, params.tolerance);
    let normals: Vec<Option<Vector3<f64>>> =
        soup.triangles().iter().map(|t| t.normal()).collect();

    let mut face_to_group = vec![usize::MAX; soup.len()];
    let mut groups: Vec<FaceGroup> = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..soup.len() {
        if face_to_group[seed] != usize::MAX {
            continue;
        }
        let id = groups.len();

        let Some(seed_normal) = normals[seed] else {
            // Degenerate face: isolate it so it cannot glue unrelated groups
            warn!(face = seed, "degenerate face isolated into its own group");
            face_to_group[seed] = id;
            groups.push(FaceGroup {
                id,
                faces: vec![seed],
                normal: Vector3::zeros(),
                kind: GroupKind::Unclassified,
                centroid: group_centroid(&adjacency, &[seed]),
            });
            continue;
        };

        let mut faces = vec![seed];
        face_to_group[seed] = id;
        queue.clear();
        queue.push_back(seed);

        while let Some(face) = queue.pop_front() {
            for &neighbor in adjacency.neighbors(face) {
                if face_to_group[neighbor] != usize::MAX {
                    continue;
                }
                let Some(normal) = normals[neighbor] else {
                    continue;
                };
                if normal.angle(&seed_normal) < params.max_angle {
                    face_to_group[neighbor] = id;
                    faces.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }

        let centroid = group_centroid(&adjacency, &faces);
        groups.push(FaceGroup {
            id,
            faces,
            normal: seed_normal,
            kind: GroupKind::Unclassified,
            centroid,
        });
    }

    debug!(
        faces = soup.len(),
        groups = groups.len(),
        max_angle_deg = params.max_angle.to_degrees(),
        "face grouping complete"
    );

    Ok(GroupSet {
        groups,
        face_to_group,
    })
}

/// Mean of the unique corner positions across a set of faces.
///
/// Unique corners (not per-face corners) so that large faces do not get
/// weighted by how finely they are triangulated along the boundary.
fn group_centroid(adjacency: &FaceAdjacency, faces: &[usize]) -> Point3<f64> {
    let mut seen: Vec<usize> = faces
        .iter()
        .filter_map(|&f| adjacency.corner_ids(f))
        .flatten()
        .collect();
    seen.sort_unstable();
    seen.dedup();

    let mut sum = Vector3::zeros();
    let mut count = 0.0;
    for id in seen {
        if let Some(p) = adjacency.corner_position(id) {
            sum += p.coords;
            count += 1.0;
        }
    }
    if count > 0.0 {
        Point3::from(sum / count)
    } else {
        Point3::origin()
    }
}
