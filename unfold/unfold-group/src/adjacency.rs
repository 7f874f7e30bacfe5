//! Face adjacency for a triangle soup.
//!
//! Two faces are adjacent when they share at least two corners within a
//! distance tolerance, i.e. they share an edge. [`are_adjacent`] is the
//! direct pairwise test; [`FaceAdjacency`] precomputes the same relation
//! for a whole soup so traversals avoid the quadratic scan.

use hashbrown::HashMap;
use nalgebra::Point3;
use unfold_types::TriangleSoup;

/// Distance below which two corners count as the same vertex.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Check whether two triangles share an edge.
///
/// True iff at least two corner pairs lie within `tolerance` of each other.
/// Symmetric; a face is not adjacent to itself.
///
/// This is the O(1) reference test (9 distance comparisons). Calling it for
/// every face pair is quadratic in the face count, which is fine for
/// letterform-scale meshes; [`FaceAdjacency`] covers everything larger.
///
/// # Example
///
/// ```
/// use unfold_group::are_adjacent;
/// use unfold_types::TriangleSoup;
///
/// let positions = [
///     0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0, // face 0
///     1.0, 0.0, 0.0, 1.5, 1.0, 0.0, 0.5, 1.0, 0.0, // face 1, shares an edge
/// ];
/// let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).unwrap();
/// assert!(are_adjacent(&soup, 0, 1, 1e-6));
/// ```
#[must_use]
pub fn are_adjacent(soup: &TriangleSoup, a: usize, b: usize, tolerance: f64) -> bool {
    if a == b {
        return false;
    }
    let (Some(ta), Some(tb)) = (soup.triangle(a), soup.triangle(b)) else {
        return false;
    };

    let mut shared = 0;
    for va in ta.vertices() {
        for vb in tb.vertices() {
            if (va - vb).norm() < tolerance {
                shared += 1;
            }
        }
    }
    shared >= 2
}

/// Precomputed face adjacency over a triangle soup.
///
/// Corners are first collapsed to canonical vertex ids (spatial hash,
/// first-seen representative within the tolerance wins), then an edge→faces
/// map yields the adjacency lists. Non-manifold edges connect every face
/// pair that meets on them.
#[derive(Debug, Clone)]
pub struct FaceAdjacency {
    adjacent: Vec<Vec<usize>>,
    corner_ids: Vec<[usize; 3]>,
    representatives: Vec<Point3<f64>>,
}

impl FaceAdjacency {
    /// Build face adjacency from a soup.
    ///
    /// # Example
    ///
    /// ```
    /// use unfold_group::FaceAdjacency;
    /// use unfold_types::TriangleSoup;
    ///
    /// let positions = [
    ///     0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, 1.0, 0.0,
    ///     1.0, 0.0, 0.0, 1.5, 1.0, 0.0, 0.5, 1.0, 0.0,
    /// ];
    /// let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).unwrap();
    /// let adjacency = FaceAdjacency::from_soup(&soup, 1e-6);
    /// assert_eq!(adjacency.neighbors(0), &[1]);
    /// ```
    #[must_use]
    pub fn from_soup(soup: &TriangleSoup, tolerance: f64) -> Self {
        let tolerance = tolerance.max(f64::EPSILON);
        let cell_size = tolerance * 2.0;

        let mut cells: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
        let mut representatives: Vec<Point3<f64>> = Vec::new();
        let mut corner_ids: Vec<[usize; 3]> = Vec::with_capacity(soup.len());

        for tri in soup.triangles() {
            let mut ids = [0usize; 3];
            for (slot, corner) in ids.iter_mut().zip(tri.vertices()) {
                *slot = canonical_id(&corner, tolerance, cell_size, &mut cells, &mut representatives);
            }
            corner_ids.push(ids);
        }

        // Map each undirected edge to the faces that contain it
        let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (face, ids) in corner_ids.iter().enumerate() {
            for i in 0..3 {
                let a = ids[i];
                let b = ids[(i + 1) % 3];
                if a == b {
                    continue; // collapsed edge of a degenerate face
                }
                let key = if a < b { (a, b) } else { (b, a) };
                edge_faces.entry(key).or_default().push(face);
            }
        }

        let mut adjacent: Vec<Vec<usize>> = vec![Vec::new(); soup.len()];
        for faces in edge_faces.values() {
            for (i, &f0) in faces.iter().enumerate() {
                for &f1 in &faces[i + 1..] {
                    if f0 != f1 {
                        adjacent[f0].push(f1);
                        adjacent[f1].push(f0);
                    }
                }
            }
        }

        for list in &mut adjacent {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            adjacent,
            corner_ids,
            representatives,
        }
    }

    /// Get the neighbors of a face, sorted ascending.
    ///
    /// Returns an empty slice if the face index is out of bounds.
    #[must_use]
    pub fn neighbors(&self, face: usize) -> &[usize] {
        self.adjacent.get(face).map_or(&[], Vec::as_slice)
    }

    /// Number of faces in the underlying soup.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.adjacent.len()
    }

    /// Check if two faces are adjacent.
    #[must_use]
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacent
            .get(a)
            .is_some_and(|list| list.binary_search(&b).is_ok())
    }

    /// Canonical vertex ids for the three corners of a face.
    #[must_use]
    pub fn corner_ids(&self, face: usize) -> Option<[usize; 3]> {
        self.corner_ids.get(face).copied()
    }

    /// Representative position for a canonical vertex id.
    #[must_use]
    pub fn corner_position(&self, id: usize) -> Option<Point3<f64>> {
        self.representatives.get(id).copied()
    }
}

/// Find or assign the canonical id for a corner position.
fn canonical_id(
    point: &Point3<f64>,
    tolerance: f64,
    cell_size: f64,
    cells: &mut HashMap<(i64, i64, i64), Vec<usize>>,
    representatives: &mut Vec<Point3<f64>>,
) -> usize {
    let cell = (
        (point.x / cell_size).floor() as i64,
        (point.y / cell_size).floor() as i64,
        (point.z / cell_size).floor() as i64,
    );

    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                if let Some(candidates) = cells.get(&neighbor) {
                    for &id in candidates {
                        if (representatives[id] - point).norm() < tolerance {
                            return id;
                        }
                    }
                }
            }
        }
    }

    let id = representatives.len();
    representatives.push(*point);
    cells.entry(cell).or_default().push(id);
    id
}
