//! Canonical non-indexed triangle list.
//!
//! All pipeline stages operate on a [`TriangleSoup`]: triangle *i* owns its
//! three corner positions, matching the flat-buffer layout
//! `[3i, 3i + 1, 3i + 2]` of a de-indexed position attribute.

use hashbrown::HashMap;
use nalgebra::Point3;

use crate::bounds::Aabb;
use crate::error::{MeshError, MeshResult};
use crate::triangle::Triangle;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh stored as a flat, non-indexed triangle list.
///
/// Produced from raw loader buffers by [`TriangleSoup::from_buffers`], which
/// normalizes both indexed and non-indexed input to this layout. The soup is
/// read-only once built; every downstream stage borrows it.
///
/// # Example
///
/// ```
/// use unfold_types::TriangleSoup;
///
/// // One triangle, no index buffer
/// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
/// let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).unwrap();
/// assert_eq!(soup.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleSoup {
    triangles: Vec<Triangle>,
}

impl TriangleSoup {
    /// Create a soup directly from a triangle list.
    #[inline]
    #[must_use]
    pub const fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    /// Build a soup from a flat position buffer and an optional index buffer.
    ///
    /// With an index buffer, indices are expanded to a per-triangle layout;
    /// corners that referenced the same vertex stay bit-identical, so
    /// tolerance-based adjacency tests see them as shared.
    ///
    /// Without an index buffer, vertices closer than `weld_epsilon` are first
    /// snapped to a canonical representative (spatial hash over 2·ε cells),
    /// so coincident-but-duplicated corners also compare equal. Triangles
    /// fully collapsed by welding (two corners on the same representative)
    /// are dropped. Pass `weld_epsilon <= 0` to disable welding.
    ///
    /// An empty position buffer yields an empty soup.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input: a buffer length that does not
    /// describe whole triangles, a non-finite coordinate, or an index past
    /// the end of the vertex list.
    pub fn from_buffers(
        positions: &[f64],
        indices: Option<&[u32]>,
        weld_epsilon: f64,
    ) -> MeshResult<Self> {
        let points = parse_positions(positions, if indices.is_some() { 3 } else { 9 })?;

        let triangles = match indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    return Err(MeshError::InvalidIndexLength { len: indices.len() });
                }
                let mut triangles = Vec::with_capacity(indices.len() / 3);
                for chunk in indices.chunks_exact(3) {
                    let mut corners = [Point3::origin(); 3];
                    for (slot, &index) in corners.iter_mut().zip(chunk) {
                        *slot = *points.get(index as usize).ok_or(
                            MeshError::IndexOutOfBounds {
                                index,
                                vertex_count: points.len(),
                            },
                        )?;
                    }
                    triangles.push(Triangle::new(corners[0], corners[1], corners[2]));
                }
                triangles
            }
            None => {
                let points = if weld_epsilon > 0.0 {
                    weld_points(points, weld_epsilon)
                } else {
                    points
                };
                points
                    .chunks_exact(3)
                    .map(|c| Triangle::new(c[0], c[1], c[2]))
                    .filter(|t| t.v0 != t.v1 && t.v1 != t.v2 && t.v2 != t.v0)
                    .collect()
            }
        };

        Ok(Self { triangles })
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Check if the soup has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Get triangle `face`, if in bounds.
    #[inline]
    #[must_use]
    pub fn triangle(&self, face: usize) -> Option<&Triangle> {
        self.triangles.get(face)
    }

    /// All triangles, in face-index order.
    #[inline]
    #[must_use]
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get corner `corner` (0..3) of triangle `face`.
    #[must_use]
    pub fn position(&self, face: usize, corner: usize) -> Option<Point3<f64>> {
        self.triangles
            .get(face)
            .and_then(|t| t.vertices().get(corner).copied())
    }

    /// Bounding box over all corners.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for tri in &self.triangles {
            for v in tri.vertices() {
                aabb.expand_to_include(&v);
            }
        }
        aabb
    }
}

/// Validate and chunk a flat coordinate buffer into points.
fn parse_positions(positions: &[f64], expected_multiple: usize) -> MeshResult<Vec<Point3<f64>>> {
    if positions.len() % expected_multiple != 0 {
        return Err(MeshError::InvalidBufferLength {
            len: positions.len(),
            expected_multiple,
        });
    }
    for (offset, &value) in positions.iter().enumerate() {
        if !value.is_finite() {
            return Err(MeshError::NotFinite { offset });
        }
    }
    Ok(positions
        .chunks_exact(3)
        .map(|c| Point3::new(c[0], c[1], c[2]))
        .collect())
}

/// Snap points within `epsilon` of each other to one representative.
///
/// First-seen point in a 3×3×3 cell neighborhood wins, so the result is
/// deterministic for a given input order.
fn weld_points(points: Vec<Point3<f64>>, epsilon: f64) -> Vec<Point3<f64>> {
    let cell_size = epsilon * 2.0;
    let mut cells: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
    let mut canonical: Vec<Point3<f64>> = Vec::with_capacity(points.len());

    for point in points {
        let cell = point_cell(&point, cell_size);
        let mut snapped = None;
        'search: for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    if let Some(candidates) = cells.get(&neighbor) {
                        for &idx in candidates {
                            if (canonical[idx] - point).norm() < epsilon {
                                snapped = Some(canonical[idx]);
                                break 'search;
                            }
                        }
                    }
                }
            }
        }
        match snapped {
            Some(rep) => canonical.push(rep),
            None => {
                cells.entry(cell).or_default().push(canonical.len());
                canonical.push(point);
            }
        }
    }

    canonical
}

fn point_cell(pos: &Point3<f64>, cell_size: f64) -> (i64, i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_empty_soup() {
        let soup = TriangleSoup::from_buffers(&[], None, 1e-6).expect("empty soup");
        assert!(soup.is_empty());
        assert!(soup.bounds().is_empty());
    }

    #[test]
    fn ragged_buffer_rejected() {
        let result = TriangleSoup::from_buffers(&[0.0, 1.0], None, 1e-6);
        assert!(result.is_err());
    }

    #[test]
    fn nan_coordinate_rejected() {
        let positions = [0.0, 0.0, f64::NAN, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let result = TriangleSoup::from_buffers(&positions, None, 1e-6);
        assert!(matches!(result, Err(MeshError::NotFinite { offset: 2 })));
    }

    #[test]
    fn indexed_expansion() {
        // Two triangles sharing an edge, four vertices
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            1.5, 1.0, 0.0,
        ];
        let indices = [0u32, 1, 2, 1, 3, 2];
        let soup = TriangleSoup::from_buffers(&positions, Some(&indices), 1e-6).expect("soup");
        assert_eq!(soup.len(), 2);
        // Shared corners are bit-identical after expansion
        let a = soup.position(0, 1).expect("corner");
        let b = soup.position(1, 0).expect("corner");
        assert_eq!(a, b);
    }

    #[test]
    fn index_out_of_bounds_rejected() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = [0u32, 1, 7];
        let result = TriangleSoup::from_buffers(&positions, Some(&indices), 1e-6);
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfBounds { index: 7, .. })
        ));
    }

    #[test]
    fn welding_snaps_near_duplicates() {
        // Second triangle repeats the shared edge with 1e-8 jitter
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            1.0, 1e-8, 0.0, //
            1.5, 1.0, 0.0, //
            0.5, 1.0, 1e-8,
        ];
        let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).expect("soup");
        assert_eq!(soup.len(), 2);
        assert_eq!(
            soup.position(0, 1).expect("corner"),
            soup.position(1, 0).expect("corner")
        );
        assert_eq!(
            soup.position(0, 2).expect("corner"),
            soup.position(1, 2).expect("corner")
        );
    }

    #[test]
    fn collapsed_triangles_dropped_by_welding() {
        // All three corners within epsilon of each other
        let positions = [
            0.0, 0.0, 0.0, //
            1e-8, 0.0, 0.0, //
            0.0, 1e-8, 0.0,
        ];
        let soup = TriangleSoup::from_buffers(&positions, None, 1e-6).expect("soup");
        assert!(soup.is_empty());
    }

    #[test]
    fn weld_disabled_keeps_jitter() {
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.5, 1.0, 0.0, //
            1.0, 1e-8, 0.0, //
            1.5, 1.0, 0.0, //
            0.5, 1.0, 1e-8,
        ];
        let soup = TriangleSoup::from_buffers(&positions, None, 0.0).expect("soup");
        assert_ne!(
            soup.position(0, 1).expect("corner"),
            soup.position(1, 0).expect("corner")
        );
    }
}
