//! Boundary outlines of placed groups.
//!
//! The outline of a group is the polygon a plotter would cut: the chain of
//! triangle edges that belong to exactly one triangle. Interior edges are
//! shared by two triangles and cancel out.

use hashbrown::HashMap;
use nalgebra::Point3;

use crate::flatten::PlacedMesh;

/// Ordered outer boundary polygon of a placed group, in net space.
///
/// Boundary edges keep their winding direction, so the chain is walked
/// start to end without ambiguity. When the boundary has several loops
/// (a cap with a hole in it), the loop with the greatest perimeter is the
/// outer one and is the one returned. Returns an empty polygon for a mesh
/// with no boundary at all.
#[must_use]
pub fn group_outline(mesh: &PlacedMesh) -> Vec<Point3<f64>> {
    let loops = outline_loops(mesh);
    loops
        .into_iter()
        .max_by(|a, b| {
            let pa = perimeter(a);
            let pb = perimeter(b);
            pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_default()
}

/// All boundary loops of a placed group, in net space.
///
/// Each loop is an ordered list of vertices; the closing edge back to the
/// first vertex is implied. Chaining consumes each directed boundary edge
/// exactly once, so a pinch vertex shared by two loops yields two separate
/// polygons instead of tangling the walk.
#[must_use]
pub fn outline_loops(mesh: &PlacedMesh) -> Vec<Vec<Point3<f64>>> {
    // Count undirected occurrences; keep the directed form of each edge so
    // the winding survives into the chained loop
    let mut count: HashMap<(u32, u32), u32> = HashMap::new();
    for tri in &mesh.geometry.indices {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = if a < b { (a, b) } else { (b, a) };
            *count.entry(key).or_insert(0) += 1;
        }
    }

    let mut edges: Vec<(u32, u32)> = Vec::new();
    for tri in &mesh.geometry.indices {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = if a < b { (a, b) } else { (b, a) };
            if count.get(&key) == Some(&1) {
                edges.push((a, b));
            }
        }
    }
    // Sorted edge order makes both the loop order and each loop's starting
    // vertex deterministic
    edges.sort_unstable();

    let mut by_start: HashMap<u32, Vec<usize>> = HashMap::new();
    for (i, &(a, _)) in edges.iter().enumerate() {
        by_start.entry(a).or_default().push(i);
    }

    let mut consumed = vec![false; edges.len()];
    let mut loops = Vec::new();
    for first in 0..edges.len() {
        if consumed[first] {
            continue;
        }
        let origin = edges[first].0;
        let mut polygon = Vec::new();
        let mut current = first;
        loop {
            consumed[current] = true;
            let (from, to) = edges[current];
            polygon.push(net_position(mesh, from));
            if to == origin {
                break;
            }
            let follower = by_start
                .get(&to)
                .and_then(|list| list.iter().copied().find(|&i| !consumed[i]));
            let Some(follower) = follower else {
                break; // open chain, should not happen for a closed surface
            };
            current = follower;
        }
        if polygon.len() >= 3 {
            loops.push(polygon);
        }
    }
    loops
}

fn net_position(mesh: &PlacedMesh, index: u32) -> Point3<f64> {
    mesh.geometry
        .positions
        .get(index as usize)
        .map_or_else(Point3::origin, |p| mesh.transform.transform_point(p))
}

fn perimeter(polygon: &[Point3<f64>]) -> f64 {
    if polygon.len() < 2 {
        return 0.0;
    }
    let mut total = 0.0;
    for i in 0..polygon.len() {
        let j = (i + 1) % polygon.len();
        total += (polygon[j] - polygon[i]).norm();
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use unfold_group::GroupKind;
    use unfold_types::Point3;

    use crate::flatten::{GroupGeometry, PlacedMesh};
    use crate::transform::RigidTransform;

    fn quad_mesh() -> PlacedMesh {
        // Unit quad split into two triangles; the diagonal is interior
        let geometry = GroupGeometry {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![[0, 1, 2], [0, 2, 3]],
            normals: Vec::new(),
            uvs: Vec::new(),
        };
        PlacedMesh {
            group: 0,
            kind: GroupKind::Side,
            geometry,
            transform: RigidTransform::identity(),
        }
    }

    #[test]
    fn quad_outline_skips_the_diagonal() {
        let outline = group_outline(&quad_mesh());
        assert_eq!(outline.len(), 4);
        assert_relative_eq!(perimeter(&outline), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn outline_follows_winding() {
        let outline = group_outline(&quad_mesh());
        // Starts at the lowest boundary index and walks the quad's winding
        assert_eq!(outline[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(outline[1], Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn outline_is_in_net_space() {
        let mut mesh = quad_mesh();
        mesh.transform.translation.x = 10.0;
        let outline = group_outline(&mesh);
        assert_relative_eq!(outline[0].x, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn annulus_returns_the_outer_loop() {
        // Square ring: outer 4x4 quad, inner 2x2 hole, triangulated
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0), // 0 outer
            Point3::new(4.0, 0.0, 0.0), // 1
            Point3::new(4.0, 4.0, 0.0), // 2
            Point3::new(0.0, 4.0, 0.0), // 3
            Point3::new(1.0, 1.0, 0.0), // 4 inner
            Point3::new(3.0, 1.0, 0.0), // 5
            Point3::new(3.0, 3.0, 0.0), // 6
            Point3::new(1.0, 3.0, 0.0), // 7
        ];
        let indices = vec![
            [0, 1, 5],
            [0, 5, 4],
            [1, 2, 6],
            [1, 6, 5],
            [2, 3, 7],
            [2, 7, 6],
            [3, 0, 4],
            [3, 4, 7],
        ];
        let mesh = PlacedMesh {
            group: 0,
            kind: GroupKind::Top,
            geometry: GroupGeometry {
                positions,
                indices,
                normals: Vec::new(),
                uvs: Vec::new(),
            },
            transform: RigidTransform::identity(),
        };

        let loops = outline_loops(&mesh);
        assert_eq!(loops.len(), 2);
        let outer = group_outline(&mesh);
        assert_relative_eq!(perimeter(&outer), 16.0, epsilon = 1e-12);
    }

    #[test]
    fn pinch_vertex_splits_into_two_loops() {
        // Bowtie: two triangles touching only at vertex 0, so two boundary
        // loops meet at a single vertex
        let mesh = PlacedMesh {
            group: 0,
            kind: GroupKind::Side,
            geometry: GroupGeometry {
                positions: vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(1.0, 1.0, 0.0),
                    Point3::new(-1.0, 1.0, 0.0),
                    Point3::new(-1.0, -1.0, 0.0),
                    Point3::new(1.0, -1.0, 0.0),
                ],
                indices: vec![[0, 1, 2], [0, 3, 4]],
                normals: Vec::new(),
                uvs: Vec::new(),
            },
            transform: RigidTransform::identity(),
        };

        let loops = outline_loops(&mesh);
        assert_eq!(loops.len(), 2);
        for polygon in &loops {
            assert_eq!(polygon.len(), 3);
        }
        // Each loop visits the shared vertex once
        for polygon in &loops {
            let at_origin = polygon
                .iter()
                .filter(|p| (p.coords).norm() < 1e-12)
                .count();
            assert_eq!(at_origin, 1);
        }
    }

    #[test]
    fn empty_mesh_has_no_outline() {
        let mesh = PlacedMesh {
            group: 0,
            kind: GroupKind::Side,
            geometry: GroupGeometry::default(),
            transform: RigidTransform::identity(),
        };
        assert!(group_outline(&mesh).is_empty());
    }
}
