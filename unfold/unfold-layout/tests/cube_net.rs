//! End-to-end pipeline test on a unit cube.
//!
//! Twelve triangles unfold into the classic six-square cross: one top, one
//! bottom, four sides, every hinge seamless.

use approx::assert_relative_eq;
use unfold_group::GroupKind;
use unfold_layout::{unfold_buffers, NetLayout, UnfoldParams};

/// Unit cube as a raw triangle soup, outward normals, CCW winding.
#[rustfmt::skip]
fn cube_positions() -> Vec<f64> {
    vec![
        // top (z = 1), +z
        0.0, 0.0, 1.0,  1.0, 0.0, 1.0,  1.0, 1.0, 1.0,
        0.0, 0.0, 1.0,  1.0, 1.0, 1.0,  0.0, 1.0, 1.0,
        // bottom (z = 0), -z
        0.0, 0.0, 0.0,  0.0, 1.0, 0.0,  1.0, 1.0, 0.0,
        0.0, 0.0, 0.0,  1.0, 1.0, 0.0,  1.0, 0.0, 0.0,
        // front (y = 0), -y
        0.0, 0.0, 0.0,  1.0, 0.0, 0.0,  1.0, 0.0, 1.0,
        0.0, 0.0, 0.0,  1.0, 0.0, 1.0,  0.0, 0.0, 1.0,
        // right (x = 1), +x
        1.0, 0.0, 0.0,  1.0, 1.0, 0.0,  1.0, 1.0, 1.0,
        1.0, 0.0, 0.0,  1.0, 1.0, 1.0,  1.0, 0.0, 1.0,
        // back (y = 1), +y
        1.0, 1.0, 0.0,  0.0, 1.0, 0.0,  0.0, 1.0, 1.0,
        1.0, 1.0, 0.0,  0.0, 1.0, 1.0,  1.0, 1.0, 1.0,
        // left (x = 0), -x
        0.0, 1.0, 0.0,  0.0, 0.0, 0.0,  0.0, 0.0, 1.0,
        0.0, 1.0, 0.0,  0.0, 0.0, 1.0,  0.0, 1.0, 1.0,
    ]
}

fn cube_params() -> UnfoldParams {
    let mut params = UnfoldParams::default();
    params.grouping = unfold_group::GroupingParams::from_degrees(10.0);
    params
}

fn unfold_cube() -> NetLayout {
    unfold_buffers(&cube_positions(), None, &cube_params()).expect("cube unfolds")
}

#[test]
fn cube_makes_six_groups() {
    let net = unfold_cube();
    assert_eq!(net.groups.len(), 6);
    assert_eq!(net.placed.len(), 6);
    assert!(net.is_complete());

    let mut tops = 0;
    let mut bottoms = 0;
    let mut sides = 0;
    for group in net.groups.iter() {
        match group.kind {
            GroupKind::Top => tops += 1,
            GroupKind::Bottom => bottoms += 1,
            GroupKind::Side => sides += 1,
            GroupKind::Unclassified => panic!("no cube face is degenerate"),
        }
    }
    assert_eq!((tops, bottoms, sides), (1, 1, 4));
}

#[test]
fn every_face_lands_in_exactly_one_group() {
    let net = unfold_cube();
    let mut counted = 0;
    for group in net.groups.iter() {
        assert_eq!(group.faces.len(), 2); // one quad per cube face
        for &face in &group.faces {
            assert_eq!(net.groups.group_of(face), Some(group.id));
            counted += 1;
        }
    }
    assert_eq!(counted, 12);
}

#[test]
fn net_is_flat() {
    let net = unfold_cube();
    for mesh in &net.placed {
        for p in &mesh.geometry.positions {
            let placed = mesh.transform.transform_point(p);
            assert_relative_eq!(placed.z, 0.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn hinges_stay_seamless() {
    let positions = cube_positions();
    let soup = unfold_types::TriangleSoup::from_buffers(&positions, None, 1e-6)
        .expect("soup");
    let params = cube_params();

    let mut groups =
        unfold_group::build_face_groups(&soup, &params.grouping).expect("groups");
    unfold_group::classify_groups(&mut groups, &params.classify).expect("classify");
    let graph = unfold_graph::build_connectivity(&soup, &groups, &params.graph).expect("graph");
    let plan = unfold_graph::plan_unfold(&groups, &graph, &params.plan).expect("plan");
    let layout = unfold_layout::layout_groups(&soup, &groups, &graph, &plan, params.top_bottom)
        .expect("layout");

    let transform_of = |group| {
        layout
            .placed
            .iter()
            .find(|m| m.group == group)
            .map(|m| m.transform)
            .expect("placed")
    };

    for entry in plan.entries().iter().skip(1) {
        let parent = entry.parent.expect("non-root entries have parents");
        let edge = graph.edge_between(entry.group, parent).expect("hinge");
        let child_t = transform_of(entry.group);
        let parent_t = transform_of(parent);
        let start_gap =
            (child_t.transform_point(&edge.start) - parent_t.transform_point(&edge.start)).norm();
        let end_gap =
            (child_t.transform_point(&edge.end) - parent_t.transform_point(&edge.end)).norm();
        assert!(start_gap <= 1e-4, "hinge start gap {start_gap}");
        assert!(end_gap <= 1e-4, "hinge end gap {end_gap}");
    }
}

#[test]
fn uvs_stay_in_range() {
    let net = unfold_cube();
    for mesh in &net.placed {
        assert_eq!(mesh.geometry.uvs.len(), mesh.geometry.positions.len());
        for uv in &mesh.geometry.uvs {
            assert!(uv[0] > -0.1 && uv[0] < 1.1);
            assert!(uv[1] > -0.1 && uv[1] < 1.1);
        }
    }
}

#[test]
fn unfolding_twice_gives_the_same_net() {
    let first = unfold_cube();
    let second = unfold_cube();
    assert_eq!(first.placed.len(), second.placed.len());
    for (a, b) in first.placed.iter().zip(&second.placed) {
        assert_eq!(a.group, b.group);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.geometry.positions, b.geometry.positions);
        assert_eq!(a.transform, b.transform);
        assert_eq!(a.geometry.uvs, b.geometry.uvs);
    }
}

#[test]
fn outlines_are_squares() {
    let net = unfold_cube();
    for mesh in &net.placed {
        let outline = unfold_layout::group_outline(mesh);
        assert_eq!(outline.len(), 4);
        // Perimeter of a unit square
        let mut perimeter = 0.0;
        for i in 0..outline.len() {
            let j = (i + 1) % outline.len();
            perimeter += (outline[j] - outline[i]).norm();
        }
        assert_relative_eq!(perimeter, 4.0, epsilon = 1e-9);
    }
}
