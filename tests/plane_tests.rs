use std::f32::consts::FRAC_PI_2;

use quadblit::plane::{find_plane_node, rotation_x, Geometry, PlaneAnchor, SceneNode, PLANE_COLOR};

const EPSILON: f32 = 1e-6;

fn anchor(x: f32, z: f32) -> PlaneAnchor {
    PlaneAnchor {
        center: [0.0, 0.0, 0.0],
        extent: [x, 0.0, z],
    }
}

fn plane_size(parent: &mut SceneNode) -> (f32, f32) {
    match find_plane_node(parent).and_then(|node| node.geometry) {
        Some(Geometry::Plane { width, height }) => (width, height),
        other => panic!("no plane node: {other:?}"),
    }
}

#[test]
fn added_plane_uses_horizontal_extent() {
    let mut parent = SceneNode::default();
    let index = anchor(0.5, 0.3).add_plane_node(&mut parent);

    assert_eq!(index, 0);
    assert_eq!(plane_size(&mut parent), (0.5, 0.3));
    assert_eq!(parent.children[0].color, Some(PLANE_COLOR));
}

#[test]
fn added_plane_lies_flat() {
    let mut parent = SceneNode::default();
    anchor(1.0, 1.0).add_plane_node(&mut parent);

    let transform = parent.children[0].transform;
    let expected = rotation_x(-FRAC_PI_2);
    for (row, expected_row) in transform.iter().zip(expected.iter()) {
        for (value, expected_value) in row.iter().zip(expected_row.iter()) {
            assert!((value - expected_value).abs() < EPSILON);
        }
    }
    // local +Y maps onto -Z
    assert!((transform[1][2] + 1.0).abs() < EPSILON);
}

#[test]
fn update_resizes_plane() {
    let mut parent = SceneNode::default();
    anchor(0.5, 0.3).add_plane_node(&mut parent);

    assert!(anchor(0.8, 0.6).update_plane_node(&mut parent));
    assert_eq!(plane_size(&mut parent), (0.8, 0.6));
}

#[test]
fn update_with_same_extent_reports_no_change() {
    let mut parent = SceneNode::default();
    anchor(0.5, 0.3).add_plane_node(&mut parent);

    assert!(!anchor(0.5, 0.3).update_plane_node(&mut parent));
    assert_eq!(plane_size(&mut parent), (0.5, 0.3));
}

#[test]
fn update_without_plane_child_does_nothing() {
    let mut parent = SceneNode::default();
    parent.add_child(SceneNode::sphere([1.0, 0.0, 0.0, 1.0]));

    assert!(!anchor(0.5, 0.3).update_plane_node(&mut parent));
    assert_eq!(parent.children.len(), 1);
}

#[test]
fn plane_is_found_among_other_children() {
    let mut parent = SceneNode::default();
    parent.add_child(SceneNode::sphere([1.0, 0.0, 0.0, 1.0]));
    let index = anchor(0.2, 0.4).add_plane_node(&mut parent);

    assert_eq!(index, 1);
    assert!(anchor(0.25, 0.4).update_plane_node(&mut parent));
    assert_eq!(plane_size(&mut parent), (0.25, 0.4));
}
