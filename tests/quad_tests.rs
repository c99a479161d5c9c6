use quadblit::utils::{clip_bounds, QUAD_POSITIONS, QUAD_TEX_COORDS, QUAD_VERTEX_COUNT};

#[test]
fn quad_covers_full_clip_space() {
    let (min, max) = clip_bounds(&QUAD_POSITIONS);
    assert_eq!(min, [-1.0, -1.0]);
    assert_eq!(max, [1.0, 1.0]);
}

#[test]
fn quad_is_a_four_vertex_strip_on_the_near_plane() {
    assert_eq!(QUAD_VERTEX_COUNT, 4);
    assert_eq!(QUAD_TEX_COORDS.len(), QUAD_POSITIONS.len());
    for position in QUAD_POSITIONS {
        assert_eq!(position.0[2], 0.0, "z should be 0");
        assert_eq!(position.0[3], 1.0, "w should be 1");
    }
}

#[test]
fn strip_triangles_share_the_diagonal() {
    // In a strip, triangles (0,1,2) and (1,2,3) share the edge 1-2, which must be a
    // diagonal of the quad for both triangles to cover it without overlap.
    let [_, a, b, _] = QUAD_POSITIONS;
    assert_eq!(a.0[0], -b.0[0]);
    assert_eq!(a.0[1], -b.0[1]);
}

#[test]
fn texture_coordinates_flip_vertically() {
    for (position, uv) in QUAD_POSITIONS.iter().zip(QUAD_TEX_COORDS.iter()) {
        let expected_u = (position.0[0] + 1.0) / 2.0;
        let expected_v = (1.0 - position.0[1]) / 2.0;
        assert_eq!(uv.0, [expected_u, expected_v]);
    }
}
