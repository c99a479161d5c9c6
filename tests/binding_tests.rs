use quadblit::binding::{
    parse_wgsl_bindings, DeclaredKind, SlotKind, ARGUMENT_LAYOUT, TEXTURED_LAYOUT,
};
use quadblit::pipeline::{ARGUMENT_PROGRAM, FILL_PROGRAM, TEXTURED_PROGRAM};
use quadblit::RenderError;

fn assert_mismatch(result: quadblit::Result<()>, needle: &str) {
    match result {
        Err(RenderError::BindingMismatch { detail, .. }) => {
            assert!(detail.contains(needle), "unexpected detail: {detail}")
        }
        other => panic!("expected a binding mismatch, got {other:?}"),
    }
}

#[test]
fn bundled_shaders_match_their_layouts() {
    for program in [TEXTURED_PROGRAM, ARGUMENT_PROGRAM] {
        let layout = program.layout.expect("program has a layout");
        layout
            .verify_wgsl(program.source)
            .unwrap_or_else(|e| panic!("{}: {e}", program.label));
    }
    assert!(FILL_PROGRAM.layout.is_none());
    assert!(parse_wgsl_bindings(FILL_PROGRAM.source).unwrap().is_empty());
}

#[test]
fn parses_argument_record_declarations() {
    let bindings = parse_wgsl_bindings(ARGUMENT_PROGRAM.source).unwrap();
    let names: Vec<(u32, &str)> = bindings.iter().map(|b| (b.index, b.name.as_str())).collect();
    assert_eq!(
        names,
        vec![
            (0, "snapshot_texture"),
            (1, "camera_texture"),
            (2, "record_sampler"),
            (3, "constants"),
        ]
    );
    assert_eq!(bindings[0].kind, DeclaredKind::Texture);
    assert_eq!(bindings[2].kind, DeclaredKind::Sampler);
    assert_eq!(bindings[3].kind, DeclaredKind::Uniform { size: 16 });
}

#[test]
fn swapped_texture_indices_are_rejected() {
    let swapped = ARGUMENT_PROGRAM
        .source
        .replace("@binding(0) var snapshot", "@binding(1) var snapshot")
        .replace("@binding(1) var camera", "@binding(0) var camera");
    assert_mismatch(ARGUMENT_LAYOUT.verify_wgsl(&swapped), "snapshot_texture");
}

#[test]
fn missing_declaration_is_rejected() {
    let source = "@group(0) @binding(0) var source_texture: texture_2d<f32>;";
    assert_mismatch(TEXTURED_LAYOUT.verify_wgsl(source), "source_sampler");
}

#[test]
fn commented_out_declaration_does_not_count() {
    let source = "
        @group(0) @binding(0) var source_texture: texture_2d<f32>;
        // @group(0) @binding(1) var source_sampler: sampler;
    ";
    assert_mismatch(TEXTURED_LAYOUT.verify_wgsl(source), "source_sampler");
}

#[test]
fn block_commented_declaration_does_not_count() {
    let source = "
        @group(0) @binding(0) var source_texture: texture_2d<f32>;
        /* @group(0) @binding(1) var source_sampler: sampler; */
    ";
    assert_mismatch(TEXTURED_LAYOUT.verify_wgsl(source), "source_sampler");
}

#[test]
fn attribute_order_does_not_matter() {
    let source = "
        @binding(0) @group(0) var source_texture: texture_2d<f32>;
        @binding(1) @group(0)
        var source_sampler: sampler;
    ";
    TEXTURED_LAYOUT.verify_wgsl(source).unwrap();
}

#[test]
fn malformed_shader_is_a_parse_error() {
    let err = TEXTURED_LAYOUT
        .verify_wgsl("@group(0) @binding(0) var source_texture texture_2d<f32>;")
        .unwrap_err();
    assert!(matches!(err, RenderError::ShaderParse(_)), "{err:?}");
}

#[test]
fn uniform_of_the_wrong_size_is_rejected() {
    let source = ARGUMENT_PROGRAM
        .source
        .replace("    _padding2: f32,\n", "    _padding2: f32,\n    extra: vec4<f32>,\n");
    assert_ne!(source, ARGUMENT_PROGRAM.source);
    assert_mismatch(ARGUMENT_LAYOUT.verify_wgsl(&source), "constants");
}

#[test]
fn wrong_resource_kind_is_rejected() {
    let source = "
        @group(0) @binding(0) var source_texture: sampler;
        @group(0) @binding(1) var source_sampler: sampler;
    ";
    assert_mismatch(TEXTURED_LAYOUT.verify_wgsl(source), "source_texture");
}

#[test]
fn undeclared_extra_binding_is_rejected() {
    let source = format!(
        "{}\n@group(0) @binding(7) var stray: texture_2d<f32>;",
        TEXTURED_PROGRAM.source
    );
    assert_mismatch(TEXTURED_LAYOUT.verify_wgsl(&source), "stray");
}

#[test]
fn bindings_in_other_groups_are_ignored() {
    let source = format!(
        "{}\n@group(1) @binding(0) var elsewhere: texture_2d<f32>;",
        TEXTURED_PROGRAM.source
    );
    assert!(TEXTURED_LAYOUT.verify_wgsl(&source).is_ok());
}

#[test]
fn layout_entries_follow_slot_indices() {
    let entries = ARGUMENT_LAYOUT.layout_entries();
    let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
    assert_eq!(bindings, vec![0, 1, 2, 3]);
    assert!(entries
        .iter()
        .all(|e| e.visibility == wgpu::ShaderStages::FRAGMENT));

    let constants = ARGUMENT_LAYOUT.slot("constants").expect("constants slot");
    assert_eq!(constants.kind, SlotKind::Uniform { size: 16 });
    assert!(ARGUMENT_LAYOUT.slot("source_texture").is_none());
}
