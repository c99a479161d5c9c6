use quadblit::config::{AddressMode, Filter, LoadAction, PowerPreference};
use quadblit::{RenderError, RendererConfig};

#[test]
fn empty_document_gives_defaults() {
    let config = RendererConfig::from_json("{}").unwrap();
    assert_eq!(config, RendererConfig::default());
    assert_eq!(config.max_frames_in_flight, 1);
    assert_eq!(config.load_action, LoadAction::Clear([0.0, 0.0, 0.0, 1.0]));
}

#[test]
fn parses_every_field() {
    let config = RendererConfig::from_json(
        r#"{
            "max_frames_in_flight": 3,
            "load_action": "load",
            "sampler": { "mag_filter": "nearest", "address_mode": "repeat" },
            "power_preference": "low_power"
        }"#,
    )
    .unwrap();

    assert_eq!(config.max_frames_in_flight, 3);
    assert_eq!(config.load_action, LoadAction::Load);
    assert_eq!(config.sampler.mag_filter, Filter::Nearest);
    assert_eq!(config.sampler.min_filter, Filter::Linear);
    assert_eq!(config.sampler.address_mode, AddressMode::Repeat);
    assert_eq!(config.power_preference, PowerPreference::LowPower);
}

#[test]
fn clear_color_maps_to_wgpu() {
    let json = r#"{ "load_action": { "clear": [1.0, 0.5, 0.0, 1.0] } }"#;
    let config = RendererConfig::from_json(json).unwrap();
    match config.load_action.to_wgpu() {
        wgpu::LoadOp::Clear(color) => {
            assert_eq!((color.r, color.g, color.b, color.a), (1.0, 0.5, 0.0, 1.0))
        }
        wgpu::LoadOp::Load => panic!("expected a clear"),
    }
}

#[test]
fn zero_frames_in_flight_is_normalized() {
    let config = RendererConfig::from_json(r#"{ "max_frames_in_flight": 0 }"#).unwrap();
    assert_eq!(config.max_frames_in_flight, 1);
}

#[test]
fn unknown_variant_is_a_config_error() {
    let err = RendererConfig::from_json(r#"{ "load_action": "discard" }"#).unwrap_err();
    assert!(matches!(err, RenderError::Config(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = RendererConfig::load("does/not/exist.json").unwrap_err();
    assert!(matches!(err, RenderError::Io(_)));
}
