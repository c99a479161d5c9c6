//! Blends two images through an argument record; press space to advance the blend.
//!
//! `cargo run --example argument_buffer -- [snapshot] [camera] [config.json]`

use quadblit::app::{run_sample, Sample, WindowConfig};
use quadblit::texture::checkerboard;
use quadblit::RendererConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let snapshot = match args.next() {
        Some(path) => image::open(path)?.to_rgba8(),
        None => checkerboard(512, 512, 64, [200, 40, 40, 255], [20, 20, 20, 255]),
    };
    let camera = match args.next() {
        Some(path) => image::open(path)?.to_rgba8(),
        None => checkerboard(512, 512, 16, [40, 40, 200, 255], [230, 230, 230, 255]),
    };
    let renderer_config = match args.next() {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };

    let window_config = WindowConfig {
        title: "Argument Buffer".into(),
        ..Default::default()
    };
    run_sample(
        window_config,
        renderer_config,
        Sample::ArgumentBuffer { snapshot, camera },
    )
}
