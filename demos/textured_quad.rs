//! Draws an image stretched over a full-screen quad.
//!
//! `cargo run --example textured_quad -- [image] [config.json]`

use quadblit::app::{run_sample, Sample, WindowConfig};
use quadblit::texture::checkerboard;
use quadblit::RendererConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let image = match args.next() {
        Some(path) => image::open(path)?.to_rgba8(),
        None => checkerboard(64, 64, 8, [219, 234, 0, 255], [40, 40, 40, 255]),
    };
    let renderer_config = match args.next() {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };

    let window_config = WindowConfig {
        title: "Textured Quad".into(),
        ..Default::default()
    };
    run_sample(window_config, renderer_config, Sample::Textured(image))
}
