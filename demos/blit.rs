//! Copies an image into the window's drawable on every redraw.
//!
//! `cargo run --example blit -- [image] [config.json]`

use quadblit::app::{run_sample, Sample, WindowConfig};
use quadblit::texture::checkerboard;
use quadblit::RendererConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let image = match args.next() {
        Some(path) => image::open(path)?.to_rgba8(),
        None => checkerboard(512, 512, 32, [24, 24, 24, 255], [230, 230, 230, 255]),
    };
    let renderer_config = match args.next() {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };

    let window_config = WindowConfig {
        title: "Blit".into(),
        ..Default::default()
    };
    run_sample(window_config, renderer_config, Sample::Blit(image))
}
