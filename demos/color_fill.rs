use quadblit::app::{run_sample, Sample, WindowConfig};
use quadblit::RendererConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let renderer_config = match std::env::args().nth(1) {
        Some(path) => RendererConfig::load(path)?,
        None => RendererConfig::default(),
    };

    let window_config = WindowConfig {
        title: "Color Fill".into(),
        width: 640,
        height: 480,
    };
    run_sample(window_config, renderer_config, Sample::ColorFill)
}
