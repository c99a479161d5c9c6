use std::f32::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use quadblit::config::PowerPreference;
use quadblit::texture::checkerboard;
use quadblit::{
    FrameOutcome, FrameRenderer, GpuContext, OffscreenTarget, RendererConfig, SourceTexture,
};

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const WIDTH: u32 = 256;
const HEIGHT: u32 = 256;
const TOLERANCE: u8 = 3;

fn compare_with_tolerance(a_path: &Path, b_path: &Path, tolerance: u8) -> anyhow::Result<bool> {
    let a = image::open(a_path)?.to_rgba8();
    let b = image::open(b_path)?.to_rgba8();

    if a.dimensions() != b.dimensions() {
        return Ok(false);
    }
    Ok(a.pixels().zip(b.pixels()).all(|(pa, pb)| {
        let da = pa.0;
        let db = pb.0;
        (0..4).all(|i| da[i].abs_diff(db[i]) <= tolerance)
    }))
}

/// Renders one frame into a fresh offscreen target, then saves and compares it.
fn snapshot(
    ctx: &GpuContext,
    name: &str,
    renderer: &mut FrameRenderer,
    background: Option<&image::RgbaImage>,
) -> anyhow::Result<bool> {
    let mut target = OffscreenTarget::new(ctx, WIDTH, HEIGHT, FORMAT)?;
    if let Some(background) = background {
        target.write_rgba(ctx, background)?;
    }
    if renderer.render_frame(&mut target)? == FrameOutcome::Skipped {
        anyhow::bail!("{name}: frame was skipped");
    }
    renderer.wait_idle();

    fs::create_dir_all("snapshots/actual")?;
    fs::create_dir_all("snapshots/golden")?;
    let out_actual = Path::new("snapshots/actual").join(format!("{name}.png"));
    let out_golden = Path::new("snapshots/golden").join(format!("{name}.png"));
    target.read_rgba(ctx)?.save(&out_actual)?;

    if !out_golden.exists() {
        fs::copy(&out_actual, &out_golden)?;
        println!("golden created at {}", out_golden.display());
        return Ok(true);
    }
    let ok = compare_with_tolerance(&out_actual, &out_golden, TOLERANCE)?;
    println!("{name} snapshot {}", if ok { "OK" } else { "MISMATCH" });
    Ok(ok)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let ctx = Arc::new(GpuContext::headless(PowerPreference::LowPower)?);
    let config = RendererConfig::default();

    let dark = [30, 30, 30, 255];
    let light = [220, 220, 220, 255];
    let board = checkerboard(WIDTH / 2, HEIGHT / 2, 16, dark, light);
    let backdrop = checkerboard(WIDTH, HEIGHT, 64, [0, 0, 128, 255], [0, 0, 64, 255]);

    let mut all_ok = true;

    let source = SourceTexture::from_rgba(&ctx, &board, FORMAT, "blit source")?;
    let mut blit = FrameRenderer::blit(ctx.clone(), source, config.clone());
    all_ok &= snapshot(&ctx, "blit", &mut blit, Some(&backdrop))?;

    let mut fill = FrameRenderer::color_fill(ctx.clone(), FORMAT, config.clone())?;
    all_ok &= snapshot(&ctx, "color_fill", &mut fill, None)?;

    let source = SourceTexture::from_rgba(&ctx, &board, FORMAT, "quad source")?;
    let mut textured = FrameRenderer::textured(ctx.clone(), source, config.clone())?;
    all_ok &= snapshot(&ctx, "textured_quad", &mut textured, None)?;

    let snapshot_image = checkerboard(WIDTH, HEIGHT, 32, [200, 40, 40, 255], dark);
    let camera_image = checkerboard(WIDTH, HEIGHT, 8, [40, 40, 200, 255], light);
    let snapshot_texture = SourceTexture::from_rgba(&ctx, &snapshot_image, FORMAT, "snapshot")?;
    let camera_texture = SourceTexture::from_rgba(&ctx, &camera_image, FORMAT, "camera")?;
    let mut argument = FrameRenderer::argument_buffer(ctx.clone(), config);
    for (name, time) in [
        ("argument_snapshot", -FRAC_PI_2),
        ("argument_blend", 0.0),
        ("argument_camera", FRAC_PI_2),
    ] {
        argument.register_resources(&snapshot_texture, &camera_texture, time)?;
        all_ok &= snapshot(&ctx, name, &mut argument, None)?;
    }

    if !all_ok {
        anyhow::bail!("one or more snapshots differ from their golden image");
    }
    Ok(())
}
