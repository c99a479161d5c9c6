use image::RgbaImage;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::config::RendererConfig;
use crate::drawable::SurfaceSource;
use crate::error::{RenderError, Result};
use crate::gpu::GpuContext;
use crate::renderer::{FrameOutcome, FrameRenderer};
use crate::texture::{is_bgra, SourceTexture};

pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "quadblit".to_string(),
            width: 800,
            height: 600,
        }
    }
}

pub enum Sample {
    Blit(RgbaImage),
    ColorFill,
    Textured(RgbaImage),
    ArgumentBuffer {
        snapshot: RgbaImage,
        camera: RgbaImage,
    },
}

impl Sample {
    fn needs_copy_dst(&self) -> bool {
        matches!(self, Sample::Blit(_))
    }
}

struct RunningSample {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    renderer: FrameRenderer,
    uses_time: bool,
    // Textures referenced by the argument record.
    _registered: Vec<SourceTexture>,
}

/// Hosts one sample in a window and redraws it on demand.
///
/// A frame is requested when the window opens, when it is resized and when the
/// space bar is pressed; there is no continuous redraw loop.
pub struct SampleApp {
    window_config: WindowConfig,
    renderer_config: RendererConfig,
    sample: Option<Sample>,
    running: Option<RunningSample>,
    started: std::time::Instant,
    error: Option<RenderError>,
}

impl SampleApp {
    pub fn new(
        window_config: WindowConfig,
        renderer_config: RendererConfig,
        sample: Sample,
    ) -> Self {
        Self {
            window_config,
            renderer_config,
            sample: Some(sample),
            running: None,
            started: std::time::Instant::now(),
            error: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop, sample: Sample) -> Result<RunningSample> {
        let window_attributes = Window::default_attributes()
            .with_title(&self.window_config.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.window_config.width,
                self.window_config.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .map_err(|e| RenderError::Window(e.to_string()))?,
        );

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::Window(e.to_string()))?;
        let ctx = Arc::new(GpuContext::for_surface(
            instance,
            &surface,
            self.renderer_config.power_preference,
        )?);

        let caps = surface.get_capabilities(&ctx.adapter);
        // Source textures are loaded in the surface's format so drawables and pipelines agree.
        let format = caps
            .formats
            .iter()
            .copied()
            .filter(|format| is_bgra(*format).is_ok())
            .find(|format| format.is_srgb())
            .or_else(|| caps.formats.iter().copied().find(|f| is_bgra(*f).is_ok()))
            .ok_or_else(|| {
                RenderError::UnsupportedFormat(
                    caps.formats
                        .first()
                        .copied()
                        .unwrap_or(wgpu::TextureFormat::Rgba8Unorm),
                )
            })?;

        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        if sample.needs_copy_dst() {
            if !caps.usages.contains(wgpu::TextureUsages::COPY_DST) {
                return Err(RenderError::SurfaceUsage(wgpu::TextureUsages::COPY_DST));
            }
            usage |= wgpu::TextureUsages::COPY_DST;
        }

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: vec![],
        };
        surface.configure(&ctx.device, &surface_config);

        let config = self.renderer_config.clone();
        let mut registered = Vec::new();
        let renderer = match sample {
            Sample::Blit(image) => {
                let source = SourceTexture::from_rgba(&ctx, &image, format, "blit source")?;
                FrameRenderer::blit(ctx, source, config)
            }
            Sample::ColorFill => FrameRenderer::color_fill(ctx, format, config)?,
            Sample::Textured(image) => {
                let source = SourceTexture::from_rgba(&ctx, &image, format, "quad source")?;
                FrameRenderer::textured(ctx, source, config)?
            }
            Sample::ArgumentBuffer { snapshot, camera } => {
                let snapshot = SourceTexture::from_rgba(&ctx, &snapshot, format, "snapshot")?;
                let camera = SourceTexture::from_rgba(&ctx, &camera, format, "camera")?;
                let mut renderer = FrameRenderer::argument_buffer(ctx, config);
                renderer.register_resources(&snapshot, &camera, 0.0)?;
                registered.push(snapshot);
                registered.push(camera);
                renderer
            }
        };

        Ok(RunningSample {
            window,
            surface,
            surface_config,
            renderer,
            uses_time: !registered.is_empty(),
            _registered: registered,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler<()> for SampleApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(sample) = self.sample.take() else {
            return;
        };
        match self.start(event_loop, sample) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = self.running.as_mut() else {
            return;
        };
        match event {
            WindowEvent::RedrawRequested => {
                if running.uses_time {
                    let time = self.started.elapsed().as_secs_f32();
                    if let Err(err) = running.renderer.set_time(time) {
                        self.fail(event_loop, err);
                        return;
                    }
                }
                let ctx = running.renderer.context().clone();
                let mut target =
                    SurfaceSource::new(&running.surface, &ctx.device, &running.surface_config);
                match running.renderer.render_frame(&mut target) {
                    Ok(FrameOutcome::Presented) => {}
                    Ok(FrameOutcome::Skipped) => log::debug!("frame skipped"),
                    Err(err) => self.fail(event_loop, err),
                }
            }
            WindowEvent::Resized(new_size) => {
                if new_size.width > 0 && new_size.height > 0 {
                    running.surface_config.width = new_size.width;
                    running.surface_config.height = new_size.height;
                    let device = &running.renderer.context().device;
                    running.surface.configure(device, &running.surface_config);
                    running.renderer.resize(new_size.into());
                    running.window.request_redraw();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() && event.logical_key == Key::Named(NamedKey::Space) {
                    running.window.request_redraw();
                }
            }
            WindowEvent::CloseRequested => {
                running.renderer.wait_idle();
                event_loop.exit();
            }
            _ => (),
        }
    }
}

pub fn run_sample(
    window_config: WindowConfig,
    renderer_config: RendererConfig,
    sample: Sample,
) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = SampleApp::new(window_config, renderer_config, sample);
    event_loop.run_app(&mut app)?;
    match app.error.take() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
