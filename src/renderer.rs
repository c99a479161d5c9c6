use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::binding::{
    ARGUMENT_LAYOUT, POSITION_BUFFER_SLOT, TEXTURED_LAYOUT, TEX_COORD_BUFFER_SLOT,
};
use crate::config::RendererConfig;
use crate::drawable::DrawableSource;
use crate::error::{RenderError, Result};
use crate::gpu::GpuContext;
use crate::pacing::FramePacer;
use crate::pipeline::{
    build_pipeline, PipelineSlot, QuadProgram, ARGUMENT_PROGRAM, FILL_PROGRAM, TEXTURED_PROGRAM,
};
use crate::texture::SourceTexture;
use crate::utils::{
    copy_compatible, copy_extent, FrameConstants, Size, QUAD_POSITIONS, QUAD_TEX_COORDS,
    QUAD_VERTEX_COUNT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Presented,
    /// Nothing was submitted: no drawable was available, or nothing is ready to draw yet.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterOutcome {
    pub pipeline_built: bool,
}

/// Produces one frame per [`FrameRenderer::render_frame`] call, either by copying a
/// source texture into the drawable or by shading a full-screen quad.
pub struct FrameRenderer {
    ctx: Arc<GpuContext>,
    config: RendererConfig,
    path: RenderPath,
    pacer: FramePacer<wgpu::SubmissionIndex>,
    frames_submitted: u64,
    drawable_size: Option<Size>,
}

enum RenderPath {
    Blit { source: SourceTexture },
    Quad(QuadPass),
}

struct QuadPass {
    program: &'static QuadProgram,
    positions: wgpu::Buffer,
    tex_coords: Option<wgpu::Buffer>,
    pipeline: PipelineSlot<wgpu::RenderPipeline>,
    pipeline_builds: u32,
    bindings: QuadBindings,
}

enum QuadBindings {
    None,
    Texture {
        layout: wgpu::BindGroupLayout,
        bind_group: wgpu::BindGroup,
        _source: SourceTexture,
    },
    Record(ArgumentRecord),
}

impl QuadBindings {
    fn layout(&self) -> Option<&wgpu::BindGroupLayout> {
        match self {
            QuadBindings::None => None,
            QuadBindings::Texture { layout, .. } => Some(layout),
            QuadBindings::Record(record) => Some(&record.layout),
        }
    }
}

/// GPU side of the argument record: layout, sampler and constants are allocated up
/// front, the bind group is (re)built on every registration.
struct ArgumentRecord {
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    constants: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
}

impl FrameRenderer {
    /// Copies `source` into each drawable. The output format is the source's format.
    pub fn blit(ctx: Arc<GpuContext>, source: SourceTexture, config: RendererConfig) -> Self {
        Self::with_path(ctx, config, RenderPath::Blit { source })
    }

    pub fn color_fill(
        ctx: Arc<GpuContext>,
        format: wgpu::TextureFormat,
        config: RendererConfig,
    ) -> Result<Self> {
        let mut pass = QuadPass::new(&ctx, &FILL_PROGRAM, QuadBindings::None);
        pass.ensure_pipeline(&ctx, format)?;
        Ok(Self::with_path(ctx, config, RenderPath::Quad(pass)))
    }

    /// Draws `source` over the whole drawable. The output format is the source's format.
    pub fn textured(
        ctx: Arc<GpuContext>,
        source: SourceTexture,
        config: RendererConfig,
    ) -> Result<Self> {
        let layout = TEXTURED_LAYOUT.create_bind_group_layout(&ctx.device);
        let sampler = config.sampler.create_sampler(&ctx.device);
        let bind_group = TEXTURED_LAYOUT.create_bind_group(
            &ctx.device,
            &layout,
            vec![
                (
                    "source_texture",
                    wgpu::BindingResource::TextureView(source.view()),
                ),
                ("source_sampler", wgpu::BindingResource::Sampler(&sampler)),
            ],
        )?;

        let format = source.format();
        let mut pass = QuadPass::new(
            &ctx,
            &TEXTURED_PROGRAM,
            QuadBindings::Texture {
                layout,
                bind_group,
                _source: source,
            },
        );
        pass.ensure_pipeline(&ctx, format)?;
        Ok(Self::with_path(ctx, config, RenderPath::Quad(pass)))
    }

    /// Renders through the argument record. Nothing is drawn until
    /// [`FrameRenderer::register_resources`] has been called.
    pub fn argument_buffer(ctx: Arc<GpuContext>, config: RendererConfig) -> Self {
        let layout = ARGUMENT_LAYOUT.create_bind_group_layout(&ctx.device);
        let sampler = config.sampler.create_sampler(&ctx.device);
        let constants = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("frame constants"),
                contents: bytemuck::bytes_of(&FrameConstants::default()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let record = ArgumentRecord {
            layout,
            sampler,
            constants,
            bind_group: None,
        };
        let pass = QuadPass::new(&ctx, &ARGUMENT_PROGRAM, QuadBindings::Record(record));
        Self::with_path(ctx, config, RenderPath::Quad(pass))
    }

    fn with_path(ctx: Arc<GpuContext>, config: RendererConfig, path: RenderPath) -> Self {
        let pacer = FramePacer::new(config.max_frames_in_flight);
        Self {
            ctx,
            config,
            path,
            pacer,
            frames_submitted: 0,
            drawable_size: None,
        }
    }

    /// Writes both textures, the sampler and `time` into the argument record.
    ///
    /// Must be called again whenever a referenced texture or the time changes. The
    /// first call compiles the pipeline for the snapshot's format; later calls never
    /// rebuild it.
    pub fn register_resources(
        &mut self,
        snapshot: &SourceTexture,
        camera: &SourceTexture,
        time: f32,
    ) -> Result<RegisterOutcome> {
        let ctx = &self.ctx;
        let path_name = self.path.name();
        let pass = match &mut self.path {
            RenderPath::Quad(pass) => pass,
            RenderPath::Blit { .. } => {
                return Err(RenderError::WrongPath {
                    operation: "register_resources",
                    path: path_name,
                })
            }
        };
        let QuadBindings::Record(record) = &mut pass.bindings else {
            return Err(RenderError::WrongPath {
                operation: "register_resources",
                path: path_name,
            });
        };

        ctx.queue.write_buffer(
            &record.constants,
            0,
            bytemuck::bytes_of(&FrameConstants::new(time)),
        );
        let bind_group = ARGUMENT_LAYOUT.create_bind_group(
            &ctx.device,
            &record.layout,
            vec![
                (
                    "snapshot_texture",
                    wgpu::BindingResource::TextureView(snapshot.view()),
                ),
                (
                    "camera_texture",
                    wgpu::BindingResource::TextureView(camera.view()),
                ),
                (
                    "record_sampler",
                    wgpu::BindingResource::Sampler(&record.sampler),
                ),
                ("constants", record.constants.as_entire_binding()),
            ],
        )?;
        record.bind_group = Some(bind_group);

        let pipeline_built = pass.ensure_pipeline(ctx, snapshot.format())?;
        Ok(RegisterOutcome { pipeline_built })
    }

    pub fn set_time(&mut self, time: f32) -> Result<()> {
        match &self.path {
            RenderPath::Quad(QuadPass {
                bindings: QuadBindings::Record(record),
                ..
            }) => {
                self.ctx.queue.write_buffer(
                    &record.constants,
                    0,
                    bytemuck::bytes_of(&FrameConstants::new(time)),
                );
                Ok(())
            }
            _ => Err(RenderError::WrongPath {
                operation: "set_time",
                path: self.path.name(),
            }),
        }
    }

    /// Rebuilds the pipeline so the shader paths write drawables of `format`.
    ///
    /// Drawables never change the pipeline format implicitly; a host whose surface
    /// format changes calls this before its next frame. Returns whether a pipeline was
    /// built. On the argument path before registration this performs the first build.
    pub fn retarget(&mut self, format: wgpu::TextureFormat) -> Result<bool> {
        let path_name = self.path.name();
        let RenderPath::Quad(pass) = &mut self.path else {
            return Err(RenderError::WrongPath {
                operation: "retarget",
                path: path_name,
            });
        };
        match pass.pipeline.format() {
            Some(current) if current == format => Ok(false),
            Some(current) => {
                log::debug!("retargeting {path_name} from {current:?} to {format:?}");
                pass.rebuild_pipeline(&self.ctx, format)?;
                Ok(true)
            }
            None => pass.ensure_pipeline(&self.ctx, format),
        }
    }

    /// Encodes, submits and presents one frame into the next drawable of `target`.
    ///
    /// Returns [`FrameOutcome::Skipped`] without touching the GPU when `target` has no
    /// drawable, or when an argument record has not been registered yet.
    pub fn render_frame<S: DrawableSource + ?Sized>(
        &mut self,
        target: &mut S,
    ) -> Result<FrameOutcome> {
        if !self.ready_to_draw() {
            log::debug!("{} path has nothing to draw yet", self.path.name());
            return Ok(FrameOutcome::Skipped);
        }
        let Some(drawable) = target.next_drawable() else {
            log::trace!("no drawable available, skipping frame");
            return Ok(FrameOutcome::Skipped);
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });
        match &self.path {
            RenderPath::Blit { source } => encode_blit(&mut encoder, source, drawable.texture())?,
            RenderPath::Quad(pass) => pass.encode(&mut encoder, drawable.texture(), &self.config)?,
        }

        let submission = self.ctx.queue.submit(Some(encoder.finish()));
        drawable.present();
        self.frames_submitted += 1;

        if let Some(wait_for) = self.pacer.push(submission) {
            self.ctx
                .device
                .poll(wgpu::Maintain::WaitForSubmissionIndex(wait_for));
        }
        Ok(FrameOutcome::Presented)
    }

    fn ready_to_draw(&self) -> bool {
        match &self.path {
            RenderPath::Blit { .. } => true,
            RenderPath::Quad(pass) => {
                let bound = match &pass.bindings {
                    QuadBindings::Record(record) => record.bind_group.is_some(),
                    QuadBindings::None | QuadBindings::Texture { .. } => true,
                };
                bound && pass.pipeline.is_ready()
            }
        }
    }

    /// Records the new drawable size. Sizes are informational; nothing is rescaled.
    pub fn resize(&mut self, size: Size) {
        log::debug!("drawable size will change to {}x{}", size.width, size.height);
        self.drawable_size = Some(size);
    }

    pub fn drawable_size(&self) -> Option<Size> {
        self.drawable_size
    }

    pub fn wait_idle(&mut self) {
        if let Some(newest) = self.pacer.drain() {
            self.ctx
                .device
                .poll(wgpu::Maintain::WaitForSubmissionIndex(newest));
        }
    }

    /// Format drawables must have, once known.
    pub fn output_format(&self) -> Option<wgpu::TextureFormat> {
        match &self.path {
            RenderPath::Blit { source } => Some(source.format()),
            RenderPath::Quad(pass) => pass.pipeline.format(),
        }
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    pub fn pipeline_builds(&self) -> u32 {
        match &self.path {
            RenderPath::Blit { .. } => 0,
            RenderPath::Quad(pass) => pass.pipeline_builds,
        }
    }

    pub fn frames_in_flight(&self) -> usize {
        self.pacer.in_flight()
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.ctx
    }
}

impl RenderPath {
    fn name(&self) -> &'static str {
        match self {
            RenderPath::Blit { .. } => "blit",
            RenderPath::Quad(pass) => pass.program.label,
        }
    }
}

impl QuadPass {
    fn new(ctx: &GpuContext, program: &'static QuadProgram, bindings: QuadBindings) -> Self {
        let positions = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad positions"),
                contents: bytemuck::cast_slice(&QUAD_POSITIONS),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let tex_coords = program.uses_tex_coords.then(|| {
            ctx.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("quad texture coordinates"),
                    contents: bytemuck::cast_slice(&QUAD_TEX_COORDS),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });
        Self {
            program,
            positions,
            tex_coords,
            pipeline: PipelineSlot::Uninitialized,
            pipeline_builds: 0,
            bindings,
        }
    }

    fn ensure_pipeline(&mut self, ctx: &GpuContext, format: wgpu::TextureFormat) -> Result<bool> {
        let program = self.program;
        let layout = self.bindings.layout();
        let built = self
            .pipeline
            .ensure_built(format, |format| build_pipeline(ctx, program, layout, format))?;
        if built {
            self.pipeline_builds += 1;
        }
        Ok(built)
    }

    /// Replaces the pipeline with one writing `format`. The old pipeline is kept if
    /// the build fails.
    fn rebuild_pipeline(&mut self, ctx: &GpuContext, format: wgpu::TextureFormat) -> Result<()> {
        let pipeline = build_pipeline(ctx, self.program, self.bindings.layout(), format)?;
        self.pipeline = PipelineSlot::Ready { format, pipeline };
        self.pipeline_builds += 1;
        Ok(())
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::Texture,
        config: &RendererConfig,
    ) -> Result<()> {
        let Some((pipeline, format)) = self.pipeline.get() else {
            return Ok(());
        };
        if target.format() != format {
            return Err(RenderError::FormatMismatch {
                pipeline: format,
                drawable: target.format(),
            });
        }

        let bind_group = match &self.bindings {
            QuadBindings::None => None,
            QuadBindings::Texture { bind_group, .. } => Some(bind_group),
            QuadBindings::Record(record) => record.bind_group.as_ref(),
        };

        let view = target.create_view(&wgpu::TextureViewDescriptor::default());
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(self.program.label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: config.load_action.to_wgpu(),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(POSITION_BUFFER_SLOT, self.positions.slice(..));
        if let Some(tex_coords) = &self.tex_coords {
            rpass.set_vertex_buffer(TEX_COORD_BUFFER_SLOT, tex_coords.slice(..));
        }
        if let Some(bind_group) = bind_group {
            rpass.set_bind_group(0, bind_group, &[]);
        }
        rpass.draw(0..QUAD_VERTEX_COUNT, 0..1);
        Ok(())
    }
}

fn encode_blit(
    encoder: &mut wgpu::CommandEncoder,
    source: &SourceTexture,
    target: &wgpu::Texture,
) -> Result<()> {
    if !copy_compatible(source.format(), target.format()) {
        return Err(RenderError::IncompatibleFormats {
            from: source.format(),
            to: target.format(),
        });
    }
    let extent = copy_extent(source.size(), target.size());
    encoder.copy_texture_to_texture(
        wgpu::ImageCopyTexture {
            texture: source.texture(),
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyTexture {
            texture: target,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        extent,
    );
    Ok(())
}
