use std::borrow::Cow;

use crate::binding::{BindingLayout, ARGUMENT_LAYOUT, TEXTURED_LAYOUT};
use crate::error::Result;
use crate::gpu::GpuContext;
use crate::utils::{Position4, TexCoord};

/// A shader program drawn over the full-screen quad.
#[derive(Debug, Clone, Copy)]
pub struct QuadProgram {
    pub label: &'static str,
    pub source: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    /// Fragment resources in bind group 0, if any.
    pub layout: Option<&'static BindingLayout>,
    /// Whether the vertex stage reads texture coordinates from buffer slot 1.
    pub uses_tex_coords: bool,
}

pub const FILL_PROGRAM: QuadProgram = QuadProgram {
    label: "color_fill",
    source: include_str!("../shaders/fill.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    layout: None,
    uses_tex_coords: false,
};

pub const TEXTURED_PROGRAM: QuadProgram = QuadProgram {
    label: "textured",
    source: include_str!("../shaders/textured.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    layout: Some(&TEXTURED_LAYOUT),
    uses_tex_coords: true,
};

pub const ARGUMENT_PROGRAM: QuadProgram = QuadProgram {
    label: "argument_record",
    source: include_str!("../shaders/argument.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
    layout: Some(&ARGUMENT_LAYOUT),
    uses_tex_coords: true,
};

/// Lazily built pipeline state.
///
/// Once `Ready`, the pipeline is never rebuilt; its output format is fixed for the
/// lifetime of the slot.
#[derive(Debug)]
pub enum PipelineSlot<P> {
    Uninitialized,
    Ready {
        format: wgpu::TextureFormat,
        pipeline: P,
    },
}

impl<P> PipelineSlot<P> {
    /// Builds the pipeline for `format` unless one already exists.
    ///
    /// Returns `true` when `build` ran. A failed build leaves the slot uninitialized.
    pub fn ensure_built(
        &mut self,
        format: wgpu::TextureFormat,
        build: impl FnOnce(wgpu::TextureFormat) -> Result<P>,
    ) -> Result<bool> {
        match self {
            PipelineSlot::Ready {
                format: existing, ..
            } => {
                if *existing != format {
                    log::debug!(
                        "keeping pipeline built for {:?}, ignoring requested {:?}",
                        existing,
                        format
                    );
                }
                Ok(false)
            }
            PipelineSlot::Uninitialized => {
                let pipeline = build(format)?;
                *self = PipelineSlot::Ready { format, pipeline };
                Ok(true)
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PipelineSlot::Ready { .. })
    }

    pub fn format(&self) -> Option<wgpu::TextureFormat> {
        match self {
            PipelineSlot::Ready { format, .. } => Some(*format),
            PipelineSlot::Uninitialized => None,
        }
    }

    pub fn get(&self) -> Option<(&P, wgpu::TextureFormat)> {
        match self {
            PipelineSlot::Ready { format, pipeline } => Some((pipeline, *format)),
            PipelineSlot::Uninitialized => None,
        }
    }
}

/// Compiles `program` into a triangle-strip pipeline writing `format`.
///
/// The program's bindings are checked against its layout before compilation, and
/// shader or pipeline validation errors are returned rather than raised.
pub fn build_pipeline(
    ctx: &GpuContext,
    program: &QuadProgram,
    bind_group_layout: Option<&wgpu::BindGroupLayout>,
    format: wgpu::TextureFormat,
) -> Result<wgpu::RenderPipeline> {
    if let Some(layout) = program.layout {
        layout.verify_wgsl(program.source)?;
    }

    let pipeline = ctx.validated(|device| {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(program.label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(program.source)),
        });

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            bind_group_layout.into_iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(program.label),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let mut buffers = vec![Position4::LAYOUT];
        if program.uses_tex_coords {
            buffers.push(TexCoord::LAYOUT);
        }

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(program.vertex_entry),
                buffers: &buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(program.fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    })?;

    log::info!("built {} pipeline for {:?}", program.label, format);
    Ok(pipeline)
}
