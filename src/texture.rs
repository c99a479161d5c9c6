use image::RgbaImage;
use std::path::Path;

use crate::error::{RenderError, Result};
use crate::gpu::GpuContext;

/// A GPU-resident image loaded once and never modified afterwards.
#[derive(Debug)]
pub struct SourceTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl SourceTexture {
    pub fn from_path(
        ctx: &GpuContext,
        path: impl AsRef<Path>,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgba8();
        Self::from_rgba(ctx, &image, format, &path.display().to_string())
    }

    /// Decodes an in-memory encoded image (PNG, JPEG, ...).
    pub fn from_bytes(
        ctx: &GpuContext,
        bytes: &[u8],
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Self::from_rgba(ctx, &image, format, label)
    }

    /// Uploads already decoded RGBA pixels, swizzling them for BGRA formats.
    pub fn from_rgba(
        ctx: &GpuContext,
        image: &RgbaImage,
        format: wgpu::TextureFormat,
        label: &str,
    ) -> Result<Self> {
        let swap_red_blue = is_bgra(format)?;
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        check_extent(ctx, width, height)?;

        let mut pixels = image.as_raw().clone();
        if swap_red_blue {
            swap_red_blue_in_place(&mut pixels);
        }

        let texture = ctx.validated(|device| {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_SRC
                    | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            });
            ctx.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &pixels,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                size,
            );
            texture
        })?;

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self { texture, view })
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    pub fn size(&self) -> wgpu::Extent3d {
        self.texture.size()
    }
}

/// Rejects 2D sizes the device cannot allocate.
pub(crate) fn check_extent(ctx: &GpuContext, width: u32, height: u32) -> Result<()> {
    let max = ctx.device.limits().max_texture_dimension_2d;
    let reason = if width == 0 || height == 0 {
        "textures must not be empty".to_string()
    } else if width > max || height > max {
        format!("the device allows at most {max} pixels per side")
    } else {
        return Ok(());
    };
    Err(RenderError::TextureSize {
        width,
        height,
        reason,
    })
}

/// Whether `format` stores blue first. Only 8-bit RGBA and BGRA formats are accepted.
pub fn is_bgra(format: wgpu::TextureFormat) -> Result<bool> {
    match format {
        wgpu::TextureFormat::Rgba8Unorm | wgpu::TextureFormat::Rgba8UnormSrgb => Ok(false),
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => Ok(true),
        other => Err(RenderError::UnsupportedFormat(other)),
    }
}

pub(crate) fn swap_red_blue_in_place(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
}

/// Copies a texture back to the CPU as RGBA, undoing the BGRA swizzle if needed.
///
/// The texture must have been created with `COPY_SRC`.
pub fn read_rgba(ctx: &GpuContext, texture: &wgpu::Texture) -> Result<RgbaImage> {
    let swap_red_blue = is_bgra(texture.format())?;
    let size = texture.size();
    let unpadded_bytes_per_row = size.width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

    let output = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback buffer"),
        size: (bytes_per_row as u64) * (size.height as u64),
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("readback encoder"),
        });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &output,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(size.height),
            },
        },
        wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
    );
    ctx.queue.submit(Some(encoder.finish()));

    let slice = output.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    ctx.device.poll(wgpu::Maintain::Wait);
    rx.recv()
        .map_err(|e| RenderError::Readback(format!("channel closed: {e}")))?
        .map_err(|e| RenderError::Readback(e.to_string()))?;

    let mut rgba = Vec::with_capacity((unpadded_bytes_per_row * size.height) as usize);
    {
        let view = slice.get_mapped_range();
        for row in view.chunks(bytes_per_row as usize) {
            rgba.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
        }
    }
    output.unmap();

    if swap_red_blue {
        swap_red_blue_in_place(&mut rgba);
    }
    RgbaImage::from_raw(size.width, size.height, rgba)
        .ok_or_else(|| RenderError::Readback("short buffer".to_string()))
}

pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> RgbaImage {
    let cell = cell.max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            image::Rgba(a)
        } else {
            image::Rgba(b)
        }
    })
}
