use image::RgbaImage;

use crate::error::{RenderError, Result};
use crate::gpu::GpuContext;
use crate::texture::{check_extent, is_bgra, read_rgba, swap_red_blue_in_place};

/// The destination image of a single frame.
///
/// Borrowed from its [`DrawableSource`] for exactly one frame and given back by
/// [`Drawable::present`].
pub enum Drawable<'a> {
    Surface(wgpu::SurfaceTexture),
    Offscreen(&'a wgpu::Texture),
}

impl Drawable<'_> {
    pub fn texture(&self) -> &wgpu::Texture {
        match self {
            Drawable::Surface(frame) => &frame.texture,
            Drawable::Offscreen(texture) => texture,
        }
    }

    pub fn present(self) {
        if let Drawable::Surface(frame) = self {
            frame.present();
        }
    }
}

/// Hands out a fresh drawable per frame, or `None` when nothing can be drawn right now.
pub trait DrawableSource {
    fn next_drawable(&mut self) -> Option<Drawable<'_>>;
}

/// Drawables from a configured window surface.
///
/// Transient surface errors produce no drawable; an outdated or lost surface is
/// reconfigured so the next request can succeed.
pub struct SurfaceSource<'s, 'w> {
    surface: &'s wgpu::Surface<'w>,
    device: &'s wgpu::Device,
    config: &'s wgpu::SurfaceConfiguration,
}

impl<'s, 'w> SurfaceSource<'s, 'w> {
    pub fn new(
        surface: &'s wgpu::Surface<'w>,
        device: &'s wgpu::Device,
        config: &'s wgpu::SurfaceConfiguration,
    ) -> Self {
        Self {
            surface,
            device,
            config,
        }
    }
}

impl DrawableSource for SurfaceSource<'_, '_> {
    fn next_drawable(&mut self) -> Option<Drawable<'_>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Some(Drawable::Surface(frame)),
            Err(err @ (wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost)) => {
                log::warn!("surface {err}, reconfiguring");
                self.surface.configure(self.device, self.config);
                None
            }
            Err(err) => {
                log::warn!("no drawable this frame: {err}");
                None
            }
        }
    }
}

/// An offscreen render target that can stand in for a window.
#[derive(Debug)]
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    available: bool,
}

impl OffscreenTarget {
    pub fn new(
        ctx: &GpuContext,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        check_extent(ctx, width, height)?;
        let texture = ctx.validated(|device| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some("offscreen drawable"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
        })?;
        Ok(Self {
            texture,
            available: true,
        })
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// Overwrites the target with `image`, which must have the target's size.
    pub fn write_rgba(&self, ctx: &GpuContext, image: &RgbaImage) -> Result<()> {
        let size = self.texture.size();
        if image.dimensions() != (size.width, size.height) {
            let (width, height) = image.dimensions();
            return Err(RenderError::TextureSize {
                width,
                height,
                reason: format!("the target is {}x{}", size.width, size.height),
            });
        }
        let mut pixels = image.as_raw().clone();
        if is_bgra(self.texture.format())? {
            swap_red_blue_in_place(&mut pixels);
        }
        let (width, height) = image.dimensions();
        ctx.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
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
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        Ok(())
    }

    pub fn read_rgba(&self, ctx: &GpuContext) -> Result<RgbaImage> {
        read_rgba(ctx, &self.texture)
    }
}

impl DrawableSource for OffscreenTarget {
    fn next_drawable(&mut self) -> Option<Drawable<'_>> {
        self.available.then_some(Drawable::Offscreen(&self.texture))
    }
}
