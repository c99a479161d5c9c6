//! Single-frame GPU samples on top of wgpu.
//!
//! A [`FrameRenderer`] produces one frame per call: it either blits a source texture into
//! the drawable, or shades a full-screen triangle-strip quad (constant color, one sampled
//! texture, or an argument record holding two textures, a sampler and a time constant).
//! The [`plane`] module keeps plane visualizations in sync with detected anchors.

pub mod app;
pub mod binding;
pub mod config;
pub mod drawable;
pub mod error;
pub mod gpu;
pub mod pacing;
pub mod pipeline;
pub mod plane;
pub mod renderer;
pub mod texture;
pub mod utils;

pub use config::RendererConfig;
pub use drawable::{Drawable, DrawableSource, OffscreenTarget, SurfaceSource};
pub use error::{RenderError, Result};
pub use gpu::GpuContext;
pub use renderer::{FrameOutcome, FrameRenderer, RegisterOutcome};
pub use texture::SourceTexture;
