use thiserror::Error;

/// A missing drawable is not an error; see [`crate::renderer::FrameOutcome::Skipped`].
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no suitable GPU adapter was found")]
    NoAdapter,

    #[error("failed to create the logical device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("GPU validation failed: {0}")]
    Validation(String),

    #[error("shader failed to parse:\n{0}")]
    ShaderParse(String),

    #[error("binding layout `{layout}` does not match the shader: {detail}")]
    BindingMismatch { layout: &'static str, detail: String },

    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid renderer configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("texture format {0:?} is not supported for source textures")]
    UnsupportedFormat(wgpu::TextureFormat),

    #[error("cannot copy {from:?} into {to:?}")]
    IncompatibleFormats {
        from: wgpu::TextureFormat,
        to: wgpu::TextureFormat,
    },

    #[error("pipeline targets {pipeline:?} but the drawable is {drawable:?}")]
    FormatMismatch {
        pipeline: wgpu::TextureFormat,
        drawable: wgpu::TextureFormat,
    },

    #[error("`{operation}` is not available on the {path} path")]
    WrongPath {
        operation: &'static str,
        path: &'static str,
    },

    #[error("texture size {width}x{height} is not usable: {reason}")]
    TextureSize {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("texture readback failed: {0}")]
    Readback(String),

    #[error("window setup failed: {0}")]
    Window(String),

    #[error("surface does not support {0:?} usage")]
    SurfaceUsage(wgpu::TextureUsages),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;
