/// Clip-space corners of the full-screen quad, in triangle-strip order.
pub const QUAD_POSITIONS: [Position4; 4] = [
    Position4([-1.0, -1.0, 0.0, 1.0]),
    Position4([1.0, -1.0, 0.0, 1.0]),
    Position4([-1.0, 1.0, 0.0, 1.0]),
    Position4([1.0, 1.0, 0.0, 1.0]),
];

/// Texture coordinates matching [`QUAD_POSITIONS`]; v grows downwards.
pub const QUAD_TEX_COORDS: [TexCoord; 4] = [
    TexCoord([0.0, 1.0]),
    TexCoord([1.0, 1.0]),
    TexCoord([0.0, 0.0]),
    TexCoord([1.0, 0.0]),
];

pub const QUAD_VERTEX_COUNT: u32 = QUAD_POSITIONS.len() as u32;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct Position4(pub [f32; 4]);

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct TexCoord(pub [f32; 2]);

impl Position4 {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x4];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Position4>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

impl TexCoord {
    const ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<TexCoord>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &Self::ATTRIBUTES,
    };
}

// 16 bytes, uniform size must be a multiple of 16
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, Default, PartialEq)]
pub struct FrameConstants {
    pub time: f32,
    pub _padding: [f32; 3],
}

impl FrameConstants {
    pub fn new(time: f32) -> Self {
        Self {
            time,
            _padding: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl From<winit::dpi::PhysicalSize<u32>> for Size {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Size {
            width: size.width as f32,
            height: size.height as f32,
        }
    }
}

/// Region copied by the blit path: the overlap of both textures anchored at the origin.
pub fn copy_extent(source: wgpu::Extent3d, destination: wgpu::Extent3d) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: source.width.min(destination.width),
        height: source.height.min(destination.height),
        depth_or_array_layers: 1,
    }
}

pub fn clip_bounds(positions: &[Position4]) -> ([f32; 2], [f32; 2]) {
    positions.iter().fold(
        ([f32::INFINITY; 2], [f32::NEG_INFINITY; 2]),
        |(min, max), Position4([x, y, _, _])| {
            (
                [min[0].min(*x), min[1].min(*y)],
                [max[0].max(*x), max[1].max(*y)],
            )
        },
    )
}

/// Two formats can be blitted into each other when they only differ in sRGB-ness.
pub fn copy_compatible(a: wgpu::TextureFormat, b: wgpu::TextureFormat) -> bool {
    a.remove_srgb_suffix() == b.remove_srgb_suffix()
}
