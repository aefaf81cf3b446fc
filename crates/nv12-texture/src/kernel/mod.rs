//! The NV12 to BGRA compute kernel and the constants the dispatcher binds it with.

pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

pub const ENTRY_POINT: &str = "main";

/// Threads per workgroup along x and y. Must match `@workgroup_size` in the shader.
pub const WORKGROUP_SIZE: u32 = 16;

pub const LUMA_BINDING: u32 = 0;
pub const CHROMA_BINDING: u32 = 1;
pub const OUTPUT_BINDING: u32 = 2;

pub const OUTPUT_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

// BT.709
pub const KR_V: f32 = 1.5748;
pub const KG_U: f32 = 0.1873;
pub const KG_V: f32 = 0.4681;
pub const KB_U: f32 = 1.8556;

/// Workgroups needed to cover a `width` x `height` output. Threads past the
/// edge are discarded by the kernel's bounds check.
pub fn workgroup_count(width: u32, height: u32) -> (u32, u32, u32) {
    (
        width.div_ceil(WORKGROUP_SIZE),
        height.div_ceil(WORKGROUP_SIZE),
        1,
    )
}

pub(crate) fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: LUMA_BINDING,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: CHROMA_BINDING,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: false },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: OUTPUT_BINDING,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format: OUTPUT_FORMAT,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
            count: None,
        },
    ]
}
