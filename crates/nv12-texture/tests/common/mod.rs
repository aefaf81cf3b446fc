#![allow(dead_code)]

use wgpu::util::DeviceExt;

pub struct Gpu {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

pub fn gpu() -> Option<Gpu> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        force_fallback_adapter: false,
        compatible_surface: None,
    }))
    .inspect_err(|e| eprintln!("Skipping GPU test: no adapter ({e})"))
    .ok()?;

    if !adapter
        .features()
        .contains(wgpu::Features::BGRA8UNORM_STORAGE)
    {
        eprintln!("Skipping GPU test: adapter lacks BGRA8UNORM_STORAGE");
        return None;
    }

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("NV12 Integration Device"),
        required_features: wgpu::Features::BGRA8UNORM_STORAGE,
        ..Default::default()
    }))
    .inspect_err(|e| eprintln!("Skipping GPU test: device request failed ({e})"))
    .ok()?;

    Some(Gpu { device, queue })
}

impl Gpu {
    /// Mid-gray luma and neutral chroma planes for a `width` x `height` frame.
    pub fn planes(&self, width: u32, height: u32) -> (wgpu::Texture, wgpu::Texture) {
        let chroma_width = width.div_ceil(2);
        let chroma_height = height.div_ceil(2);

        let luma = self.luma(width, height, &vec![128; (width * height) as usize]);
        let chroma = self.chroma(
            chroma_width,
            chroma_height,
            &vec![128; (chroma_width * chroma_height * 2) as usize],
        );

        (luma, chroma)
    }

    pub fn luma(&self, width: u32, height: u32, data: &[u8]) -> wgpu::Texture {
        self.plane(width, height, wgpu::TextureFormat::R8Unorm, data)
    }

    pub fn chroma(&self, width: u32, height: u32, data: &[u8]) -> wgpu::Texture {
        self.plane(width, height, wgpu::TextureFormat::Rg8Unorm, data)
    }

    fn plane(
        &self,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        data: &[u8],
    ) -> wgpu::Texture {
        self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some("Input Plane"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::MipMajor,
            data,
        )
    }

    /// Reads a BGRA8 texture back as tightly packed rows.
    pub fn read_bgra(&self, texture: &wgpu::Texture) -> Vec<u8> {
        let width = texture.width();
        let height = texture.height();
        let unpadded_bytes_per_row = width * 4;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        self.device.poll(wgpu::PollType::Wait).unwrap();
        rx.recv().unwrap().unwrap();

        let data = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
        for row in data.chunks_exact(padded_bytes_per_row as usize) {
            pixels.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
        }
        pixels
    }
}

pub fn unorm(value: u8) -> f32 {
    value as f32 / 255.0
}

/// Asserts two 8-bit channels differ by at most one step.
pub fn assert_close(actual: u8, expected: u8, what: &str) {
    assert!(
        actual.abs_diff(expected) <= 1,
        "{what}: expected {expected}, got {actual}"
    );
}
