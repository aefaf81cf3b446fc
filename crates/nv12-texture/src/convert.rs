use std::ffi::c_void;

use crate::{
    ConverterConfig, ConverterStats, OutputTexture, PipelineCache,
    error::{ConvertError, scoped},
    kernel,
};

/// Inputs for one conversion. Missing handles are reported as
/// [`ConvertError::InvalidArgument`] before any GPU work is recorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertRequest<'a> {
    pub device: Option<&'a wgpu::Device>,
    pub queue: Option<&'a wgpu::Queue>,
    /// Full resolution single channel luma plane.
    pub luma: Option<&'a wgpu::Texture>,
    /// Half width, half height two channel chroma plane.
    pub chroma: Option<&'a wgpu::Texture>,
    pub width: u32,
    pub height: u32,
}

impl<'a> ConvertRequest<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        luma: &'a wgpu::Texture,
        chroma: &'a wgpu::Texture,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            device: Some(device),
            queue: Some(queue),
            luma: Some(luma),
            chroma: Some(chroma),
            width,
            height,
        }
    }

    /// Builds a request from opaque handles, treating null as missing.
    ///
    /// # Safety
    ///
    /// Each non-null pointer must point to a live `wgpu::Device`,
    /// `wgpu::Queue` or `wgpu::Texture` respectively, valid for `'a`.
    pub unsafe fn from_raw(
        device: *const c_void,
        queue: *const c_void,
        luma: *const c_void,
        chroma: *const c_void,
        width: u32,
        height: u32,
    ) -> Self {
        // SAFETY: upheld by the caller.
        unsafe {
            Self {
                device: device.cast::<wgpu::Device>().as_ref(),
                queue: queue.cast::<wgpu::Queue>().as_ref(),
                luma: luma.cast::<wgpu::Texture>().as_ref(),
                chroma: chroma.cast::<wgpu::Texture>().as_ref(),
                width,
                height,
            }
        }
    }

    fn validate(&self) -> Result<ValidRequest<'a>, ConvertError> {
        let (Some(device), Some(queue), Some(luma), Some(chroma)) =
            (self.device, self.queue, self.luma, self.chroma)
        else {
            return Err(ConvertError::InvalidArgument(format!(
                "missing handle (device: {}, queue: {}, luma: {}, chroma: {})",
                self.device.is_some(),
                self.queue.is_some(),
                self.luma.is_some(),
                self.chroma.is_some(),
            )));
        };

        if self.width == 0 || self.height == 0 {
            return Err(ConvertError::InvalidArgument(format!(
                "output size {}x{} is empty",
                self.width, self.height
            )));
        }

        check_input(luma, "luma")?;
        check_input(chroma, "chroma")?;

        if luma.width() != self.width || luma.height() != self.height {
            tracing::debug!(
                luma_width = luma.width(),
                luma_height = luma.height(),
                width = self.width,
                height = self.height,
                "Requested size differs from luma texture size"
            );
        }

        Ok(ValidRequest {
            device,
            queue,
            luma,
            chroma,
            width: self.width,
            height: self.height,
        })
    }
}

fn check_input(texture: &wgpu::Texture, plane: &'static str) -> Result<(), ConvertError> {
    if !texture.usage().contains(wgpu::TextureUsages::TEXTURE_BINDING) {
        return Err(ConvertError::InvalidArgument(format!(
            "{plane} texture is missing TEXTURE_BINDING usage"
        )));
    }

    if texture.dimension() != wgpu::TextureDimension::D2 || texture.sample_count() != 1 {
        return Err(ConvertError::InvalidArgument(format!(
            "{plane} texture must be a single-sampled 2D texture"
        )));
    }

    match texture.format().sample_type(None, None) {
        Some(wgpu::TextureSampleType::Float { .. }) => Ok(()),
        _ => Err(ConvertError::InvalidArgument(format!(
            "{plane} texture format {:?} is not float sampleable",
            texture.format()
        ))),
    }
}

struct ValidRequest<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    luma: &'a wgpu::Texture,
    chroma: &'a wgpu::Texture,
    width: u32,
    height: u32,
}

/// Converts NV12 plane textures into fresh BGRA8 textures on the GPU.
pub struct Nv12Converter {
    config: ConverterConfig,
    cache: PipelineCache,
    stats: ConverterStats,
}

impl Default for Nv12Converter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl Nv12Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            cache: PipelineCache::new(&config),
            stats: ConverterStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn stats(&self) -> &ConverterStats {
        &self.stats
    }

    pub fn pipeline_cache(&self) -> &PipelineCache {
        &self.cache
    }

    /// Converts and blocks until the GPU has finished writing the output.
    pub fn convert(&self, request: ConvertRequest<'_>) -> Result<OutputTexture, ConvertError> {
        let result = self.submit(request).and_then(PendingConversion::wait);

        match &result {
            Ok(_) => self.stats.record_conversion(),
            Err(_) => self.stats.record_failure(),
        }

        result
    }

    /// Records and submits the conversion without waiting for it.
    pub fn submit(&self, request: ConvertRequest<'_>) -> Result<PendingConversion, ConvertError> {
        let ValidRequest {
            device,
            queue,
            luma,
            chroma,
            width,
            height,
        } = request.validate()?;

        let pipeline = self.cache.get_or_create(device, &self.stats)?;

        let max_dimension = device.limits().max_texture_dimension_2d;
        if width > max_dimension || height > max_dimension {
            return Err(ConvertError::ResourceAllocationFailure(format!(
                "{width}x{height} exceeds device texture limit {max_dimension}"
            )));
        }

        let label = self.config.label;

        let output = scoped(device, ConvertError::ResourceAllocationFailure, || {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(&format!("{label} Output Texture")),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: kernel::OUTPUT_FORMAT,
                usage: wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            })
        })?;

        let bind_group = scoped(device, ConvertError::InvalidArgument, || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label} Bind Group")),
                layout: &pipeline.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: kernel::LUMA_BINDING,
                        resource: wgpu::BindingResource::TextureView(
                            &luma.create_view(&Default::default()),
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: kernel::CHROMA_BINDING,
                        resource: wgpu::BindingResource::TextureView(
                            &chroma.create_view(&Default::default()),
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: kernel::OUTPUT_BINDING,
                        resource: wgpu::BindingResource::TextureView(
                            &output.create_view(&Default::default()),
                        ),
                    },
                ],
            })
        })?;

        let commands = scoped(device, ConvertError::ResourceAllocationFailure, || {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(&format!("{label} Encoder")),
            });

            {
                let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                    label: Some(&format!("{label} Pass")),
                    ..Default::default()
                });
                compute_pass.set_pipeline(&pipeline.pipeline);
                compute_pass.set_bind_group(0, &bind_group, &[]);
                let (x, y, z) = kernel::workgroup_count(width, height);
                compute_pass.dispatch_workgroups(x, y, z);
            }

            encoder.finish()
        })?;

        let index = scoped(device, ConvertError::ResourceAllocationFailure, || {
            queue.submit(std::iter::once(commands))
        })?;
        self.stats.record_submission();

        tracing::debug!(width, height, "Submitted NV12 conversion");

        Ok(PendingConversion {
            device: device.clone(),
            output: OutputTexture::new(output),
            index,
        })
    }
}

/// Submitted work whose output must not be read until [`PendingConversion::wait`] returns.
#[must_use]
pub struct PendingConversion {
    device: wgpu::Device,
    output: OutputTexture,
    index: wgpu::SubmissionIndex,
}

impl PendingConversion {
    /// Blocks the calling thread until the submission has executed.
    pub fn wait(self) -> Result<OutputTexture, ConvertError> {
        self.device
            .poll(wgpu::PollType::WaitForSubmissionIndex(self.index))?;
        Ok(self.output)
    }
}
