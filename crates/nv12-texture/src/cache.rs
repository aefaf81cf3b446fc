use std::borrow::Cow;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::{ConverterConfig, ConverterStats, error::ConvertError, error::scoped, kernel};

/// The kernel compiled for one device, ready to be bound in a compute pass.
#[derive(Debug)]
pub struct ConversionPipeline {
    pub(crate) pipeline: wgpu::ComputePipeline,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
}

/// Compiled pipelines keyed by device identity.
///
/// Lookups and compiles happen under one lock, so concurrent first use of a
/// device compiles once. When full, the least recently used device is evicted.
pub struct PipelineCache {
    slots: Mutex<Slots<wgpu::Device, Arc<ConversionPipeline>>>,
    source: Cow<'static, str>,
    label: &'static str,
}

impl PipelineCache {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            slots: Mutex::new(Slots::new(config.pipeline_cache_capacity)),
            source: Cow::Borrowed(kernel::SHADER_SOURCE),
            label: config.label,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_source(config: &ConverterConfig, source: &'static str) -> Self {
        Self {
            source: Cow::Borrowed(source),
            ..Self::new(config)
        }
    }

    pub fn get_or_create(
        &self,
        device: &wgpu::Device,
        stats: &ConverterStats,
    ) -> Result<Arc<ConversionPipeline>, ConvertError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(pipeline) = slots.get(device) {
            stats.record_cache_hit();
            return Ok(pipeline.clone());
        }

        let pipeline = Arc::new(self.compile(device)?);
        stats.record_compilation();

        if slots.insert(device.clone(), pipeline.clone()).is_some() {
            debug!("Evicted least recently used pipeline");
        }

        Ok(pipeline)
    }

    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clear();
    }

    fn compile(&self, device: &wgpu::Device) -> Result<ConversionPipeline, ConvertError> {
        if !device.features().contains(wgpu::Features::BGRA8UNORM_STORAGE) {
            return Err(ConvertError::PipelineCreationFailure(
                "device does not support BGRA8UNORM_STORAGE".to_string(),
            ));
        }

        debug!(label = self.label, "Compiling conversion kernel");

        let shader = scoped(device, ConvertError::CompileFailure, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{} Shader", self.label)),
                source: wgpu::ShaderSource::Wgsl(self.source.clone()),
            })
        })?;

        scoped(device, ConvertError::PipelineCreationFailure, || {
            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} Bind Group Layout", self.label)),
                    entries: &kernel::bind_group_layout_entries(),
                });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{} Pipeline Layout", self.label)),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

            let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(&format!("{} Pipeline", self.label)),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some(kernel::ENTRY_POINT),
                compilation_options: Default::default(),
                cache: None,
            });

            ConversionPipeline {
                pipeline,
                bind_group_layout,
            }
        })
    }
}

/// Bounded entries ordered from least to most recently used.
struct Slots<K, V> {
    capacity: usize,
    entries: Vec<(K, V)>,
}

impl<K: PartialEq, V> Slots<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        let entry = self.entries.remove(index);
        self.entries.push(entry);
        self.entries.last().map(|(_, v)| v)
    }

    /// Inserts or replaces `key`, returning the entry evicted to make room.
    fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(index) = self.entries.iter().position(|(k, _)| k == &key) {
            self.entries.remove(index);
        }

        let evicted = if self.entries.len() >= self.capacity {
            Some(self.entries.remove(0))
        } else {
            None
        };

        self.entries.push((key, value));
        evicted
    }
}
