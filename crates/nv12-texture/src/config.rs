#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Number of devices whose compiled pipeline is kept. `1` gives single-slot
    /// behaviour where every device switch recompiles.
    pub pipeline_cache_capacity: usize,
    /// Prefix for the debug labels of every GPU object this converter creates.
    pub label: &'static str,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            pipeline_cache_capacity: 4,
            label: "NV12 Converter",
        }
    }
}

impl ConverterConfig {
    pub fn with_pipeline_cache_capacity(mut self, capacity: usize) -> Self {
        self.pipeline_cache_capacity = capacity.max(1);
        self
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}
