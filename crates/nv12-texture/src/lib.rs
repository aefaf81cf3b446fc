//! GPU conversion of hardware-decoded NV12 frames into BGRA8 textures.
//!
//! [`Nv12Converter`] takes the luma and chroma planes as wgpu textures, runs
//! the BT.709 compute kernel on the caller's device and hands back a freshly
//! allocated [`OutputTexture`] that can be sampled or rendered into directly.
//! The [`ffi`] module exposes the same operation to hosts that only hold
//! opaque pointers.

mod cache;
mod config;
mod convert;
pub mod cpu;
mod error;
pub mod ffi;
pub mod kernel;
mod output;
mod stats;

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_gpu;

pub use cache::{ConversionPipeline, PipelineCache};
pub use config::ConverterConfig;
pub use convert::{ConvertRequest, Nv12Converter, PendingConversion};
pub use error::ConvertError;
pub use output::{OutputTexture, release};
pub use stats::{ConverterStats, StatsSnapshot};
