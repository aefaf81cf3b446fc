use std::sync::{Mutex, PoisonError};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Kernel compilation failed: {0}")]
    CompileFailure(String),
    #[error("Pipeline creation failed: {0}")]
    PipelineCreationFailure(String),
    #[error("Resource allocation failed: {0}")]
    ResourceAllocationFailure(String),
    #[error("Waiting for submitted work failed: {0}")]
    SubmissionFailure(#[from] wgpu::PollError),
}

// wgpu keeps one error scope stack per device, shared by every thread. Holding
// this from push to pop keeps another thread's errors out of our scopes.
static SCOPE_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` inside a validation and out-of-memory error scope on `device` and
/// maps whatever wgpu captured into `map_err`.
pub(crate) fn scoped<T>(
    device: &wgpu::Device,
    map_err: impl FnOnce(String) -> ConvertError,
    f: impl FnOnce() -> T,
) -> Result<T, ConvertError> {
    let _guard = SCOPE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());

    match validation.or(out_of_memory) {
        Some(e) => Err(map_err(e.to_string())),
        None => Ok(value),
    }
}
