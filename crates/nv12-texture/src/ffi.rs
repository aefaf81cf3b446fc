//! C ABI entry points for hosts that hold wgpu objects behind opaque pointers.
//!
//! Failures never cross the boundary as values: conversion returns null and
//! logs the reason. Panics raised inside wgpu are caught here as well.

use std::ffi::c_void;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::LazyLock;

use crate::{ConvertError, ConvertRequest, ConverterConfig, Nv12Converter, OutputTexture, output};

static CONVERTER: LazyLock<Nv12Converter> =
    LazyLock::new(|| Nv12Converter::new(ConverterConfig::default()));

/// The converter backing the C entry points.
///
/// Its pipeline cache holds a clone of every device it has compiled for, which
/// keeps that device alive until it is evicted. Hosts that drop or lose a
/// device should call [`cap_nv12_clear_cache`].
pub fn shared_converter() -> &'static Nv12Converter {
    &CONVERTER
}

/// Converts the NV12 planes into a new BGRA8 texture and returns an owned
/// handle to it, or null on failure. Blocks until the GPU work completes.
///
/// # Safety
///
/// `device`, `queue`, `luma` and `chroma` must each be null or point to a live
/// `wgpu::Device`, `wgpu::Queue`, `wgpu::Texture` and `wgpu::Texture` for the
/// duration of the call. A non-null result must be passed to
/// [`cap_nv12_release`] exactly once.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cap_nv12_convert(
    device: *const c_void,
    queue: *const c_void,
    luma: *const c_void,
    chroma: *const c_void,
    width: u32,
    height: u32,
) -> *mut c_void {
    into_handle(width, height, || {
        // SAFETY: pointer validity is forwarded from the caller.
        let request =
            unsafe { ConvertRequest::from_raw(device, queue, luma, chroma, width, height) };
        CONVERTER.convert(request)
    })
}

/// Releases a texture returned by [`cap_nv12_convert`]. Null is a no-op.
///
/// # Safety
///
/// `handle` must be null or a result of `cap_nv12_convert` that has not been
/// released yet. It must not be used afterwards.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cap_nv12_release(handle: *mut c_void) {
    // SAFETY: forwarded from the caller.
    unsafe { output::release(handle) }
}

/// Drops every compiled pipeline, and with it the devices they were built for.
#[unsafe(no_mangle)]
pub extern "C" fn cap_nv12_clear_cache() {
    CONVERTER.pipeline_cache().clear();
}

/// Runs a conversion and flattens its outcome into a handle, null on error or panic.
fn into_handle(
    width: u32,
    height: u32,
    convert: impl FnOnce() -> Result<OutputTexture, ConvertError>,
) -> *mut c_void {
    match catch_unwind(AssertUnwindSafe(convert)) {
        Ok(Ok(output)) => output.into_raw(),
        Ok(Err(e)) => {
            tracing::warn!(width, height, error = %e, "NV12 conversion failed");
            std::ptr::null_mut()
        }
        Err(_) => {
            tracing::warn!(width, height, "NV12 conversion panicked");
            std::ptr::null_mut()
        }
    }
}
