//! Host-side NV12 to BGRA conversion using the same math as the compute kernel.
//!
//! Useful as a fallback when the GPU path reports failure, and as the
//! reference the GPU output is checked against.

use crate::kernel::{KB_U, KG_U, KG_V, KR_V};

/// Converts one pixel from 8-bit luma and chroma samples to BGRA.
pub fn convert_pixel(y: u8, u: u8, v: u8) -> [u8; 4] {
    let luma = unorm(y);
    let u = unorm(u) - 0.5;
    let v = unorm(v) - 0.5;

    let r = luma + KR_V * v;
    let g = luma - KG_U * u - KG_V * v;
    let b = luma + KB_U * u;

    [to_unorm8(b), to_unorm8(g), to_unorm8(r), 255]
}

/// Writes `width * height * 4` BGRA bytes to `output`.
///
/// Samples past the end of a plane read as black luma or neutral chroma.
pub fn nv12_to_bgra(
    y_data: &[u8],
    uv_data: &[u8],
    width: u32,
    height: u32,
    y_stride: u32,
    uv_stride: u32,
    output: &mut [u8],
) {
    let width = width as usize;
    let height = height as usize;
    let y_stride = y_stride as usize;
    let uv_stride = uv_stride as usize;

    for row in 0..height {
        let y_row_start = row * y_stride;
        let uv_row_start = (row / 2) * uv_stride;
        let out_row_start = row * width * 4;

        for col in 0..width {
            let y_idx = y_row_start + col;
            let uv_idx = uv_row_start + (col / 2) * 2;

            let y = y_data.get(y_idx).copied().unwrap_or(0);
            let u = uv_data.get(uv_idx).copied().unwrap_or(128);
            let v = uv_data.get(uv_idx + 1).copied().unwrap_or(128);

            let out_idx = out_row_start + col * 4;
            if let Some(pixel) = output.get_mut(out_idx..out_idx + 4) {
                pixel.copy_from_slice(&convert_pixel(y, u, v));
            }
        }
    }
}

fn unorm(value: u8) -> f32 {
    value as f32 / 255.0
}

fn to_unorm8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
