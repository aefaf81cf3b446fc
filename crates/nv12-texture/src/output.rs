use std::ffi::c_void;

/// A converted frame owned by this side of the boundary.
///
/// Dropping it releases the texture. [`OutputTexture::into_raw`] hands the
/// reference to foreign code instead, which must give it back exactly once
/// through [`release`].
#[derive(Debug)]
pub struct OutputTexture {
    texture: wgpu::Texture,
}

impl OutputTexture {
    pub(crate) fn new(texture: wgpu::Texture) -> Self {
        Self { texture }
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    pub fn create_view(&self) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn into_texture(self) -> wgpu::Texture {
        self.texture
    }

    /// Leaks the guard into an opaque handle carrying one reference to the texture.
    pub fn into_raw(self) -> *mut c_void {
        Box::into_raw(Box::new(self.texture)).cast()
    }

    /// Takes back the reference granted by [`OutputTexture::into_raw`].
    ///
    /// # Safety
    ///
    /// `handle` must be null or a handle returned by `into_raw` that has not
    /// already been passed to `from_raw` or [`release`].
    pub unsafe fn from_raw(handle: *mut c_void) -> Option<Self> {
        if handle.is_null() {
            return None;
        }

        // SAFETY: the caller guarantees `handle` came from `into_raw` and is unreleased.
        let texture = unsafe { Box::from_raw(handle.cast::<wgpu::Texture>()) };
        Some(Self { texture: *texture })
    }
}

/// Drops the reference carried by `handle`. Null is a no-op.
///
/// # Safety
///
/// Same contract as [`OutputTexture::from_raw`]: each handle is released once
/// and never used afterwards.
pub unsafe fn release(handle: *mut c_void) {
    // SAFETY: forwarded from the caller.
    drop(unsafe { OutputTexture::from_raw(handle) });
}
