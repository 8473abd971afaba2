use std::sync::Arc;

use crate::{
    foundation::error::OnairResult,
    foundation::format::FieldMode,
    frame::core::RenderTransform,
    gpu::device::{GpuDevice, TextureDesc, TextureId},
};

/// An owned GPU-resident picture.
///
/// Width and height are fixed at construction; the device handle is valid
/// from construction until drop, and drop releases the device resource
/// unconditionally. Draw calls cannot outlive the resource because they go
/// through this owner.
pub struct Texture {
    id: TextureId,
    desc: TextureDesc,
    device: Arc<dyn GpuDevice>,
}

impl Texture {
    /// Allocate a `width` x `height` RGBA8 texture on `device`.
    pub fn new(device: Arc<dyn GpuDevice>, width: u32, height: u32) -> OnairResult<Self> {
        let desc = TextureDesc { width, height };
        let id = device.create_texture(&desc)?;
        Ok(Self { id, desc, device })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Device handle for this allocation.
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Upload a full picture of RGBA bytes.
    pub fn upload(&self, rgba: &[u8]) -> OnairResult<()> {
        self.device.upload(self.id, rgba)
    }

    /// Read back the full picture.
    pub fn read_pixels(&self) -> OnairResult<Vec<u8>> {
        self.device.read_pixels(self.id)
    }

    /// Open the write phase for one render cycle.
    pub fn begin_write(&self) -> OnairResult<()> {
        self.device.begin_write(self.id)
    }

    /// Close the write phase.
    pub fn end_write(&self) -> OnairResult<()> {
        self.device.end_write(self.id)
    }

    /// Open the read phase.
    pub fn begin_read(&self) -> OnairResult<()> {
        self.device.begin_read(self.id)
    }

    /// Close the read phase.
    pub fn end_read(&self) -> OnairResult<()> {
        self.device.end_read(self.id)
    }

    /// Emit one quad for this texture.
    pub fn draw(&self, transform: &RenderTransform, mode: FieldMode) -> OnairResult<()> {
        self.device.draw(self.id, transform, mode)
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.device.release_texture(self.id);
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("width", &self.desc.width)
            .field("height", &self.desc.height)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/texture.rs"]
mod tests;
