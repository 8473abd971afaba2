use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    foundation::error::{OnairError, OnairResult},
    foundation::format::FieldMode,
    frame::core::RenderTransform,
};

/// Identifier for a device-owned texture allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Static description of a texture allocation.
///
/// Every texture is 8-bit-per-channel RGBA, sampled with linear filtering and
/// edge clamping. Video content must never show seam artifacts at picture
/// edges and must filter smoothly under arbitrary scale transforms, so the
/// sampler configuration is part of the contract rather than a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl TextureDesc {
    /// Byte length of one full RGBA8 picture for this description.
    pub fn byte_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Device seam for GPU-resident frame resources.
///
/// The draw/shader pipeline itself is an external collaborator; this trait
/// covers only the texture resource contract: allocation, pixel transfer,
/// read/write phase fences, and quad emission. `draw` renders a unit quad
/// with standard 0..1 UV mapping unless the transform overrides it.
pub trait GpuDevice: Send + Sync {
    /// Allocate one RGBA8 texture. Allocation failure is fatal for the frame
    /// being constructed and is surfaced as [`OnairError::Resource`].
    fn create_texture(&self, desc: &TextureDesc) -> OnairResult<TextureId>;

    /// Release a texture unconditionally. Safe to call during unwinding.
    fn release_texture(&self, id: TextureId);

    /// Upload a full picture of `desc.byte_len()` RGBA bytes.
    fn upload(&self, id: TextureId, rgba: &[u8]) -> OnairResult<()>;

    /// Read back the full picture.
    fn read_pixels(&self, id: TextureId) -> OnairResult<Vec<u8>>;

    /// Open the write phase for one render cycle.
    fn begin_write(&self, id: TextureId) -> OnairResult<()>;

    /// Close the write phase, making the texture readable.
    fn end_write(&self, id: TextureId) -> OnairResult<()>;

    /// Open the read phase. The write phase must have completed first.
    fn begin_read(&self, id: TextureId) -> OnairResult<()>;

    /// Close the read phase.
    fn end_read(&self, id: TextureId) -> OnairResult<()>;

    /// Emit one textured quad. Only legal inside a read phase.
    fn draw(&self, id: TextureId, transform: &RenderTransform, mode: FieldMode) -> OnairResult<()>;
}

/// One quad emission recorded by [`SoftwareDevice`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    /// Texture that was drawn.
    pub texture: TextureId,
    /// Effective transform at emission time (parent offsets folded in).
    pub transform: RenderTransform,
    /// Field tag the quad was drawn with.
    pub mode: FieldMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Writing,
    Ready,
    Reading,
}

struct TextureSlot {
    desc: TextureDesc,
    pixels: Vec<u8>,
    phase: Phase,
}

struct DeviceState {
    next_id: u64,
    textures: HashMap<TextureId, TextureSlot>,
    draw_log: Vec<DrawCall>,
}

/// CPU reference implementation of [`GpuDevice`].
///
/// Textures live in host memory; phase fences are tracked and violations are
/// rejected, and every `draw` is recorded in order, so layering and lifecycle
/// invariants can be asserted without a GPU.
pub struct SoftwareDevice {
    state: Mutex<DeviceState>,
    capacity: Option<usize>,
}

impl SoftwareDevice {
    /// Device without an allocation limit.
    pub fn new() -> Self {
        Self::with_capacity(None)
    }

    /// Device that fails allocation once `capacity` textures are alive.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            state: Mutex::new(DeviceState {
                next_id: 1,
                textures: HashMap::new(),
                draw_log: Vec::new(),
            }),
            capacity,
        }
    }

    /// Number of currently allocated textures.
    pub fn alive_textures(&self) -> usize {
        match self.state.lock() {
            Ok(state) => state.textures.len(),
            Err(_) => 0,
        }
    }

    /// Drain and return the recorded draw calls, in emission order.
    pub fn take_draw_log(&self) -> Vec<DrawCall> {
        match self.state.lock() {
            Ok(mut state) => std::mem::take(&mut state.draw_log),
            Err(_) => Vec::new(),
        }
    }

    fn locked(&self) -> OnairResult<std::sync::MutexGuard<'_, DeviceState>> {
        self.state
            .lock()
            .map_err(|_| OnairError::resource("software device state poisoned"))
    }
}

impl Default for SoftwareDevice {
    fn default() -> Self {
        Self::new()
    }
}

fn slot_mut<'a>(
    state: &'a mut DeviceState,
    id: TextureId,
) -> OnairResult<&'a mut TextureSlot> {
    state
        .textures
        .get_mut(&id)
        .ok_or_else(|| OnairError::resource(format!("unknown texture id {}", id.0)))
}

impl GpuDevice for SoftwareDevice {
    fn create_texture(&self, desc: &TextureDesc) -> OnairResult<TextureId> {
        if desc.width == 0 || desc.height == 0 {
            return Err(OnairError::resource("texture dimensions must be non-zero"));
        }
        let mut state = self.locked()?;
        if let Some(cap) = self.capacity
            && state.textures.len() >= cap
        {
            return Err(OnairError::resource(format!(
                "texture allocation failed: device capacity of {cap} reached"
            )));
        }
        let id = TextureId(state.next_id);
        state.next_id += 1;
        let pixels = vec![0u8; desc.byte_len()];
        state.textures.insert(
            id,
            TextureSlot {
                desc: *desc,
                pixels,
                phase: Phase::Idle,
            },
        );
        Ok(id)
    }

    fn release_texture(&self, id: TextureId) {
        if let Ok(mut state) = self.state.lock() {
            state.textures.remove(&id);
        }
    }

    fn upload(&self, id: TextureId, rgba: &[u8]) -> OnairResult<()> {
        let mut state = self.locked()?;
        let slot = slot_mut(&mut state, id)?;
        if slot.phase == Phase::Reading {
            return Err(OnairError::resource("upload during read phase"));
        }
        if rgba.len() != slot.desc.byte_len() {
            return Err(OnairError::resource(format!(
                "upload size mismatch: got {} bytes, texture needs {}",
                rgba.len(),
                slot.desc.byte_len()
            )));
        }
        slot.pixels.copy_from_slice(rgba);
        Ok(())
    }

    fn read_pixels(&self, id: TextureId) -> OnairResult<Vec<u8>> {
        let mut state = self.locked()?;
        let slot = slot_mut(&mut state, id)?;
        if slot.phase == Phase::Writing {
            return Err(OnairError::resource("read back during write phase"));
        }
        Ok(slot.pixels.clone())
    }

    fn begin_write(&self, id: TextureId) -> OnairResult<()> {
        let mut state = self.locked()?;
        let slot = slot_mut(&mut state, id)?;
        match slot.phase {
            Phase::Idle | Phase::Ready => {
                slot.phase = Phase::Writing;
                Ok(())
            }
            Phase::Writing | Phase::Reading => Err(OnairError::resource(
                "begin_write while another phase is open",
            )),
        }
    }

    fn end_write(&self, id: TextureId) -> OnairResult<()> {
        let mut state = self.locked()?;
        let slot = slot_mut(&mut state, id)?;
        if slot.phase != Phase::Writing {
            return Err(OnairError::resource("end_write without begin_write"));
        }
        slot.phase = Phase::Ready;
        Ok(())
    }

    fn begin_read(&self, id: TextureId) -> OnairResult<()> {
        let mut state = self.locked()?;
        let slot = slot_mut(&mut state, id)?;
        if slot.phase != Phase::Ready {
            return Err(OnairError::resource(
                "begin_read requires a completed write phase",
            ));
        }
        slot.phase = Phase::Reading;
        Ok(())
    }

    fn end_read(&self, id: TextureId) -> OnairResult<()> {
        let mut state = self.locked()?;
        let slot = slot_mut(&mut state, id)?;
        if slot.phase != Phase::Reading {
            return Err(OnairError::resource("end_read without begin_read"));
        }
        slot.phase = Phase::Ready;
        Ok(())
    }

    fn draw(&self, id: TextureId, transform: &RenderTransform, mode: FieldMode) -> OnairResult<()> {
        let mut state = self.locked()?;
        let slot = slot_mut(&mut state, id)?;
        if slot.phase != Phase::Reading {
            return Err(OnairError::resource("draw outside read phase"));
        }
        state.draw_log.push(DrawCall {
            texture: id,
            transform: transform.clone(),
            mode,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/device.rs"]
mod tests;
