use std::sync::Arc;

use kurbo::{Rect, Vec2};

use crate::{
    foundation::error::{OnairError, OnairResult},
    foundation::format::FieldMode,
    gpu::texture::Texture,
};

/// Interleaved 16-bit signed PCM samples.
pub type AudioData = Vec<i16>;

/// Per-frame render transform, used by transitions to offset, crop and fade
/// individual frames.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTransform {
    /// Position offset in normalized device units.
    pub pos: Vec2,
    /// UV rectangle; the unit rect samples the full picture.
    pub uv: Rect,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            uv: Rect::new(0.0, 0.0, 1.0, 1.0),
            alpha: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum FrameKind {
    Empty,
    Leaf(Arc<Texture>),
    Composite(Vec<Frame>),
}

/// A renderable and audible unit: one output tick's worth of picture and
/// sound.
///
/// A *leaf* frame is backed by one GPU texture plus a PCM buffer; a
/// *composite* frame aggregates child frames (arbitrarily nested) and an
/// independently mixed PCM buffer; the *empty* frame is the placeholder
/// sentinel contributed by producers with nothing to show.
///
/// Cloning a leaf shares the underlying texture; the device resource is
/// released when the last owner drops.
#[derive(Clone, Debug)]
pub struct Frame {
    pub(crate) kind: FrameKind,
    pub(crate) audio: AudioData,
    pub(crate) transform: RenderTransform,
    pub(crate) mode: FieldMode,
}

impl Frame {
    /// The empty placeholder frame.
    pub fn empty() -> Self {
        Self {
            kind: FrameKind::Empty,
            audio: AudioData::new(),
            transform: RenderTransform::default(),
            mode: FieldMode::Progressive,
        }
    }

    /// A leaf frame over one texture with its audio for this tick.
    pub fn leaf(texture: Arc<Texture>, audio: AudioData, mode: FieldMode) -> Self {
        Self {
            kind: FrameKind::Leaf(texture),
            audio,
            transform: RenderTransform::default(),
            mode,
        }
    }

    /// Whether this is the empty placeholder.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, FrameKind::Empty)
    }

    /// Audio samples for this tick.
    pub fn audio_data(&self) -> &[i16] {
        &self.audio
    }

    /// Mutable audio samples (volume scaling during transitions).
    pub fn audio_data_mut(&mut self) -> &mut AudioData {
        &mut self.audio
    }

    /// Move the audio buffer out, leaving silence.
    pub fn take_audio(&mut self) -> AudioData {
        std::mem::take(&mut self.audio)
    }

    /// Render transform for this frame.
    pub fn transform(&self) -> &RenderTransform {
        &self.transform
    }

    /// Mutable render transform.
    pub fn transform_mut(&mut self) -> &mut RenderTransform {
        &mut self.transform
    }

    /// Video-field tag.
    pub fn mode(&self) -> FieldMode {
        self.mode
    }

    /// Re-tag the field parity (see [`Frame::interlace`]).
    pub fn set_mode(&mut self, mode: FieldMode) {
        self.mode = mode;
    }

    /// Open the write phase. Composites propagate to every child in
    /// insertion order before returning.
    pub fn begin_write(&self) -> OnairResult<()> {
        match &self.kind {
            FrameKind::Empty => Ok(()),
            FrameKind::Leaf(texture) => texture.begin_write(),
            FrameKind::Composite(children) => children.iter().try_for_each(Frame::begin_write),
        }
    }

    /// Close the write phase.
    pub fn end_write(&self) -> OnairResult<()> {
        match &self.kind {
            FrameKind::Empty => Ok(()),
            FrameKind::Leaf(texture) => texture.end_write(),
            FrameKind::Composite(children) => children.iter().try_for_each(Frame::end_write),
        }
    }

    /// Open the read phase.
    pub fn begin_read(&self) -> OnairResult<()> {
        match &self.kind {
            FrameKind::Empty => Ok(()),
            FrameKind::Leaf(texture) => texture.begin_read(),
            FrameKind::Composite(children) => children.iter().try_for_each(Frame::begin_read),
        }
    }

    /// Close the read phase.
    pub fn end_read(&self) -> OnairResult<()> {
        match &self.kind {
            FrameKind::Empty => Ok(()),
            FrameKind::Leaf(texture) => texture.end_read(),
            FrameKind::Composite(children) => children.iter().try_for_each(Frame::end_read),
        }
    }

    /// Draw this frame. Children draw in insertion order, so later children
    /// paint over earlier ones; a composite translates by its own position
    /// offset before drawing children.
    pub fn draw(&self) -> OnairResult<()> {
        self.draw_with_offset(Vec2::ZERO)
    }

    fn draw_with_offset(&self, offset: Vec2) -> OnairResult<()> {
        match &self.kind {
            FrameKind::Empty => Ok(()),
            FrameKind::Leaf(texture) => {
                let effective = RenderTransform {
                    pos: self.transform.pos + offset,
                    ..self.transform.clone()
                };
                texture.draw(&effective, self.mode)
            }
            FrameKind::Composite(children) => {
                let offset = offset + self.transform.pos;
                children
                    .iter()
                    .try_for_each(|child| child.draw_with_offset(offset))
            }
        }
    }

    /// Read back raw pixel data. Only leaf frames expose pixels; composites
    /// and the empty frame fail loudly.
    pub fn pixel_data(&self) -> OnairResult<Vec<u8>> {
        match &self.kind {
            FrameKind::Leaf(texture) => texture.read_pixels(),
            FrameKind::Empty | FrameKind::Composite(_) => Err(OnairError::unsupported(
                "pixel data is only available on leaf frames",
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/core.rs"]
mod tests;
