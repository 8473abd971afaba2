use crate::{
    audio::mix,
    foundation::error::{OnairError, OnairResult},
    foundation::format::FieldMode,
    frame::core::{Frame, FrameKind},
};

impl Frame {
    /// An empty composite frame ready for [`Frame::add`].
    pub fn composite() -> Self {
        Self {
            kind: FrameKind::Composite(Vec::new()),
            ..Self::empty()
        }
    }

    /// Build a composite over `children`, in draw order.
    pub fn composite_of(children: impl IntoIterator<Item = Frame>) -> OnairResult<Self> {
        let mut out = Self::composite();
        for child in children {
            out.add(child)?;
        }
        Ok(out)
    }

    /// Append a child frame. Empty placeholder children are ignored.
    ///
    /// The first non-empty child's audio is adopted wholesale; every later
    /// child is mixed in sample-by-sample with saturating 16-bit addition,
    /// so the composite's buffer length is the longest contributor's and
    /// absent samples count as silence.
    pub fn add(&mut self, mut frame: Frame) -> OnairResult<()> {
        let FrameKind::Composite(children) = &mut self.kind else {
            return Err(OnairError::unsupported(
                "add is only available on composite frames",
            ));
        };
        if frame.is_empty() {
            return Ok(());
        }

        if self.audio.is_empty() {
            self.audio = frame.take_audio();
        } else {
            mix::mix_saturating_into(&mut self.audio, frame.audio_data());
            frame.take_audio();
        }
        children.push(frame);
        Ok(())
    }

    /// Child frames in insertion order. Empty for non-composites.
    pub fn children(&self) -> &[Frame] {
        match &self.kind {
            FrameKind::Composite(children) => children,
            FrameKind::Empty | FrameKind::Leaf(_) => &[],
        }
    }

    /// Merge two progressive/field sources into one interlaced output frame.
    ///
    /// The children are tagged with opposite field parity according to the
    /// dominant `mode`: upper dominance tags `a` upper and `b` lower, lower
    /// dominance swaps the tags.
    pub fn interlace(mut a: Frame, mut b: Frame, mode: FieldMode) -> OnairResult<Frame> {
        if mode == FieldMode::Upper {
            a.set_mode(FieldMode::Upper);
            b.set_mode(FieldMode::Lower);
        } else {
            a.set_mode(FieldMode::Lower);
            b.set_mode(FieldMode::Upper);
        }
        Self::composite_of([a, b])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frame/composite.rs"]
mod tests;
