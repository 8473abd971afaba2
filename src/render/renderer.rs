use crate::{
    foundation::error::OnairResult,
    foundation::format::VideoFormatDesc,
    frame::core::Frame,
    producer::core::{BoxedProducer, render_with_handoff},
};

/// Pull-based driver of a producer chain at the output frame rate.
///
/// One `render_tick` call pulls the frame for this tick (two frames merged
/// into one interlaced picture when the format is interlaced), runs the
/// write/read phase discipline and the draw, and returns the frame.
/// `Ok(None)` means the chain is exhausted and the caller should hold or
/// skip this tick.
pub struct FrameRenderer {
    chain: Option<BoxedProducer>,
    format: VideoFormatDesc,
}

impl FrameRenderer {
    /// Initialize `producer` with `format` and take it as the chain head.
    pub fn new(format: VideoFormatDesc, mut producer: BoxedProducer) -> OnairResult<Self> {
        producer.initialize(&format)?;
        Ok(Self {
            chain: Some(producer),
            format,
        })
    }

    /// Whether the producer chain has nothing further to play.
    pub fn is_exhausted(&self) -> bool {
        self.chain.is_none()
    }

    fn pull(&mut self) -> Option<Frame> {
        render_with_handoff(&mut self.chain, Some(&self.format))
    }

    /// Produce, phase-cycle and draw the frame for one output tick.
    pub fn render_tick(&mut self) -> OnairResult<Option<Frame>> {
        let frame = if self.format.is_interlaced() {
            let first = self.pull();
            let second = self.pull();
            if first.is_none() && second.is_none() {
                None
            } else {
                Some(Frame::interlace(
                    first.unwrap_or_else(Frame::empty),
                    second.unwrap_or_else(Frame::empty),
                    self.format.field_mode,
                )?)
            }
        } else {
            self.pull()
        };

        let Some(frame) = frame else {
            return Ok(None);
        };

        frame.begin_write()?;
        frame.end_write()?;
        frame.begin_read()?;
        frame.draw()?;
        frame.end_read()?;
        Ok(Some(frame))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
