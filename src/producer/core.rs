use crate::{
    foundation::error::OnairResult, foundation::format::VideoFormatDesc, frame::core::Frame,
};

/// Owned producer handle. A producer is driven by exactly one parent, so
/// hand-off moves the box rather than sharing it.
pub type BoxedProducer = Box<dyn FrameProducer>;

/// A pull-based source of frames, one per output tick.
///
/// Producers are `initialize`d once with the active video format, then
/// `render_frame`-pulled until they return `Ok(None)` (end-of-stream), at
/// which point the caller may replace them with their following producer.
pub trait FrameProducer: Send {
    /// Bind the producer to the active output format. Called once before the
    /// first `render_frame`.
    fn initialize(&mut self, format: &VideoFormatDesc) -> OnairResult<()>;

    /// Produce the frame for this output tick, or `Ok(None)` at end of
    /// stream. May block for the duration of one decode or mix unit of work
    /// but never waits on another output tick.
    fn render_frame(&mut self) -> OnairResult<Option<Frame>>;

    /// Hand over the producer that plays after this one ends, if any.
    fn take_following_producer(&mut self) -> Option<BoxedProducer> {
        None
    }

    /// Install the producer that played before this one. Transitions use this
    /// to receive their outgoing (source) side.
    fn set_leading_producer(&mut self, _leading: BoxedProducer) {}

    /// Identity label for log lines.
    fn name(&self) -> String;
}

/// Pull one frame from `slot`, performing producer hand-off.
///
/// If the producer reports end-of-stream and declares a following producer,
/// the follower is initialized with the active format, receives the exhausted
/// producer as its leading side, replaces it in `slot`, and the render is
/// retried, so the caller observes no gap and no duplicate frame at the
/// boundary. A producer that fails to render (or a follower that fails to
/// initialize) is logged and removed; an empty slot contributes nothing.
pub fn render_with_handoff(
    slot: &mut Option<BoxedProducer>,
    format: Option<&VideoFormatDesc>,
) -> Option<Frame> {
    loop {
        let rendered = slot.as_mut()?.render_frame();
        match rendered {
            Ok(Some(frame)) => return Some(frame),
            Ok(None) => {
                let mut ended = slot.take()?;
                let Some(mut following) = ended.take_following_producer() else {
                    return None;
                };
                if let Some(format) = format
                    && let Err(err) = following.initialize(format)
                {
                    tracing::warn!(
                        producer = %following.name(),
                        %err,
                        "failed to initialize following producer, removing it"
                    );
                    return None;
                }
                following.set_leading_producer(ended);
                *slot = Some(following);
            }
            Err(err) => {
                if let Some(failed) = slot.take() {
                    tracing::warn!(
                        producer = %failed.name(),
                        %err,
                        "producer failed to render, removing it"
                    );
                }
                return None;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/core.rs"]
pub(crate) mod tests;
