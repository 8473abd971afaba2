use std::sync::Arc;

use crate::{
    foundation::error::OnairResult,
    foundation::format::VideoFormatDesc,
    frame::core::Frame,
    gpu::device::GpuDevice,
    producer::core::{BoxedProducer, FrameProducer},
    producer::decode::{AudioDecode, DecodePipeline, PacketSource, VideoDecode},
};

/// Playback options for a file-backed producer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlaybackParams {
    /// Restart from the beginning instead of ending the stream.
    pub loop_playback: bool,
    /// Best-effort start offset in frames. A failed seek is logged and
    /// playback continues from the natural start.
    pub seek_frame: Option<u64>,
}

/// Frame producer backed by one decode pipeline over a media file.
///
/// Resolving a bare name to a concrete file (extension probing) belongs to
/// the controlling layer; this producer takes an already-opened packet
/// source and its decode stages.
pub struct FileProducer {
    pipeline: DecodePipeline,
    source_name: String,
    following: Option<BoxedProducer>,
}

impl FileProducer {
    /// Wrap a packet source and its decode stages. `audio` is `None` for
    /// video-only sources.
    pub fn new(
        device: Arc<dyn GpuDevice>,
        source: Box<dyn PacketSource>,
        video: Box<dyn VideoDecode>,
        audio: Option<Box<dyn AudioDecode>>,
        source_name: impl Into<String>,
        params: PlaybackParams,
    ) -> Self {
        let source_name = source_name.into();
        let mut pipeline = DecodePipeline::new(device, source, video, audio);
        pipeline.set_loop(params.loop_playback);
        if let Some(frame) = params.seek_frame
            && !pipeline.seek(frame)
        {
            tracing::warn!(
                file = %source_name,
                frame,
                "failed to seek, playing from the natural start"
            );
        }
        Self {
            pipeline,
            source_name,
            following: None,
        }
    }

    /// Declare the producer that plays once this file ends.
    pub fn set_following(&mut self, following: BoxedProducer) {
        self.following = Some(following);
    }
}

impl FrameProducer for FileProducer {
    fn initialize(&mut self, format: &VideoFormatDesc) -> OnairResult<()> {
        self.pipeline.initialize(format)
    }

    fn render_frame(&mut self) -> OnairResult<Option<Frame>> {
        self.pipeline.receive()
    }

    fn take_following_producer(&mut self) -> Option<BoxedProducer> {
        self.following.take()
    }

    fn name(&self) -> String {
        format!("file[{}]", self.source_name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/file.rs"]
mod tests;
