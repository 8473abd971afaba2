use std::collections::VecDeque;
use std::sync::Arc;

use crate::{
    foundation::error::{OnairError, OnairResult},
    foundation::format::{FieldMode, VideoFormatDesc},
    frame::core::{AudioData, Frame},
    gpu::device::GpuDevice,
    gpu::texture::Texture,
};

/// Lookahead queue capacity for decoded-but-unpaired video frames and audio
/// chunks. Decoders emit in bursts of differing granularity (one picture vs.
/// arbitrary sample counts); three slots absorb the skew without unbounded
/// buffering.
pub const LOOKAHEAD: usize = 3;

/// Demuxed packet source (opaque decoder library surface).
///
/// Packet getters return an empty buffer when no packet is ready.
pub trait PacketSource: Send {
    /// Next compressed video packet, or empty.
    fn video_packet(&mut self) -> Vec<u8>;

    /// Next compressed audio packet, or empty.
    fn audio_packet(&mut self) -> Vec<u8>;

    /// Whether the source is exhausted.
    fn is_eof(&self) -> bool;

    /// Restart from the beginning instead of reporting EOF.
    fn set_loop(&mut self, looping: bool);

    /// Best-effort seek to a frame index; `false` when the seek failed.
    fn seek(&mut self, frame: u64) -> bool;

    /// Whether the source carries an audio track at all.
    fn has_audio(&self) -> bool;
}

/// One decoded picture, full-range RGBA8.
#[derive(Clone, Debug)]
pub struct DecodedPicture {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// `width * height * 4` RGBA bytes.
    pub rgba: Vec<u8>,
}

/// Video decode stage (opaque decoder library surface).
pub trait VideoDecode: Send {
    /// Decode one packet into one picture.
    fn decode(&mut self, packet: &[u8]) -> OnairResult<DecodedPicture>;
}

/// Audio decode stage (opaque decoder library surface). One packet may yield
/// several fixed-size chunks of interleaved 16-bit samples.
pub trait AudioDecode: Send {
    /// Decode one packet into zero or more sample chunks.
    fn decode(&mut self, packet: &[u8]) -> OnairResult<Vec<AudioData>>;
}

/// Per-source decode-and-lookahead pipeline producing aligned audio+video
/// frames.
///
/// `receive` never blocks the caller beyond one decode unit of work: it
/// returns the next paired frame, the last successfully produced frame when
/// decode is starved (freeze-frame fallback), or `None` once the source is
/// exhausted and nothing paired remains.
pub struct DecodePipeline {
    source: Box<dyn PacketSource>,
    video: Box<dyn VideoDecode>,
    audio: Option<Box<dyn AudioDecode>>,
    device: Arc<dyn GpuDevice>,

    video_queue: VecDeque<Frame>,
    audio_queue: VecDeque<AudioData>,
    output: VecDeque<Frame>,
    last_frame: Frame,

    format: Option<VideoFormatDesc>,
}

impl DecodePipeline {
    /// Assemble a pipeline from its stages. The audio stage is absent for
    /// video-only sources.
    pub fn new(
        device: Arc<dyn GpuDevice>,
        source: Box<dyn PacketSource>,
        video: Box<dyn VideoDecode>,
        audio: Option<Box<dyn AudioDecode>>,
    ) -> Self {
        Self {
            source,
            video,
            audio,
            device,
            video_queue: VecDeque::new(),
            audio_queue: VecDeque::new(),
            output: VecDeque::new(),
            last_frame: Frame::empty(),
            format: None,
        }
    }

    /// Bind the pipeline to the active output format.
    pub fn initialize(&mut self, format: &VideoFormatDesc) -> OnairResult<()> {
        self.format = Some(*format);
        Ok(())
    }

    /// Forward loop-on-end to the packet source.
    pub fn set_loop(&mut self, looping: bool) {
        self.source.set_loop(looping);
    }

    /// Forward a best-effort seek to the packet source.
    pub fn seek(&mut self, frame: u64) -> bool {
        self.source.seek(frame)
    }

    /// Produce the next output-ready frame.
    ///
    /// Loops internally until a paired frame is available, the source is
    /// confirmed exhausted (`Ok(None)`, reported on every call thereafter),
    /// or a starved decode falls back to the last produced frame. The stored
    /// fallback frame has its audio silenced, since a frozen picture must not
    /// repeat stale sound.
    pub fn receive(&mut self) -> OnairResult<Option<Frame>> {
        if self.format.is_none() {
            return Err(OnairError::validation(
                "decode pipeline must be initialized before receive",
            ));
        }

        while self.output.is_empty() && !self.source.is_eof() {
            let video_packet = if self.video_queue.len() < LOOKAHEAD {
                self.source.video_packet()
            } else {
                Vec::new()
            };
            let audio_packet = if self.audio_queue.len() < LOOKAHEAD {
                self.source.audio_packet()
            } else {
                Vec::new()
            };

            // The two stages share no mutable state; decode them in parallel.
            let video_stage = &mut self.video;
            let audio_stage = &mut self.audio;
            let (video_out, audio_out) = rayon::join(
                || {
                    if video_packet.is_empty() {
                        return None;
                    }
                    Some(video_stage.decode(&video_packet))
                },
                || {
                    let stage = audio_stage.as_mut()?;
                    if audio_packet.is_empty() {
                        return None;
                    }
                    Some(stage.decode(&audio_packet))
                },
            );

            match video_out {
                Some(Ok(picture)) => {
                    let frame = self.upload_picture(&picture)?;
                    self.video_queue.push_back(frame);
                }
                Some(Err(err)) => {
                    tracing::warn!(%err, "video packet failed to decode, skipping");
                }
                None => {}
            }
            match audio_out {
                Some(Ok(chunks)) => self.audio_queue.extend(chunks),
                Some(Err(err)) => {
                    tracing::warn!(%err, "audio packet failed to decode, skipping");
                }
                None => {}
            }

            // Pairing treats "no audio decode stage" as "no audio track";
            // sources without audio return empty audio packets anyway.
            let has_audio = self.audio.is_some();
            while !self.video_queue.is_empty() && (!self.audio_queue.is_empty() || !has_audio) {
                let Some(mut frame) = self.video_queue.pop_front() else {
                    break;
                };
                if has_audio && let Some(chunk) = self.audio_queue.pop_front() {
                    *frame.audio_data_mut() = chunk;
                }
                self.output.push_back(frame);
            }

            if self.output.is_empty() && video_packet.is_empty() && audio_packet.is_empty() {
                // Starved but not exhausted: freeze on the last frame rather
                // than stalling the output tick.
                return Ok(Some(self.last_frame.clone()));
            }
        }

        if let Some(frame) = self.output.pop_front() {
            let mut fallback = frame.clone();
            fallback.take_audio();
            self.last_frame = fallback;
            return Ok(Some(frame));
        }

        if self.source.is_eof() {
            return Ok(None);
        }

        Ok(Some(self.last_frame.clone()))
    }

    fn upload_picture(&self, picture: &DecodedPicture) -> OnairResult<Frame> {
        let texture = Texture::new(self.device.clone(), picture.width, picture.height)?;
        texture.upload(&picture.rgba)?;
        Ok(Frame::leaf(
            Arc::new(texture),
            AudioData::new(),
            FieldMode::Progressive,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/decode.rs"]
mod tests;
