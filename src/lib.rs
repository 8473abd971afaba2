//! Onair is a real-time playout frame production and compositing engine.
//!
//! It turns independently advancing media sources (decoded files, generated
//! graphics, live transitions between sources) into a continuous stream of
//! composited video+audio frames, pulled at the output frame rate.
//!
//! # Pipeline overview
//!
//! 1. **Decode**: a [`DecodePipeline`] pairs decoded pictures with audio
//!    chunks behind bounded lookahead queues.
//! 2. **Produce**: [`FrameProducer`]s ([`FileProducer`], [`ColorProducer`],
//!    [`TransitionProducer`]) yield one [`Frame`] per output tick and chain
//!    into one another via following/leading hand-off.
//! 3. **Composite**: composite frames merge child frames and mix their audio;
//!    transitions blend two producer graphs into one frame.
//! 4. **Render**: a [`FrameRenderer`] pulls the active chain, runs the
//!    write/read phase discipline against the [`GpuDevice`] and draws.
//!
//! Control flow is strictly pull-based: the renderer pulls, producers pull
//! their own children, nothing pushes upward. Parallelism is bounded and
//! structured (video ∥ audio decode, source ∥ destination render, partitioned
//! sample mixing); every parallel region joins before its enclosing call
//! returns.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod audio;
mod foundation;
mod frame;
mod gpu;
mod producer;
mod render;

pub use audio::mix::{VOLUME_FULL, mix_saturating_into, scale_volume, silence};
pub use foundation::error::{OnairError, OnairResult};
pub use foundation::format::{FieldMode, Fps, VideoFormatDesc};
pub use frame::core::{AudioData, Frame, RenderTransform};
pub use gpu::device::{DrawCall, GpuDevice, SoftwareDevice, TextureDesc, TextureId};
pub use gpu::texture::Texture;
pub use producer::color::{ColorProducer, parse_color};
pub use producer::core::{BoxedProducer, FrameProducer, render_with_handoff};
pub use producer::decode::{
    AudioDecode, DecodePipeline, DecodedPicture, LOOKAHEAD, PacketSource, VideoDecode,
};
pub use producer::file::{FileProducer, PlaybackParams};
pub use producer::transition::{
    TransitionDirection, TransitionInfo, TransitionKind, TransitionProducer, parse_transition,
};
pub use render::renderer::FrameRenderer;
