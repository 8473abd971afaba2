use kurbo::{Rect, Vec2};

use crate::{
    audio::mix,
    foundation::error::{OnairError, OnairResult},
    foundation::format::VideoFormatDesc,
    frame::core::Frame,
    producer::core::{BoxedProducer, FrameProducer, render_with_handoff},
};

/// Transition style between an outgoing and an incoming producer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Hard cut: the source plays verbatim until the transition ends.
    Cut,
    /// Cross-dissolve via destination alpha.
    Mix,
    /// Destination slides in over the source.
    Slide,
    /// Destination pushes the source out.
    Push,
    /// Destination is revealed by a moving UV window.
    Wipe,
}

impl TransitionKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Mix => "mix",
            Self::Slide => "slide",
            Self::Push => "push",
            Self::Wipe => "wipe",
        }
    }
}

/// Horizontal direction of slide/push/wipe movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionDirection {
    /// Destination enters from the left edge.
    FromLeft,
    /// Destination enters from the right edge.
    FromRight,
}

impl TransitionDirection {
    fn sign(self) -> f64 {
        match self {
            Self::FromLeft => 1.0,
            Self::FromRight => -1.0,
        }
    }
}

/// Immutable transition descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionInfo {
    /// Transition style.
    pub kind: TransitionKind,
    /// Movement direction for the directional kinds.
    pub direction: TransitionDirection,
    /// Length of the transition in output frames. Must be > 0.
    pub duration: u32,
}

/// Parse a transition descriptor from a kind string and JSON parameters.
///
/// `params` is an object with a required positive `duration` (frames) and an
/// optional `direction` of `"from_left"` (default) or `"from_right"`.
pub fn parse_transition(kind: &str, params: &serde_json::Value) -> OnairResult<TransitionInfo> {
    let kind = match kind.trim().to_ascii_lowercase().as_str() {
        "cut" => TransitionKind::Cut,
        "mix" => TransitionKind::Mix,
        "slide" => TransitionKind::Slide,
        "push" => TransitionKind::Push,
        "wipe" => TransitionKind::Wipe,
        other => {
            return Err(OnairError::validation(format!(
                "unknown transition kind '{other}'"
            )));
        }
    };

    let params = if params.is_null() {
        None
    } else {
        Some(params.as_object().ok_or_else(|| {
            OnairError::validation("transition params must be an object when set")
        })?)
    };

    let duration = params
        .and_then(|p| p.get("duration"))
        .and_then(|v| v.as_u64())
        .ok_or_else(|| OnairError::validation("transition duration must be a positive integer"))?;
    let duration = u32::try_from(duration)
        .ok()
        .filter(|d| *d > 0)
        .ok_or_else(|| OnairError::validation("transition duration must be a positive integer"))?;

    let direction = match params.and_then(|p| p.get("direction")).and_then(|v| v.as_str()) {
        None => TransitionDirection::FromLeft,
        Some(s) => match s.trim().to_ascii_lowercase().as_str() {
            "from_left" | "fromleft" => TransitionDirection::FromLeft,
            "from_right" | "fromright" => TransitionDirection::FromRight,
            other => {
                return Err(OnairError::validation(format!(
                    "unknown transition direction '{other}'"
                )));
            }
        },
    };

    Ok(TransitionInfo {
        kind,
        direction,
        duration,
    })
}

/// Finite-duration producer blending an outgoing source into an incoming
/// destination, then substituting itself with the destination.
///
/// The source side is installed later via `set_leading_producer` (the outer
/// chain hands the currently playing producer over); the destination is
/// mandatory at construction. Each side renders in parallel and performs
/// producer hand-off independently; a side that fails or ends without a
/// follower simply stops contributing.
pub struct TransitionProducer {
    info: TransitionInfo,
    source: Option<BoxedProducer>,
    dest: Option<BoxedProducer>,
    current_frame: u32,
    format: Option<VideoFormatDesc>,
    ended_logged: bool,
}

impl TransitionProducer {
    /// Build a transition onto `dest`. Fails immediately when the destination
    /// is absent or the descriptor's duration is zero.
    pub fn new(dest: Option<BoxedProducer>, info: TransitionInfo) -> OnairResult<Self> {
        let Some(dest) = dest else {
            return Err(OnairError::validation(
                "transition requires a destination producer",
            ));
        };
        if info.duration == 0 {
            return Err(OnairError::validation(
                "transition duration must be at least one frame",
            ));
        }
        Ok(Self {
            info,
            source: None,
            dest: Some(dest),
            current_frame: 0,
            format: None,
            ended_logged: false,
        })
    }

    fn compose(&self, dest: Option<Frame>, source: Option<Frame>) -> OnairResult<Option<Frame>> {
        if dest.is_none() && source.is_none() {
            return Ok(None);
        }

        if self.info.kind == TransitionKind::Cut {
            return Ok(source);
        }

        let mut dest = dest.unwrap_or_else(Frame::empty);
        let mut source = source.unwrap_or_else(Frame::empty);

        let alpha = f64::from(self.current_frame) / f64::from(self.info.duration);
        let volume = (alpha * 256.0).round() as i32;

        // Independent buffers; scale both sides concurrently.
        let dest_audio = dest.audio_data_mut();
        let source_audio = source.audio_data_mut();
        rayon::join(
            || mix::scale_volume(dest_audio, volume),
            || mix::scale_volume(source_audio, mix::VOLUME_FULL - volume),
        );

        let dir = self.info.direction.sign();
        match self.info.kind {
            TransitionKind::Cut => {}
            TransitionKind::Mix => {
                dest.transform_mut().alpha = alpha;
            }
            TransitionKind::Slide => {
                dest.transform_mut().pos = Vec2::new((-1.0 + alpha) * dir, 0.0);
            }
            TransitionKind::Push => {
                dest.transform_mut().pos = Vec2::new((-1.0 + alpha) * dir, 0.0);
                source.transform_mut().pos = Vec2::new(alpha * dir, 0.0);
            }
            TransitionKind::Wipe => {
                let transform = dest.transform_mut();
                transform.pos = Vec2::new((-1.0 + alpha) * dir, 0.0);
                transform.uv = Rect::new((-1.0 + alpha) * dir, 1.0, 1.0 - (1.0 - alpha) * dir, 0.0);
            }
        }

        // Source first, destination painted over it.
        let mut out = Frame::composite();
        out.add(source)?;
        out.add(dest)?;
        Ok(Some(out))
    }
}

impl std::fmt::Debug for TransitionProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionProducer")
            .field("info", &self.info)
            .field("current_frame", &self.current_frame)
            .finish_non_exhaustive()
    }
}

impl FrameProducer for TransitionProducer {
    fn initialize(&mut self, format: &VideoFormatDesc) -> OnairResult<()> {
        if let Some(dest) = self.dest.as_mut() {
            dest.initialize(format)?;
        }
        self.format = Some(*format);
        Ok(())
    }

    fn render_frame(&mut self) -> OnairResult<Option<Frame>> {
        if self.current_frame == 0 {
            tracing::info!(transition = %self.name(), "transition started");
        }

        if self.current_frame >= self.info.duration {
            if !self.ended_logged {
                tracing::info!(transition = %self.name(), "transition ended");
                self.ended_logged = true;
            }
            return Ok(None);
        }
        self.current_frame += 1;

        let format = self.format;
        let Self { source, dest, .. } = self;
        let (dest_frame, source_frame) = rayon::join(
            || render_with_handoff(dest, format.as_ref()),
            || render_with_handoff(source, format.as_ref()),
        );

        let result = self.compose(dest_frame, source_frame)?;
        if result.is_none() && !self.ended_logged {
            tracing::info!(transition = %self.name(), "transition ended");
            self.ended_logged = true;
        }
        Ok(result)
    }

    fn take_following_producer(&mut self) -> Option<BoxedProducer> {
        self.dest.take()
    }

    fn set_leading_producer(&mut self, leading: BoxedProducer) {
        self.source = Some(leading);
    }

    fn name(&self) -> String {
        format!("transition[{}]", self.info.kind.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/transition.rs"]
mod tests;
