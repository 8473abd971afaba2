use crate::foundation::error::{OnairError, OnairResult};

/// Output frame rate as an exact rational.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator, must be > 0.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Fps {
    /// Validated constructor.
    pub fn new(num: u32, den: u32) -> OnairResult<Self> {
        if num == 0 {
            return Err(OnairError::validation("Fps num must be > 0"));
        }
        if den == 0 {
            return Err(OnairError::validation("Fps den must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one output frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

/// Video-field tag carried by frames and format descriptions.
///
/// `Progressive` frames carry a full picture; `Upper`/`Lower` frames carry the
/// named field of an interlaced picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FieldMode {
    /// Full-picture frames.
    Progressive,
    /// Upper field (dominant for upper-field-first formats).
    Upper,
    /// Lower field.
    Lower,
}

/// Description of the active output video format.
///
/// Passed to every producer's `initialize`; the decode pipeline and renderer
/// use it to decide picture dimensions and field handling.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoFormatDesc {
    /// Picture width in pixels.
    pub width: u32,
    /// Picture height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Field dominance of the output.
    pub field_mode: FieldMode,
}

impl VideoFormatDesc {
    /// 720x576 interlaced 25fps, upper-field dominant.
    pub fn pal() -> Self {
        Self {
            width: 720,
            height: 576,
            fps: Fps { num: 25, den: 1 },
            field_mode: FieldMode::Upper,
        }
    }

    /// 720x486 interlaced 29.97fps, lower-field dominant.
    pub fn ntsc() -> Self {
        Self {
            width: 720,
            height: 486,
            fps: Fps {
                num: 30_000,
                den: 1001,
            },
            field_mode: FieldMode::Lower,
        }
    }

    /// 1280x720 progressive 50fps.
    pub fn hd720p50() -> Self {
        Self {
            width: 1280,
            height: 720,
            fps: Fps { num: 50, den: 1 },
            field_mode: FieldMode::Progressive,
        }
    }

    /// 1920x1080 interlaced 25fps, upper-field dominant.
    pub fn hd1080i50() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: Fps { num: 25, den: 1 },
            field_mode: FieldMode::Upper,
        }
    }

    /// Whether this format outputs interlaced pictures.
    pub fn is_interlaced(self) -> bool {
        self.field_mode != FieldMode::Progressive
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/format.rs"]
mod tests;
