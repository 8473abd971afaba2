use std::sync::Arc;

use crate::{
    foundation::error::{OnairError, OnairResult},
    foundation::format::{FieldMode, VideoFormatDesc},
    frame::core::{AudioData, Frame},
    gpu::device::GpuDevice,
    gpu::texture::Texture,
};
use crate::producer::core::FrameProducer;

/// Parse `#RRGGBB` or `#AARRGGBB` into RGBA bytes.
pub fn parse_color(spec: &str) -> OnairResult<[u8; 4]> {
    let hex = spec.strip_prefix('#').unwrap_or(spec);
    // Byte-offset slicing below requires single-byte characters.
    if !hex.is_ascii() {
        return Err(OnairError::validation(format!(
            "color '{spec}' must be #RRGGBB or #AARRGGBB"
        )));
    }
    let parse = |s: &str| {
        u8::from_str_radix(s, 16)
            .map_err(|_| OnairError::validation(format!("invalid color component '{s}'")))
    };
    match hex.len() {
        6 => Ok([
            parse(&hex[0..2])?,
            parse(&hex[2..4])?,
            parse(&hex[4..6])?,
            0xFF,
        ]),
        8 => Ok([
            parse(&hex[2..4])?,
            parse(&hex[4..6])?,
            parse(&hex[6..8])?,
            parse(&hex[0..2])?,
        ]),
        _ => Err(OnairError::validation(format!(
            "color '{spec}' must be #RRGGBB or #AARRGGBB"
        ))),
    }
}

/// Pure generator producer emitting one solid-color frame per tick.
///
/// The picture is prepared once at `initialize`; each tick gets its own
/// texture so the frame follows the one-tick lifecycle of decoded frames.
/// The audio contribution is silence.
pub struct ColorProducer {
    device: Arc<dyn GpuDevice>,
    color: [u8; 4],
    label: String,
    picture: Option<(u32, u32, Vec<u8>)>,
}

impl ColorProducer {
    /// Generator for a fixed RGBA color.
    pub fn new(device: Arc<dyn GpuDevice>, color: [u8; 4], label: impl Into<String>) -> Self {
        Self {
            device,
            color,
            label: label.into(),
            picture: None,
        }
    }

    /// Generator from a `#RRGGBB`/`#AARRGGBB` color string.
    pub fn from_str(device: Arc<dyn GpuDevice>, spec: &str) -> OnairResult<Self> {
        let color = parse_color(spec)?;
        Ok(Self::new(device, color, spec.to_owned()))
    }
}

impl FrameProducer for ColorProducer {
    fn initialize(&mut self, format: &VideoFormatDesc) -> OnairResult<()> {
        let mut pixels = vec![0u8; format.width as usize * format.height as usize * 4];
        for px in pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&self.color);
        }
        self.picture = Some((format.width, format.height, pixels));
        Ok(())
    }

    fn render_frame(&mut self) -> OnairResult<Option<Frame>> {
        let (width, height, pixels) = self.picture.as_ref().ok_or_else(|| {
            OnairError::validation("color producer must be initialized before rendering")
        })?;
        let texture = Texture::new(self.device.clone(), *width, *height)?;
        texture.upload(pixels)?;
        Ok(Some(Frame::leaf(
            Arc::new(texture),
            AudioData::new(),
            FieldMode::Progressive,
        )))
    }

    fn name(&self) -> String {
        format!("color[{}]", self.label)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/producer/color.rs"]
mod tests;
