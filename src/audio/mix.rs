use rayon::prelude::*;

/// Full volume for the fixed-point scale used by [`scale_volume`].
pub const VOLUME_FULL: i32 = 256;

/// Mix `src` into `dst` with saturating 16-bit addition.
///
/// `dst` is grown to the longer of the two buffers first, so the mixed length
/// equals the longest contributor and absent samples count as silence. The
/// addition is partitioned across indices in parallel; each output index is
/// written by exactly one task, and the result is identical to the serial
/// sample-wise loop.
///
/// Saturation is intentional: wraparound on hot mixes is audible as clicks.
pub fn mix_saturating_into(dst: &mut Vec<i16>, src: &[i16]) {
    if dst.len() < src.len() {
        dst.resize(src.len(), 0);
    }
    dst[..src.len()]
        .par_iter_mut()
        .zip(src.par_iter())
        .for_each(|(d, s)| *d = d.saturating_add(*s));
}

/// Scale samples by `volume / 256` in fixed point, in parallel.
///
/// `volume` must be in `0..=256`; `256` is unity gain and `0` silence.
pub fn scale_volume(samples: &mut [i16], volume: i32) {
    debug_assert!((0..=VOLUME_FULL).contains(&volume));
    let volume = volume.clamp(0, VOLUME_FULL);
    samples
        .par_iter_mut()
        .for_each(|s| *s = ((i32::from(*s) * volume) >> 8) as i16);
}

/// Zero all samples in place.
pub fn silence(samples: &mut [i16]) {
    samples.fill(0);
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
