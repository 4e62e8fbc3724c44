//! Row reverb: an audio-style echo with decay and damping applied along each scanline.

use rayon::prelude::*;

/// Row reverb parameters after deriving the echo offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowReverb {
    /// Echo offset in pixels.
    pub length: usize,
    /// Weight of the already-echoed sample against the source sample.
    pub decay: f64,
    /// Weight of the preceding echoed sample (one-pole smoothing).
    pub damping: f64,
}

impl RowReverb {
    /// Derive the echo offset from an audio-style sample rate and duration.
    ///
    /// `round(length_ms / 1000 * sample_rate)`, floored at zero.
    pub fn new(sample_rate: f64, length_ms: f64, decay: f64, damping: f64) -> Self {
        Self {
            length: reverb_length_samples(sample_rate, length_ms),
            decay,
            damping,
        }
    }

    /// Filter every row of an RGBA8 buffer in place. Rows run in parallel.
    pub fn apply(&self, data: &mut [u8], width: u32) {
        let stride = width as usize * 4;
        if stride == 0 || self.length >= width as usize {
            return;
        }
        data.par_chunks_mut(stride)
            .for_each(|row| self.apply_row(row));
    }

    /// Filter one RGBA8 row in place.
    ///
    /// Each channel is an independent sample stream. Iteration must run left to right: the
    /// damping term reads `working[x + L - 1]`, which the previous step has already rewritten.
    pub fn apply_row(&self, row: &mut [u8]) {
        let width = row.len() / 4;
        let l = self.length;
        if l >= width {
            return;
        }
        let source = row.to_vec();
        for x in 0..width - l {
            let dst = (x + l) * 4;
            let src = x * 4;
            for c in 0..4 {
                let mut echoed = f64::from(row[dst + c]) * self.decay
                    + f64::from(source[src + c]) * (1.0 - self.decay);
                if x > 0 {
                    echoed = echoed * (1.0 - self.damping)
                        + f64::from(row[dst - 4 + c]) * self.damping;
                }
                row[dst + c] = narrow_sample(echoed);
            }
        }
    }
}

/// Echo offset in pixels for a sample rate and a duration in milliseconds.
pub fn reverb_length_samples(sample_rate: f64, length_ms: f64) -> usize {
    let samples = (length_ms / 1000.0 * sample_rate).round();
    if samples.is_nan() || samples <= 0.0 {
        0
    } else {
        samples as usize
    }
}

// Clamp into the 8-bit range, then truncate toward zero.
fn narrow_sample(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/reverb.rs"]
mod tests;
