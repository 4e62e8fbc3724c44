/// Frame-indexed blend ratio between the source pixel and the expression output.
///
/// `1.0` keeps the source untouched, `0.0` shows only the expression output. The ratio moves by
/// a fixed delta per frame and saturates at the `[0, 1]` bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolationRamp {
    ratio: f64,
    delta: f64,
}

impl InterpolationRamp {
    /// Start at `initial` (clamped into `[0, 1]`) and cover `adjust` over `total_frames` frames.
    ///
    /// An empty sequence gets a zero delta.
    pub fn new(initial: f64, adjust: f64, total_frames: u64) -> Self {
        let delta = if total_frames == 0 {
            0.0
        } else {
            adjust / total_frames as f64
        };
        Self::with_delta(initial, delta)
    }

    /// Start at `initial` (clamped into `[0, 1]`) and move by `delta` per frame.
    pub fn with_delta(initial: f64, delta: f64) -> Self {
        Self {
            ratio: clamp_unit(initial),
            delta,
        }
    }

    /// Current blend ratio, always in `[0, 1]`.
    pub fn current(&self) -> f64 {
        self.ratio
    }

    /// Per-frame delta.
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Move to the next frame's ratio. Call once per frame, after compositing it.
    pub fn advance(&mut self) {
        self.ratio = clamp_unit(self.ratio + self.delta);
    }

    /// Ratios for the next `frames` frames, leaving `self` untouched.
    ///
    /// Element `i` is the value `current()` reports after `i` calls to `advance()`, which lets
    /// frames be composited out of order.
    pub fn schedule(&self, frames: usize) -> Vec<f64> {
        let mut ramp = *self;
        let mut out = Vec::with_capacity(frames);
        for _ in 0..frames {
            out.push(ramp.current());
            ramp.advance();
        }
        out
    }
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ramp.rs"]
mod tests;
