/// Sinusoidal warp parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Warp {
    /// Peak displacement in pixels.
    pub amplitude: f64,
    /// Angular frequency in radians per pixel.
    pub frequency: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

/// Map pixel `(x, y)` of a `width x height` frame to warped sample coordinates.
///
/// The base coordinates are swapped: `y` feeds the new column and `x` the new row. Results are
/// clamped into the frame, so they are valid pixel positions for non-empty frames.
pub fn distort(x: u32, y: u32, width: u32, height: u32, warp: Warp) -> (u32, u32) {
    let offset = |t: u32| (warp.amplitude * (warp.frequency * f64::from(t) + warp.phase).sin()).round();
    let dx = clamp_coord(f64::from(y) + offset(x), width);
    let dy = clamp_coord(f64::from(x) + offset(y), height);
    (dx, dy)
}

/// Sample coordinates for `(x, y)`: warped when `warp` is set, identity otherwise.
pub fn sample_coords(x: u32, y: u32, width: u32, height: u32, warp: Option<Warp>) -> (u32, u32) {
    match warp {
        Some(w) => distort(x, y, width, height, w),
        None => (x, y),
    }
}

// NaN offsets (non-finite warp parameters) collapse to 0.
fn clamp_coord(v: f64, len: u32) -> u32 {
    let max = f64::from(len.saturating_sub(1));
    if v.is_nan() {
        return 0;
    }
    v.clamp(0.0, max) as u32
}

#[cfg(test)]
#[path = "../../tests/unit/effects/distort.rs"]
mod tests;
