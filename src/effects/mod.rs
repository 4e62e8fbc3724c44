//! Pixel effects applied to each frame: warp, expression compositing, temporal ramp and row reverb.

pub(crate) mod compositor;
pub(crate) mod distort;
pub(crate) mod ramp;
pub(crate) mod reverb;
