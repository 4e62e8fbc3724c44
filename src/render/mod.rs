//! Frame buffers, per-frame processing, and the directory/video pipeline around it.

pub(crate) mod frame;
pub(crate) mod pipeline;
pub(crate) mod processor;
