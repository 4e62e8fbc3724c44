//! Video boundary: frame extraction and reassembly through the system `ffmpeg` binary.

pub(crate) mod ffmpeg;
