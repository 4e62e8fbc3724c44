//! imgverb applies a per-pixel, per-channel effect to every frame of a video.
//!
//! Each output channel is driven by a small arithmetic expression over the pixel's
//! (optionally warped) coordinates. The expression output is blended with the source pixel by
//! a ratio that ramps across the frame sequence, and a row-wise echo filter ("row reverb") can
//! smear values along each scanline.
//!
//! # Pipeline overview
//!
//! 1. **Parse**: four channel expressions -> [`ChannelPrograms`] (once per run)
//! 2. **Distort**: output pixel `(x, y)` -> sample coordinates ([`sample_coords`])
//! 3. **Composite**: evaluate, narrow to 8 bits, blend with the source at the ramp ratio
//!    ([`composite_frame`], [`InterpolationRamp`])
//! 4. **Reverb** (optional): per-row echo with decay and damping ([`RowReverb`])
//! 5. **Frame I/O** (optional): extract and reassemble video with the system `ffmpeg` binary
//!    ([`run_video`], [`process_frames_dir`])
//!
//! The per-frame core ([`FrameProcessor`]) performs no file or process I/O.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod effects;
mod encode;
mod expression;
mod foundation;
mod render;

pub use assets::frames::{
    FrameFile, FrameFormat, frame_index_suffix, list_frames, load_frame, prepare_dir,
    processed_frame_name, save_frame,
};
pub use config::effect::{
    DistortionConfig, EffectConfig, InterpolationConfig, ReverbConfig, ReverbPlacement,
};
pub use effects::compositor::{blend_channel, composite_frame};
pub use effects::distort::{Warp, distort, sample_coords};
pub use effects::ramp::InterpolationRamp;
pub use effects::reverb::{RowReverb, reverb_length_samples};
pub use encode::ffmpeg::{
    assemble_video, ensure_parent_dir, extract_frames, extracted_frame_pattern,
    is_ffmpeg_on_path, processed_frame_pattern,
};
pub use expression::ast::{BinaryOp, Builtin, Callee, Expr, UnaryOp};
pub use expression::error::{EvalError, EvalErrorKind, ParseError};
pub use expression::eval::{Bindings, eval, narrow_channel};
pub use expression::parser::parse_expr;
pub use expression::program::{ChannelProgram, ChannelPrograms, ChannelSources};
pub use foundation::core::{Channel, FrameIndex, Fps};
pub use foundation::error::{ImgverbError, ImgverbResult};
pub use render::frame::FrameRGBA;
pub use render::pipeline::{
    FramesDirOpts, RunOpts, RunStats, Threading, process_frames_dir, run_video,
};
pub use render::processor::{FrameProcessor, build_thread_pool};
