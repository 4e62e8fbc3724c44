use rayon::prelude::*;

use crate::effects::distort::{Warp, sample_coords};
use crate::expression::error::EvalError;
use crate::expression::eval::Bindings;
use crate::expression::program::ChannelPrograms;
use crate::foundation::core::Channel;
use crate::foundation::error::{ImgverbError, ImgverbResult};
use crate::render::frame::FrameRGBA;

/// Blend a source channel with an expression channel.
///
/// `round(ratio * source + (1 - ratio) * generated)`, narrowed to 8 bits.
pub fn blend_channel(ratio: f64, source: u8, generated: u8) -> u8 {
    let v = (ratio * f64::from(source) + (1.0 - ratio) * f64::from(generated)).round();
    v.clamp(0.0, 255.0) as u8
}

struct PixelFailure {
    x: u32,
    y: u32,
    channel: Channel,
    err: EvalError,
}

/// Composite one frame: evaluate the channel programs at (optionally warped) coordinates and
/// blend the result with the source pixel at `ratio`.
///
/// Rows are evaluated in parallel. Every pixel writes only its own output cell, so the result
/// does not depend on scheduling. If any pixel fails, the failure first in raster order is
/// returned, naming the channel, the expression and the pixel.
pub fn composite_frame(
    source: &FrameRGBA,
    programs: &ChannelPrograms,
    warp: Option<Warp>,
    ratio: f64,
) -> ImgverbResult<FrameRGBA> {
    let (width, height) = (source.width, source.height);
    let stride = source.stride();
    let mut out = vec![0u8; source.data.len()];
    if stride == 0 || height == 0 {
        return FrameRGBA::from_raw(width, height, out);
    }

    let row_results: Vec<Result<(), PixelFailure>> = out
        .par_chunks_mut(stride)
        .zip(source.data.par_chunks(stride))
        .enumerate()
        .map(|(y, (dst_row, src_row))| {
            let y = y as u32;
            for x in 0..width {
                let (sx, sy) = sample_coords(x, y, width, height, warp);
                let vars = Bindings::new(i64::from(sx), i64::from(sy));
                let generated = programs
                    .eval_rgba(&vars)
                    .map_err(|(channel, err)| PixelFailure { x, y, channel, err })?;
                let i = x as usize * 4;
                for c in 0..4 {
                    dst_row[i + c] = blend_channel(ratio, src_row[i + c], generated[c]);
                }
            }
            Ok(())
        })
        .collect();

    if let Some(Err(f)) = row_results.into_iter().find(Result::is_err) {
        return Err(ImgverbError::Evaluation {
            channel: f.channel,
            x: f.x,
            y: f.y,
            expr: programs.get(f.channel).source.clone(),
            source: f.err,
        });
    }

    FrameRGBA::from_raw(width, height, out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/compositor.rs"]
mod tests;
