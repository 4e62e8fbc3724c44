use rayon::prelude::*;

use crate::config::effect::{EffectConfig, ReverbPlacement};
use crate::effects::compositor::composite_frame;
use crate::effects::distort::Warp;
use crate::effects::ramp::InterpolationRamp;
use crate::effects::reverb::RowReverb;
use crate::expression::program::ChannelPrograms;
use crate::foundation::error::{ImgverbError, ImgverbResult};
use crate::render::frame::FrameRGBA;

/// Per-run effect state built once from an [`EffectConfig`].
///
/// Holds the parsed channel programs and the derived warp and reverb parameters. Processing a
/// frame is a pure function of the frame and its blend ratio, so one processor can be shared
/// across worker threads.
#[derive(Debug, Clone)]
pub struct FrameProcessor {
    programs: ChannelPrograms,
    warp: Option<Warp>,
    reverb: Option<RowReverb>,
    placement: ReverbPlacement,
}

impl FrameProcessor {
    /// Validate `config` and parse its channel expressions.
    #[tracing::instrument(skip_all)]
    pub fn new(config: &EffectConfig) -> ImgverbResult<Self> {
        config.validate()?;
        let programs = ChannelPrograms::parse(&config.expressions)?;
        let reverb = config.row_reverb();
        tracing::debug!(
            warp = config.distortion.enabled,
            reverb_length = reverb.map(|r| r.length),
            placement = ?config.reverb.placement,
            "frame processor ready"
        );
        Ok(Self {
            programs,
            warp: config.warp(),
            reverb,
            placement: config.reverb.placement,
        })
    }

    /// Parsed channel programs.
    pub fn programs(&self) -> &ChannelPrograms {
        &self.programs
    }

    /// Active reverb, if enabled.
    pub fn reverb(&self) -> Option<RowReverb> {
        self.reverb
    }

    /// Composite one frame at `ratio` and run the reverb in its configured position.
    pub fn process(&self, frame: &FrameRGBA, ratio: f64) -> ImgverbResult<FrameRGBA> {
        match (self.reverb, self.placement) {
            (None, _) => composite_frame(frame, &self.programs, self.warp, ratio),
            (Some(reverb), ReverbPlacement::AfterComposite) => {
                let mut out = composite_frame(frame, &self.programs, self.warp, ratio)?;
                reverb.apply(&mut out.data, out.width);
                Ok(out)
            }
            (Some(reverb), ReverbPlacement::BeforeComposite) => {
                let mut source = frame.clone();
                reverb.apply(&mut source.data, source.width);
                composite_frame(&source, &self.programs, self.warp, ratio)
            }
        }
    }

    /// Process `frames` in order, reading the ratio from `ramp` and advancing it after each
    /// frame.
    pub fn process_sequence(
        &self,
        frames: &[FrameRGBA],
        ramp: &mut InterpolationRamp,
    ) -> ImgverbResult<Vec<FrameRGBA>> {
        let mut out = Vec::with_capacity(frames.len());
        for frame in frames {
            out.push(self.process(frame, ramp.current())?);
            ramp.advance();
        }
        Ok(out)
    }

    /// Same result as [`FrameProcessor::process_sequence`], with frames processed concurrently
    /// on `pool`.
    ///
    /// Each frame's ratio is taken from [`InterpolationRamp::schedule`]. Output order matches
    /// input order; on failure the error of the earliest failing frame is returned and `ramp` is
    /// left untouched.
    pub fn process_sequence_parallel(
        &self,
        frames: &[FrameRGBA],
        ramp: &mut InterpolationRamp,
        pool: &rayon::ThreadPool,
    ) -> ImgverbResult<Vec<FrameRGBA>> {
        let ratios = ramp.schedule(frames.len());
        let results: Vec<ImgverbResult<FrameRGBA>> = pool.install(|| {
            frames
                .par_iter()
                .zip(ratios.par_iter())
                .map(|(frame, &ratio)| self.process(frame, ratio))
                .collect()
        });

        let out = results.into_iter().collect::<ImgverbResult<Vec<_>>>()?;
        for _ in 0..frames.len() {
            ramp.advance();
        }
        Ok(out)
    }
}

/// Dedicated pool for frame-parallel processing. `threads == None` lets rayon pick.
pub fn build_thread_pool(threads: Option<usize>) -> ImgverbResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ImgverbError::config("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("imgverb-frame-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ImgverbError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/processor.rs"]
mod tests;
