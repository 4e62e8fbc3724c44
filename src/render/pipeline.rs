use std::path::{Path, PathBuf};

use crate::assets::frames::{FrameFile, FrameFormat, list_frames, load_frame, prepare_dir, save_frame};
use crate::config::effect::EffectConfig;
use crate::effects::ramp::InterpolationRamp;
use crate::encode::ffmpeg::{assemble_video, extract_frames};
use crate::foundation::core::{FrameIndex, Fps};
use crate::foundation::error::{ImgverbError, ImgverbResult};
use crate::render::frame::FrameRGBA;
use crate::render::processor::{FrameProcessor, build_thread_pool};

/// Frame-level threading. Row-level parallelism inside a frame is always on.
#[derive(Clone, Debug)]
pub struct Threading {
    /// Process several frames at once on a dedicated pool.
    pub parallel: bool,
    /// Frames decoded and held in memory per batch.
    pub chunk_size: usize,
    /// Worker count for the frame pool; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for Threading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

/// Counters reported after a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Frames found in the input.
    pub frames_total: u64,
    /// Processed frames written to disk.
    pub frames_written: u64,
}

/// Options for [`process_frames_dir`].
#[derive(Clone, Debug, Default)]
pub struct FramesDirOpts {
    /// Container of both input and output frames.
    pub format: FrameFormat,
    /// Frame-level threading.
    pub threading: Threading,
}

/// Options for [`run_video`].
#[derive(Clone, Debug)]
pub struct RunOpts {
    /// Source video.
    pub input: PathBuf,
    /// Destination video.
    pub output: PathBuf,
    /// Parent of the scratch frames directory. Defaults to the system temp dir.
    pub work_dir: Option<PathBuf>,
    /// Frame file stem. Defaults to the input file stem.
    pub stem: Option<String>,
    /// Extraction and assembly frame rate.
    pub fps: Fps,
    /// Container for extracted and processed frames.
    pub format: FrameFormat,
    /// Replace `output` if it exists.
    pub overwrite: bool,
    /// Leave the frames directory in place after the run.
    pub keep_frames: bool,
    /// Frame-level threading.
    pub threading: Threading,
}

impl RunOpts {
    /// Defaults: 30 fps, PNG frames, overwrite on, frames removed afterwards.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            work_dir: None,
            stem: None,
            fps: Fps { num: 30, den: 1 },
            format: FrameFormat::Png,
            overwrite: true,
            keep_frames: false,
            threading: Threading::default(),
        }
    }

    // A stem ending in `_fx` would make extracted frames look processed.
    fn resolved_stem(&self) -> String {
        let stem = self.stem.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|s| !s.is_empty())
                .unwrap_or("frames")
                .to_owned()
        });
        if stem.ends_with("_fx") {
            format!("{stem}_src")
        } else {
            stem
        }
    }
}

/// Process every extracted frame in `in_dir`, writing `<stem>_fx_<index>.<ext>` files into
/// `out_dir`.
///
/// Frames are taken in numeric index order; that order defines the ramp sequence. `in_dir` and
/// `out_dir` may be the same directory.
#[tracing::instrument(skip_all, fields(in_dir = %in_dir.display(), out_dir = %out_dir.display()))]
pub fn process_frames_dir(
    in_dir: &Path,
    out_dir: &Path,
    config: &EffectConfig,
    opts: &FramesDirOpts,
) -> ImgverbResult<RunStats> {
    let processor = FrameProcessor::new(config)?;
    process_with(&processor, config, in_dir, out_dir, opts)
}

/// Full video run: extract frames with ffmpeg, process them, and assemble the output video.
#[tracing::instrument(skip_all, fields(input = %opts.input.display(), output = %opts.output.display()))]
pub fn run_video(config: &EffectConfig, opts: &RunOpts) -> ImgverbResult<RunStats> {
    // Configuration problems surface before any ffmpeg work.
    let processor = FrameProcessor::new(config)?;

    if !opts.input.is_file() {
        return Err(ImgverbError::media(format!(
            "input video '{}' does not exist",
            opts.input.display()
        )));
    }
    if !opts.overwrite && opts.output.exists() {
        return Err(ImgverbError::media(format!(
            "output file '{}' already exists",
            opts.output.display()
        )));
    }

    let stem = opts.resolved_stem();
    let (work_dir, owns_work_dir) = match &opts.work_dir {
        Some(dir) => (dir.clone(), false),
        None => (
            std::env::temp_dir().join(format!("imgverb_{}_{}", stem, std::process::id())),
            true,
        ),
    };
    let frames_dir = work_dir.join(&stem);
    prepare_dir(&frames_dir, true)?;
    let _cleanup = FramesDirGuard(cleanup_target(
        &work_dir,
        &frames_dir,
        owns_work_dir,
        opts.keep_frames,
    ));

    extract_frames(&opts.input, &frames_dir, &stem, opts.fps, opts.format)?;

    let dir_opts = FramesDirOpts {
        format: opts.format,
        threading: opts.threading.clone(),
    };
    let stats = process_with(&processor, config, &frames_dir, &frames_dir, &dir_opts)?;

    assemble_video(
        &frames_dir,
        &stem,
        opts.fps,
        opts.format,
        &opts.output,
        opts.overwrite,
    )?;

    tracing::info!(frames = stats.frames_written, "run complete");
    Ok(stats)
}

fn process_with(
    processor: &FrameProcessor,
    config: &EffectConfig,
    in_dir: &Path,
    out_dir: &Path,
    opts: &FramesDirOpts,
) -> ImgverbResult<RunStats> {
    let files = list_frames(in_dir, opts.format)?;
    if files.is_empty() {
        return Err(ImgverbError::media(format!(
            "no {} frames found in '{}'",
            opts.format.extension(),
            in_dir.display()
        )));
    }
    prepare_dir(out_dir, false)?;

    let total = files.len() as u64;
    let mut ramp = config.ramp(total);
    let pool = if opts.threading.parallel {
        Some(build_thread_pool(opts.threading.threads)?)
    } else {
        None
    };
    tracing::info!(
        frames = total,
        parallel = opts.threading.parallel,
        ratio = ramp.current(),
        delta = ramp.delta(),
        "processing frames"
    );

    let mut stats = RunStats {
        frames_total: total,
        frames_written: 0,
    };
    let chunk_size = normalized_chunk_size(opts.threading.chunk_size);
    for (chunk_idx, chunk) in files.chunks(chunk_size).enumerate() {
        let first = FrameIndex((chunk_idx * chunk_size) as u64);
        tracing::debug!(first = first.0, len = chunk.len(), "processing chunk");
        let processed = process_chunk(processor, chunk, &mut ramp, pool.as_ref())?;
        for (file, frame) in chunk.iter().zip(&processed) {
            save_frame(&out_dir.join(file.processed_name(opts.format)), frame, opts.format)?;
            stats.frames_written += 1;
        }
    }

    Ok(stats)
}

fn process_chunk(
    processor: &FrameProcessor,
    files: &[FrameFile],
    ramp: &mut InterpolationRamp,
    pool: Option<&rayon::ThreadPool>,
) -> ImgverbResult<Vec<FrameRGBA>> {
    let frames = files
        .iter()
        .map(|f| load_frame(&f.path))
        .collect::<ImgverbResult<Vec<_>>>()?;
    match pool {
        Some(pool) => processor.process_sequence_parallel(&frames, ramp, pool),
        None => processor.process_sequence(&frames, ramp),
    }
}

// Directory removed once the run ends: the whole scratch dir when the run created it, otherwise
// only the frames subdirectory inside the caller's work dir.
fn cleanup_target(
    work_dir: &Path,
    frames_dir: &Path,
    owns_work_dir: bool,
    keep_frames: bool,
) -> Option<PathBuf> {
    match (keep_frames, owns_work_dir) {
        (true, _) => None,
        (false, true) => Some(work_dir.to_path_buf()),
        (false, false) => Some(frames_dir.to_path_buf()),
    }
}

fn normalized_chunk_size(chunk_size: usize) -> usize {
    chunk_size.max(1)
}

struct FramesDirGuard(Option<PathBuf>);

impl Drop for FramesDirGuard {
    fn drop(&mut self) {
        if let Some(dir) = self.0.take() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
