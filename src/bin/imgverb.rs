use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imgverb", version, about = "Per-pixel expression effects for video frames")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate an effect config and trial-evaluate its expressions.
    Check(CheckArgs),
    /// Process an already-extracted frames directory.
    Frames(FramesArgs),
    /// Extract, process and reassemble a video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Effect config JSON.
    #[arg(long)]
    config: PathBuf,
}

#[derive(clap::Args, Debug)]
struct ThreadingArgs {
    /// Process several frames concurrently.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames held in memory per batch.
    #[arg(long, default_value_t = 16)]
    chunk_size: usize,
}

impl ThreadingArgs {
    fn to_threading(&self) -> imgverb::Threading {
        imgverb::Threading {
            parallel: self.parallel,
            chunk_size: self.chunk_size,
            threads: self.threads,
        }
    }
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Effect config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Directory holding `<stem>_<index>.<ext>` frames.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Directory for `<stem>_fx_<index>.<ext>` frames (may equal --in).
    #[arg(long)]
    out: PathBuf,

    /// Frame image format: png or jpg.
    #[arg(long, default_value = "png")]
    format: imgverb::FrameFormat,

    #[command(flatten)]
    threading: ThreadingArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Effect config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output video.
    #[arg(long)]
    out: PathBuf,

    /// Parent directory for extracted frames (defaults to the system temp dir).
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Frame rate used for extraction and reassembly.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Frame image format: png or jpg.
    #[arg(long, default_value = "png")]
    format: imgverb::FrameFormat,

    /// Keep extracted and processed frames after the run.
    #[arg(long, default_value_t = false)]
    keep_frames: bool,

    /// Fail if the output already exists.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    #[command(flatten)]
    threading: ThreadingArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_config(path: &std::path::Path) -> anyhow::Result<imgverb::EffectConfig> {
    let config = imgverb::EffectConfig::from_path(path)
        .with_context(|| format!("load effect config '{}'", path.display()))?;
    Ok(config)
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let processor = imgverb::FrameProcessor::new(&config)?;

    let origin = imgverb::Bindings::new(0, 0);
    let rgba = processor
        .programs()
        .eval_rgba(&origin)
        .map_err(|(channel, e)| {
            anyhow::anyhow!(
                "{channel} expression `{}` failed at (0, 0): {e}",
                processor.programs().get(channel).source
            )
        })?;

    for p in processor.programs().iter() {
        println!("{:<5} {}", p.channel, p.expr);
    }
    println!("rgba(0, 0) = {rgba:?}");
    match processor.reverb() {
        Some(r) => println!("reverb length = {} px", r.length),
        None => println!("reverb disabled"),
    }
    println!("ok");
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let opts = imgverb::FramesDirOpts {
        format: args.format,
        threading: args.threading.to_threading(),
    };
    let stats = imgverb::process_frames_dir(&args.in_dir, &args.out, &config, &opts)?;
    eprintln!(
        "wrote {} of {} frames to {}",
        stats.frames_written,
        stats.frames_total,
        args.out.display()
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    let mut opts = imgverb::RunOpts::new(&args.in_path, &args.out);
    opts.work_dir = args.work_dir;
    opts.fps = imgverb::Fps::new(args.fps, 1)?;
    opts.format = args.format;
    opts.overwrite = !args.no_overwrite;
    opts.keep_frames = args.keep_frames;
    opts.threading = args.threading.to_threading();

    let stats = imgverb::run_video(&config, &opts)?;
    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_written
    );
    Ok(())
}
