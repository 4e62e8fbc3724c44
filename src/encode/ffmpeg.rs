use std::path::Path;
use std::process::{Command, Stdio};

use crate::assets::frames::FrameFormat;
use crate::foundation::core::Fps;
use crate::foundation::error::{ImgverbError, ImgverbResult};

/// Whether an `ffmpeg` binary can be launched from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> ImgverbResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Pattern ffmpeg expands for extracted frames: `<dir>/<stem>_%04d.<ext>`.
pub fn extracted_frame_pattern(frames_dir: &Path, stem: &str, format: FrameFormat) -> String {
    frames_dir
        .join(format!("{stem}_%04d.{}", format.extension()))
        .to_string_lossy()
        .into_owned()
}

/// Pattern ffmpeg reads processed frames from: `<dir>/<stem>_fx_%04d.<ext>`.
pub fn processed_frame_pattern(frames_dir: &Path, stem: &str, format: FrameFormat) -> String {
    frames_dir
        .join(format!("{stem}_fx_%04d.{}", format.extension()))
        .to_string_lossy()
        .into_owned()
}

/// Decode `video` into numbered still frames in `frames_dir`, sampled at `fps`.
#[tracing::instrument(skip_all, fields(video = %video.display(), fps = %fps.to_ffmpeg_arg()))]
pub fn extract_frames(
    video: &Path,
    frames_dir: &Path,
    stem: &str,
    fps: Fps,
    format: FrameFormat,
) -> ImgverbResult<()> {
    if !video.is_file() {
        return Err(ImgverbError::media(format!(
            "input video '{}' does not exist",
            video.display()
        )));
    }
    require_ffmpeg()?;

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
        .arg(video)
        .args(["-vf", &format!("fps={}", fps.to_ffmpeg_arg())])
        .arg(extracted_frame_pattern(frames_dir, stem, format));
    run(cmd, "extract frames")?;
    tracing::info!(dir = %frames_dir.display(), "extracted frames");
    Ok(())
}

/// Encode `<stem>_fx_%04d.<ext>` frames from `frames_dir` into an H.264/yuv420p video.
#[tracing::instrument(skip_all, fields(out = %out.display(), fps = %fps.to_ffmpeg_arg()))]
pub fn assemble_video(
    frames_dir: &Path,
    stem: &str,
    fps: Fps,
    format: FrameFormat,
    out: &Path,
    overwrite: bool,
) -> ImgverbResult<()> {
    if !overwrite && out.exists() {
        return Err(ImgverbError::media(format!(
            "output file '{}' already exists",
            out.display()
        )));
    }
    ensure_parent_dir(out)?;
    require_ffmpeg()?;

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-loglevel", "error"])
        .arg(if overwrite { "-y" } else { "-n" })
        .args(["-framerate", &fps.to_ffmpeg_arg(), "-i"])
        .arg(processed_frame_pattern(frames_dir, stem, format))
        // yuv420p needs even dimensions.
        .args([
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(out);
    run(cmd, "assemble video")?;
    tracing::info!("assembled video");
    Ok(())
}

fn require_ffmpeg() -> ImgverbResult<()> {
    if is_ffmpeg_on_path() {
        Ok(())
    } else {
        Err(ImgverbError::media(
            "ffmpeg is required for video input/output, but was not found on PATH",
        ))
    }
}

fn run(mut cmd: Command, what: &str) -> ImgverbResult<()> {
    tracing::debug!(?cmd, "running ffmpeg");
    let output = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            ImgverbError::media(format!(
                "failed to spawn ffmpeg to {what} (is it installed and on PATH?): {e}"
            ))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ImgverbError::media(format!(
            "ffmpeg failed to {what} (status {}): {}",
            output.status,
            stderr.trim()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
