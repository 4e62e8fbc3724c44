use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ImgverbError, ImgverbResult};
use crate::render::frame::FrameRGBA;

/// Marker separating a sequence stem from the index of a processed frame.
const PROCESSED_MARKER: &str = "_fx_";
/// A processed frame's stem, once its index is split off, ends with this.
const PROCESSED_STEM_SUFFIX: &str = "_fx";

/// Still-image container used for extracted and processed frames.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// Lossless PNG, alpha preserved.
    #[default]
    Png,
    /// JPEG; alpha is dropped on save.
    Jpg,
}

impl FrameFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
        }
    }

    fn matches_extension(self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        match self {
            Self::Png => ext == "png",
            Self::Jpg => ext == "jpg" || ext == "jpeg",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpg => image::ImageFormat::Jpeg,
        }
    }
}

impl std::str::FromStr for FrameFormat {
    type Err = ImgverbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            other => Err(ImgverbError::config(format!(
                "unsupported frame format '{other}' (expected png or jpg)"
            ))),
        }
    }
}

/// One extracted frame on disk, named `<stem>_<index>.<ext>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameFile {
    /// Full path to the file.
    pub path: PathBuf,
    /// Sequence name before the trailing index.
    pub stem: String,
    /// Index digits exactly as they appear in the file name.
    pub index: String,
}

impl FrameFile {
    /// Name of the processed counterpart of this frame.
    pub fn processed_name(&self, format: FrameFormat) -> String {
        processed_frame_name(&self.stem, &self.index, format)
    }
}

/// Split a file stem (no extension) into its sequence stem and trailing `_<digits>` index.
pub fn frame_index_suffix(file_stem: &str) -> Option<(&str, &str)> {
    let (stem, digits) = file_stem.rsplit_once('_')?;
    if stem.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((stem, digits))
}

/// `<stem>_fx_<index>.<ext>`.
pub fn processed_frame_name(stem: &str, index: &str, format: FrameFormat) -> String {
    format!("{stem}{PROCESSED_MARKER}{index}.{}", format.extension())
}

/// Extracted frames in `dir`, sorted by stem and then by numeric index.
///
/// Only files with the format's extension and a trailing `_<digits>` index are listed. Processed
/// frames (`<stem>_fx_<index>`) are skipped, so input and output may share a directory.
pub fn list_frames(dir: &Path, format: FrameFormat) -> ImgverbResult<Vec<FrameFile>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("read frames directory '{}'", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !format.matches_extension(ext) {
            continue;
        }
        let Some(file_stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((stem, index)) = frame_index_suffix(file_stem) else {
            tracing::debug!(path = %path.display(), "skipping file without frame index");
            continue;
        };
        if stem.ends_with(PROCESSED_STEM_SUFFIX) {
            continue;
        }
        out.push(FrameFile {
            stem: stem.to_owned(),
            index: index.to_owned(),
            path,
        });
    }

    out.sort_by(|a, b| {
        a.stem
            .cmp(&b.stem)
            .then_with(|| cmp_index(&a.index, &b.index))
            .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
    });
    Ok(out)
}

// Numeric order on digit strings of any length: `9999 < 10000`, `007 == 7`.
fn cmp_index(a: &str, b: &str) -> std::cmp::Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Decode an image file into straight RGBA8.
pub fn load_frame(path: &Path) -> ImgverbResult<FrameRGBA> {
    let img = image::open(path)
        .map_err(|e| ImgverbError::media(format!("decode frame '{}': {e}", path.display())))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    FrameRGBA::from_raw(width, height, rgba.into_raw())
}

/// Encode a frame to `path`. JPEG output drops the alpha channel.
pub fn save_frame(path: &Path, frame: &FrameRGBA, format: FrameFormat) -> ImgverbResult<()> {
    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| ImgverbError::media("frame buffer does not match its dimensions"))?;
    let img = image::DynamicImage::ImageRgba8(rgba);
    let img = match format {
        FrameFormat::Png => img,
        FrameFormat::Jpg => image::DynamicImage::ImageRgb8(img.to_rgb8()),
    };
    img.save_with_format(path, format.image_format())
        .map_err(|e| ImgverbError::media(format!("encode frame '{}': {e}", path.display())))
}

/// Create `dir` if needed. With `clean`, remove everything already inside it.
pub fn prepare_dir(dir: &Path, clean: bool) -> ImgverbResult<()> {
    if clean && dir.exists() {
        tracing::debug!(dir = %dir.display(), "cleaning directory");
        for entry in
            std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?
        {
            let path = entry
                .with_context(|| format!("read entry in '{}'", dir.display()))?
                .path();
            if path.is_dir() {
                std::fs::remove_dir_all(&path)
                    .with_context(|| format!("remove directory '{}'", path.display()))?;
            } else {
                std::fs::remove_file(&path)
                    .with_context(|| format!("remove file '{}'", path.display()))?;
            }
        }
    }
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create directory '{}'", dir.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/frames.rs"]
mod tests;
