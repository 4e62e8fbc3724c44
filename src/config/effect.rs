use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::effects::distort::Warp;
use crate::effects::ramp::InterpolationRamp;
use crate::effects::reverb::RowReverb;
use crate::expression::program::ChannelSources;
use crate::foundation::error::{ImgverbError, ImgverbResult};

/// Run-wide effect parameters.
///
/// This is the JSON-facing representation. Every field is required except
/// [`ReverbConfig::placement`]; the engine never substitutes defaults of its own.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectConfig {
    /// Channel expressions, one per RGBA channel.
    pub expressions: ChannelSources,
    /// Coordinate warp applied before expression evaluation.
    pub distortion: DistortionConfig,
    /// Row reverb post effect.
    pub reverb: ReverbConfig,
    /// Source/expression blend ramp.
    pub interpolation: InterpolationConfig,
}

/// Coordinate warp settings.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistortionConfig {
    /// Apply the warp. When `false` expressions see the pixel's own coordinates.
    pub enabled: bool,
    /// Peak displacement in pixels.
    pub amplitude: f64,
    /// Angular frequency in radians per pixel.
    pub frequency: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

/// Where the row reverb runs relative to compositing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReverbPlacement {
    /// Reverb the composited frame.
    #[default]
    AfterComposite,
    /// Reverb the source frame, then composite against the reverberated source.
    BeforeComposite,
}

/// Row reverb settings, expressed like an audio delay.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReverbConfig {
    /// Apply the reverb.
    pub enabled: bool,
    /// Samples per second; one pixel is one sample.
    pub sample_rate: f64,
    /// Echo offset in milliseconds.
    pub length_ms: f64,
    /// Weight of the echoed sample against the source sample.
    pub decay: f64,
    /// Weight of the preceding echoed sample.
    pub damping: f64,
    /// Ordering relative to compositing.
    #[serde(default)]
    pub placement: ReverbPlacement,
}

/// Blend ramp settings.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterpolationConfig {
    /// Ratio for the first frame; clamped into `[0, 1]`.
    pub initial_ratio: f64,
    /// Total change spread evenly across the sequence.
    pub adjust: f64,
}

impl EffectConfig {
    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ImgverbResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ImgverbError::config(format!("parse effect config JSON: {e}")))
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(s: &str) -> ImgverbResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| ImgverbError::config(format!("parse effect config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ImgverbResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ImgverbError::config(format!("open effect config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check numeric parameters. Expression text is checked when it is parsed.
    pub fn validate(&self) -> ImgverbResult<()> {
        let d = &self.distortion;
        finite("distortion.amplitude", d.amplitude)?;
        finite("distortion.frequency", d.frequency)?;
        finite("distortion.phase", d.phase)?;

        let r = &self.reverb;
        non_negative("reverb.sample_rate", r.sample_rate)?;
        non_negative("reverb.length_ms", r.length_ms)?;
        finite("reverb.decay", r.decay)?;
        finite("reverb.damping", r.damping)?;
        let samples = r.length_ms / 1000.0 * r.sample_rate;
        if samples > u32::MAX as f64 {
            return Err(ImgverbError::config(format!(
                "reverb length of {samples} samples is out of range"
            )));
        }

        finite("interpolation.initial_ratio", self.interpolation.initial_ratio)?;
        finite("interpolation.adjust", self.interpolation.adjust)?;
        Ok(())
    }

    /// Warp parameters, or `None` when distortion is disabled.
    pub fn warp(&self) -> Option<Warp> {
        self.distortion.enabled.then_some(Warp {
            amplitude: self.distortion.amplitude,
            frequency: self.distortion.frequency,
            phase: self.distortion.phase,
        })
    }

    /// Reverb with its derived length, or `None` when the reverb is disabled.
    pub fn row_reverb(&self) -> Option<RowReverb> {
        let r = &self.reverb;
        r.enabled
            .then(|| RowReverb::new(r.sample_rate, r.length_ms, r.decay, r.damping))
    }

    /// Ramp for a sequence of `total_frames` frames.
    pub fn ramp(&self, total_frames: u64) -> InterpolationRamp {
        InterpolationRamp::new(
            self.interpolation.initial_ratio,
            self.interpolation.adjust,
            total_frames,
        )
    }
}

fn finite(name: &str, v: f64) -> ImgverbResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ImgverbError::config(format!("{name} must be finite, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> ImgverbResult<()> {
    finite(name, v)?;
    if v < 0.0 {
        return Err(ImgverbError::config(format!("{name} must be >= 0, got {v}")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/config/effect.rs"]
mod tests;
