use crate::expression::error::EvalError;
use crate::foundation::core::Channel;

/// Convenience result type used across imgverb.
pub type ImgverbResult<T> = Result<T, ImgverbError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is fatal for a run: failures are deterministic functions of the configuration
/// and the input frames, so nothing is retried.
#[derive(thiserror::Error, Debug)]
pub enum ImgverbError {
    /// Invalid or out-of-domain configuration, including channel expressions that fail to parse.
    #[error("config error: {0}")]
    Config(String),

    /// A channel expression failed to evaluate for one pixel.
    #[error(
        "evaluation error: {channel} expression `{expr}` failed at pixel (x = {x}, y = {y}): {source}"
    )]
    Evaluation {
        /// Output channel whose expression failed.
        channel: Channel,
        /// Pixel column in the output frame.
        x: u32,
        /// Pixel row in the output frame.
        y: u32,
        /// Source text of the channel expression.
        expr: String,
        /// Underlying evaluator failure, naming the failing subexpression.
        #[source]
        source: EvalError,
    },

    /// Frame extraction, decode, encode or video assembly failed.
    #[error("media error: {0}")]
    Media(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImgverbError {
    /// Build an [`ImgverbError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build an [`ImgverbError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
