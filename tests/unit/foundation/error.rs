use super::*;
use crate::expression::error::EvalErrorKind;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ImgverbError::config("x")
            .to_string()
            .contains("config error:")
    );
    assert!(
        ImgverbError::media("x")
            .to_string()
            .contains("media error:")
    );
}

#[test]
fn evaluation_error_names_channel_pixel_and_expression() {
    let err = ImgverbError::Evaluation {
        channel: Channel::Green,
        x: 3,
        y: 7,
        expr: "x / (y - 7)".to_owned(),
        source: EvalError::new(EvalErrorKind::DivisionByZero, "(x / (y - 7))"),
    };
    let msg = err.to_string();
    assert!(msg.contains("green"));
    assert!(msg.contains("x = 3"));
    assert!(msg.contains("y = 7"));
    assert!(msg.contains("x / (y - 7)"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ImgverbError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
