use super::*;
use crate::expression::error::EvalErrorKind;
use crate::expression::program::ChannelSources;

fn programs(red: &str, green: &str, blue: &str, alpha: &str) -> ChannelPrograms {
    ChannelPrograms::parse(&ChannelSources {
        red: red.to_owned(),
        green: green.to_owned(),
        blue: blue.to_owned(),
        alpha: alpha.to_owned(),
    })
    .unwrap()
}

fn gradient(width: u32, height: u32) -> FrameRGBA {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 77, 200]);
        }
    }
    FrameRGBA::from_raw(width, height, data).unwrap()
}

#[test]
fn blend_rounds_half_away_from_zero() {
    assert_eq!(blend_channel(0.5, 100, 255), 178);
    assert_eq!(blend_channel(0.5, 200, 255), 228);
    assert_eq!(blend_channel(1.0, 13, 255), 13);
    assert_eq!(blend_channel(0.0, 13, 255), 255);
}

#[test]
fn ratio_one_reproduces_source() {
    let src = gradient(6, 4);
    let out = composite_frame(&src, &programs("0", "0", "0", "0"), None, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn ratio_zero_reproduces_narrowed_expressions() {
    let src = gradient(6, 4);
    let p = programs("x * 50", "y - 1", "300", "255");
    let out = composite_frame(&src, &p, None, 0.0).unwrap();
    for y in 0..4u32 {
        for x in 0..6u32 {
            let expected = [
                ((x * 50) as i64) as u8,
                ((y as i64) - 1) as u8,
                44,
                255,
            ];
            assert_eq!(out.pixel(x, y), expected, "pixel ({x},{y})");
        }
    }
}

#[test]
fn half_ratio_two_pixel_frame() {
    let src = FrameRGBA::from_raw(2, 1, vec![100, 100, 100, 255, 200, 200, 200, 255]).unwrap();
    let out = composite_frame(&src, &programs("255", "255", "255", "255"), None, 0.5).unwrap();
    assert_eq!(out.pixel(0, 0), [178, 178, 178, 255]);
    assert_eq!(out.pixel(1, 0), [228, 228, 228, 255]);
}

#[test]
fn warp_changes_sample_coordinates_not_source_pixel() {
    let src = gradient(3, 3);
    let flat = Warp {
        amplitude: 0.0,
        frequency: 0.0,
        phase: 0.0,
    };
    let out = composite_frame(&src, &programs("x", "y", "0", "255"), Some(flat), 0.0).unwrap();
    // Zero warp swaps the coordinates the expressions see.
    assert_eq!(out.pixel(2, 0), [0, 2, 0, 255]);
    assert_eq!(out.pixel(0, 1), [1, 0, 0, 255]);

    let out = composite_frame(&src, &programs("x", "y", "0", "255"), Some(flat), 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn failure_reports_first_pixel_in_raster_order() {
    let src = gradient(5, 4);
    // Fails wherever x == 2 or y == 3; the first such pixel in raster order is (2, 0).
    let p = programs("255 / ((x - 2) * (y - 3))", "0", "0", "0");
    let err = composite_frame(&src, &p, None, 0.5).unwrap_err();
    match err {
        ImgverbError::Evaluation {
            channel,
            x,
            y,
            expr,
            source,
        } => {
            assert_eq!(channel, Channel::Red);
            assert_eq!((x, y), (2, 0));
            assert_eq!(expr, "255 / ((x - 2) * (y - 3))");
            assert_eq!(source.kind, EvalErrorKind::DivisionByZero);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn failure_reports_original_pixel_not_sample_coordinates() {
    let src = gradient(4, 4);
    let flat = Warp {
        amplitude: 0.0,
        frequency: 0.0,
        phase: 0.0,
    };
    // Expressions see swapped coordinates, so `1 / (y - 2)` first fails at output (2, 0).
    let p = programs("0", "0", "0", "1 / (y - 2)");
    let err = composite_frame(&src, &p, Some(flat), 0.0).unwrap_err();
    assert!(matches!(
        err,
        ImgverbError::Evaluation {
            channel: Channel::Alpha,
            x: 2,
            y: 0,
            ..
        }
    ));
}

#[test]
fn empty_frame_is_passed_through() {
    let src = FrameRGBA::from_raw(0, 0, Vec::new()).unwrap();
    let out = composite_frame(&src, &programs("q", "q", "q", "q"), None, 0.0).unwrap();
    assert_eq!(out.data.len(), 0);
}
