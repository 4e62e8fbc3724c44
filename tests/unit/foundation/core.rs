use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_ffmpeg_arg_forms() {
    assert_eq!(Fps::new(30, 1).unwrap().to_ffmpeg_arg(), "30");
    assert_eq!(Fps::new(30000, 1001).unwrap().to_ffmpeg_arg(), "30000/1001");
    assert!((Fps::new(60, 2).unwrap().as_f64() - 30.0).abs() < 1e-12);
}

#[test]
fn channel_indices_follow_rgba_order() {
    let idx: Vec<usize> = Channel::ALL.iter().map(|c| c.index()).collect();
    assert_eq!(idx, vec![0, 1, 2, 3]);
    assert_eq!(Channel::Alpha.to_string(), "alpha");
}
