use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("imgverb-unit").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn index_suffix_splits_on_last_underscore() {
    assert_eq!(frame_index_suffix("clip_0007"), Some(("clip", "0007")));
    assert_eq!(frame_index_suffix("my_clip_12"), Some(("my_clip", "12")));
    assert_eq!(frame_index_suffix("clip"), None);
    assert_eq!(frame_index_suffix("clip_"), None);
    assert_eq!(frame_index_suffix("_001"), None);
    assert_eq!(frame_index_suffix("clip_01a"), None);
}

#[test]
fn processed_names_carry_marker_and_extension() {
    assert_eq!(
        processed_frame_name("clip", "0007", FrameFormat::Png),
        "clip_fx_0007.png"
    );
    assert_eq!(
        processed_frame_name("clip", "12", FrameFormat::Jpg),
        "clip_fx_12.jpg"
    );
}

#[test]
fn format_parses_case_insensitively() {
    assert_eq!("PNG".parse::<FrameFormat>().unwrap(), FrameFormat::Png);
    assert_eq!("jpeg".parse::<FrameFormat>().unwrap(), FrameFormat::Jpg);
    assert!("bmp".parse::<FrameFormat>().is_err());
}

#[test]
fn list_frames_sorts_and_filters() {
    let dir = scratch_dir("list_frames");
    for name in [
        "clip_0003.png",
        "clip_0001.png",
        "clip_0002.png",
        "clip_fx_0001.png",
        "clip_0004.jpg",
        "notes.txt",
        "cover.png",
    ] {
        std::fs::write(dir.join(name), b"").unwrap();
    }
    std::fs::create_dir_all(dir.join("nested_0005.png")).unwrap();

    let frames = list_frames(&dir, FrameFormat::Png).unwrap();
    let names: Vec<_> = frames
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, ["clip_0001.png", "clip_0002.png", "clip_0003.png"]);
    assert_eq!(frames[0].stem, "clip");
    assert_eq!(frames[0].index, "0001");
    assert_eq!(frames[0].processed_name(FrameFormat::Png), "clip_fx_0001.png");

    let jpgs = list_frames(&dir, FrameFormat::Jpg).unwrap();
    assert_eq!(jpgs.len(), 1);
}

#[test]
fn list_frames_errors_on_missing_dir() {
    assert!(list_frames(Path::new("target/imgverb-unit/no-such-dir"), FrameFormat::Png).is_err());
}

#[test]
fn png_round_trip_keeps_alpha() {
    let dir = scratch_dir("png_round_trip");
    let frame = FrameRGBA::from_raw(2, 1, vec![10, 20, 30, 40, 250, 240, 230, 128]).unwrap();
    let path = dir.join("f_001.png");
    save_frame(&path, &frame, FrameFormat::Png).unwrap();
    assert_eq!(load_frame(&path).unwrap(), frame);
}

#[test]
fn jpeg_save_drops_alpha() {
    let dir = scratch_dir("jpeg_alpha");
    let frame = FrameRGBA::filled(8, 8, [120, 60, 200, 10]);
    let path = dir.join("f_001.jpg");
    save_frame(&path, &frame, FrameFormat::Jpg).unwrap();
    let back = load_frame(&path).unwrap();
    assert_eq!((back.width, back.height), (8, 8));
    assert!(back.data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn load_frame_reports_media_error() {
    let dir = scratch_dir("bad_image");
    let path = dir.join("broken_001.png");
    std::fs::write(&path, b"not a png").unwrap();
    assert!(matches!(load_frame(&path), Err(ImgverbError::Media(_))));
}

#[test]
fn prepare_dir_creates_and_cleans() {
    let dir = scratch_dir("prepare").join("work");
    prepare_dir(&dir, false).unwrap();
    assert!(dir.is_dir());

    std::fs::write(dir.join("stale.png"), b"x").unwrap();
    std::fs::create_dir_all(dir.join("sub")).unwrap();
    prepare_dir(&dir, false).unwrap();
    assert!(dir.join("stale.png").exists());

    prepare_dir(&dir, true).unwrap();
    assert!(dir.is_dir());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn list_frames_orders_by_numeric_index_past_four_digits() {
    let dir = scratch_dir("numeric_order");
    for name in [
        "clip_10001.png",
        "clip_9999.png",
        "clip_10000.png",
        "clip_9998.png",
    ] {
        std::fs::write(dir.join(name), b"").unwrap();
    }
    let indices: Vec<_> = list_frames(&dir, FrameFormat::Png)
        .unwrap()
        .into_iter()
        .map(|f| f.index)
        .collect();
    assert_eq!(indices, ["9998", "9999", "10000", "10001"]);
}

#[test]
fn stems_containing_fx_are_not_mistaken_for_processed_frames() {
    let dir = scratch_dir("fx_in_stem");
    for name in ["my_fx_clip_0001.png", "my_fx_clip_fx_0001.png", "fx_0002.png"] {
        std::fs::write(dir.join(name), b"").unwrap();
    }
    let frames = list_frames(&dir, FrameFormat::Png).unwrap();
    let stems: Vec<_> = frames.iter().map(|f| f.stem.as_str()).collect();
    assert_eq!(stems, ["fx", "my_fx_clip"]);
    assert_eq!(
        frames[1].processed_name(FrameFormat::Png),
        "my_fx_clip_fx_0001.png"
    );
}
