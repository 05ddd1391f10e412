//! Numbered frame listing and left/right pairing tests.

use std::path::Path;

use framestitch::{FramestitchError, PairingSummary, list_frames, pair_frames};
use image::{Rgb, RgbImage};

fn write_frames(directory: &Path, names: &[&str]) {
    std::fs::create_dir_all(directory).expect("create frame dir");
    for name in names {
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]))
            .save(directory.join(name))
            .expect("write frame");
    }
}

#[test]
fn frames_sort_numerically() {
    let root = tempfile::tempdir().expect("tempdir");
    write_frames(root.path(), &["10.png", "2.png", "0.png", "1.PNG"]);

    let frames = list_frames(root.path()).expect("list");
    let indices: Vec<u64> = frames.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 10]);
}

#[test]
fn non_frame_files_are_ignored() {
    let root = tempfile::tempdir().expect("tempdir");
    write_frames(root.path(), &["0.png", "1.png"]);
    std::fs::write(root.path().join("notes.txt"), "not a frame").expect("write");
    std::fs::create_dir(root.path().join("2.png")).expect("mkdir");

    let frames = list_frames(root.path()).expect("list");
    assert_eq!(frames.len(), 2);
}

#[test]
fn non_numeric_frame_name_is_validation_error() {
    let root = tempfile::tempdir().expect("tempdir");
    write_frames(root.path(), &["0.png", "frame_1.png"]);

    let error = list_frames(root.path()).unwrap_err();
    assert!(matches!(error, FramestitchError::ValidationError(_)));
    assert!(error.to_string().contains("must be numeric"), "{error}");
}

#[test]
fn missing_directory_is_not_found() {
    let root = tempfile::tempdir().expect("tempdir");
    let error = list_frames(root.path().join("nope")).unwrap_err();
    assert!(matches!(error, FramestitchError::NotFound { .. }));
}

#[test]
fn empty_directory_is_not_found() {
    let root = tempfile::tempdir().expect("tempdir");
    let error = list_frames(root.path()).unwrap_err();
    assert!(matches!(error, FramestitchError::NotFound { .. }));
    assert!(error.to_string().contains("no frames found"), "{error}");
}

#[test]
fn strict_pairing_reports_both_sides() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &["0.png", "1.png", "2.png"]);
    write_frames(&right, &["1.png", "2.png", "3.png"]);

    let left = list_frames(&left).expect("left");
    let right = list_frames(&right).expect("right");

    let message = pair_frames(&left, &right, true).unwrap_err().to_string();
    assert!(message.contains("Missing in left: [3]"), "{message}");
    assert!(message.contains("Missing in right: [0]"), "{message}");

    let pairs = pair_frames(&left, &right, false).expect("lenient pairing");
    let indices: Vec<u64> = pairs.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert!(pairs[0].left.ends_with("left/1.png"));
    assert!(pairs[0].right.ends_with("right/1.png"));
}

#[test]
fn strict_pairing_message_truncates_long_lists() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    let left_names: Vec<String> = (0..30).map(|i| format!("{i}.png")).collect();
    let left_refs: Vec<&str> = left_names.iter().map(String::as_str).collect();
    write_frames(&left, &left_refs);
    write_frames(&right, &["0.png"]);

    let left = list_frames(&left).expect("left");
    let right = list_frames(&right).expect("right");
    let message = pair_frames(&left, &right, true).unwrap_err().to_string();

    assert!(message.contains("20]..."), "{message}");
    assert!(!message.contains("21"), "{message}");
}

#[test]
fn disjoint_sequences_have_no_pairs() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &["0.png"]);
    write_frames(&right, &["5.png"]);

    let left = list_frames(&left).expect("left");
    let right = list_frames(&right).expect("right");
    let error = pair_frames(&left, &right, false).unwrap_err();
    assert!(error.to_string().contains("no matching left/right frames"), "{error}");

    let summary = PairingSummary::from_frames(&left, &right);
    assert!(summary.pairs.is_empty());
    assert_eq!(summary.missing_left, vec![5]);
    assert_eq!(summary.missing_right, vec![0]);
    assert!(!summary.is_complete());
}
