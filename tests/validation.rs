//! Sequence validation tests.

use std::path::Path;

use framestitch::{ValidationReport, validate_sequences};
use image::RgbImage;

fn write_frames(directory: &Path, indices: &[u64]) {
    std::fs::create_dir_all(directory).expect("create dir");
    for index in indices {
        RgbImage::new(2, 2)
            .save(directory.join(format!("{index}.png")))
            .expect("write frame");
    }
}

#[test]
fn matching_sequences_are_valid() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &[0, 1, 2]);
    write_frames(&right, &[0, 1, 2]);

    let report = validate_sequences(&left, &right);
    assert!(report.is_valid(), "{report}");
    assert!(report.warnings.is_empty(), "{report}");
    assert!(report.info.iter().any(|s| s.contains("3 matching pairs")));
}

#[test]
fn unmatched_frames_are_warnings() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &[0, 1, 2, 3]);
    write_frames(&right, &[0, 1]);

    let report = validate_sequences(&left, &right);
    assert!(report.is_valid());
    assert!(
        report
            .warnings
            .iter()
            .any(|s| s.contains("missing on the right"))
    );
}

#[test]
fn numbering_gaps_are_flagged() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &[0, 1, 5]);
    write_frames(&right, &[0, 1, 5]);

    let report = validate_sequences(&left, &right);
    assert!(report.is_valid());
    assert!(report.warnings.iter().any(|s| s.contains("gaps")));
}

#[test]
fn numbering_across_the_full_index_range() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &[0, u64::MAX]);
    write_frames(&right, &[0, u64::MAX]);

    let report = validate_sequences(&left, &right);
    assert!(report.is_valid(), "{report}");
    assert!(report.warnings.iter().any(|s| s.contains("gaps")));
}

#[test]
fn missing_directory_is_an_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    write_frames(&left, &[0]);

    let report = validate_sequences(&left, root.path().join("right"));
    assert!(!report.is_valid());
    assert!(report.errors.iter().any(|s| s.starts_with("Right:")));
    assert!(format!("{report}").contains("[ERROR]"));
}

#[test]
fn disjoint_sequences_are_an_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &[0, 1]);
    write_frames(&right, &[7, 8]);

    let report = validate_sequences(&left, &right);
    assert!(!report.is_valid());
}

#[test]
fn empty_report_display() {
    let report = ValidationReport::default();
    assert!(report.is_valid());
    assert_eq!(report.issue_count(), 0);
    assert_eq!(format!("{report}"), "No issues found.\n");
}

#[test]
fn is_valid_only_depends_on_errors() {
    let report = ValidationReport {
        info: vec!["some info".to_string()],
        warnings: vec!["some warning".to_string()],
        errors: vec![],
    };
    assert!(report.is_valid());
    assert_eq!(report.issue_count(), 2);

    let bad_report = ValidationReport {
        info: vec![],
        warnings: vec![],
        errors: vec!["fatal problem".to_string()],
    };
    assert!(!bad_report.is_valid());
}

#[test]
fn padded_names_warn_about_video_output() {
    let root = tempfile::tempdir().expect("tempdir");
    let left = root.path().join("left");
    let right = root.path().join("right");
    write_frames(&left, &[0, 1]);
    std::fs::create_dir_all(&right).expect("create dir");
    for name in ["000.png", "001.png"] {
        RgbImage::new(2, 2).save(right.join(name)).expect("write frame");
    }

    let report = validate_sequences(&left, &right);
    assert!(report.is_valid(), "{report}");
    assert!(
        report
            .warnings
            .iter()
            .any(|s| s.starts_with("Right:") && s.contains("MP4"))
    );
}
