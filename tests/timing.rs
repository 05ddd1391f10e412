//! Frame timing tests: duration normalisation and rate analysis.

use framestitch::{DEFAULT_FRAME_DURATION_MS, DurationPolicy, GifTimingAnalysis, normalize_durations};

#[test]
fn normalize_replaces_non_positive_with_default() {
    let durations = normalize_durations(&[100, 0, -20, 40], DurationPolicy::default());
    assert_eq!(durations, vec![100, DEFAULT_FRAME_DURATION_MS, DEFAULT_FRAME_DURATION_MS, 40]);
}

#[test]
fn normalize_honours_custom_fallback() {
    let policy = DurationPolicy::new(50);
    assert_eq!(normalize_durations(&[0, 0], policy), vec![50, 50]);
}

#[test]
fn normalize_treats_overflow_as_missing() {
    let durations = normalize_durations(&[i64::MAX, 10], DurationPolicy::new(25));
    assert_eq!(durations, vec![25, 10]);
}

#[test]
fn fallback_is_never_zero() {
    assert_eq!(DurationPolicy::new(0).fallback_ms, 1);
}

#[test]
fn constant_rate_analysis() {
    let analysis = GifTimingAnalysis::from_durations(&[40; 25]);

    assert_eq!(analysis.frame_count, 25);
    assert_eq!(analysis.total_duration_ms, 1000);
    assert!(!analysis.is_variable_frame_rate);
    assert!((analysis.mean_frames_per_second - 25.0).abs() < 1e-9);
    assert_eq!(analysis.min_frames_per_second, analysis.max_frames_per_second);
    assert_eq!(analysis.frame_duration_stddev_ms, 0.0);
}

#[test]
fn variable_rate_analysis() {
    let analysis = GifTimingAnalysis::from_durations(&[20, 20, 200, 20]);

    assert!(analysis.is_variable_frame_rate);
    assert!((analysis.max_frames_per_second - 50.0).abs() < 1e-9);
    assert!((analysis.min_frames_per_second - 5.0).abs() < 1e-9);
    assert!(analysis.min_frames_per_second <= analysis.mean_frames_per_second);
    assert!(analysis.mean_frames_per_second <= analysis.max_frames_per_second);
}

#[test]
fn empty_analysis_is_zeroed() {
    let analysis = GifTimingAnalysis::from_durations(&[]);
    assert_eq!(analysis.frame_count, 0);
    assert_eq!(analysis.total_duration_ms, 0);
    assert_eq!(analysis.mean_frames_per_second, 0.0);
    assert!(!analysis.is_variable_frame_rate);
}
