//! Progress reporting and cancellation tests.

use std::path::Path;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use framestitch::{
    CancellationToken, FramestitchError, GifOptions, JobOptions, OperationType,
    ProgressCallback, ProgressInfo, ResampleOptions, StitchOptions,
    build_side_by_side_gif_with_options, convert_gif_fps_with_options, encode_gif,
};
use image::{DynamicImage, Rgb, RgbImage};

#[derive(Default)]
struct Recorder {
    calls: AtomicU64,
    last: Mutex<Option<ProgressInfo>>,
}

impl ProgressCallback for Recorder {
    fn on_progress(&self, info: &ProgressInfo) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last.lock() {
            *last = Some(info.clone());
        }
    }
}

fn write_pairs(root: &Path, count: u64) {
    for side in ["left", "right"] {
        let directory = root.join(side);
        std::fs::create_dir_all(&directory).expect("create dir");
        for index in 0..count {
            RgbImage::from_pixel(4, 4, Rgb([1, 2, 3]))
                .save(directory.join(format!("{index}.png")))
                .expect("write frame");
        }
    }
}

/// Five 100 ms frames, so 5 fps keeps frames 0, 2 and 4.
fn write_source_gif(path: &Path) {
    let frames: Vec<DynamicImage> = (0..5u8)
        .map(|shade| {
            DynamicImage::ImageRgb8(RgbImage::from_pixel(6, 4, Rgb([shade * 50, 0, 0])))
        })
        .collect();
    encode_gif(path, &frames, &GifOptions::new().frame_delay_ms(100)).expect("write source gif");
}

#[test]
fn callback_sees_every_pair_and_a_final_report() {
    let root = tempfile::tempdir().expect("tempdir");
    write_pairs(root.path(), 3);
    let recorder = Arc::new(Recorder::default());
    let job = JobOptions::new().with_progress(recorder.clone());

    build_side_by_side_gif_with_options(
        root.path().join("left"),
        root.path().join("right"),
        root.path().join("out.gif"),
        &StitchOptions::new(),
        &job,
    )
    .expect("build");

    assert_eq!(recorder.calls.load(Ordering::SeqCst), 4);
    let last = recorder.last.lock().unwrap().clone().expect("final report");
    assert_eq!(last.operation, OperationType::Stitching);
    assert_eq!(last.current, 3);
    assert_eq!(last.total, Some(3));
    assert_eq!(last.percentage, Some(100.0));
}

#[test]
fn batch_size_reduces_callbacks() {
    let root = tempfile::tempdir().expect("tempdir");
    write_pairs(root.path(), 4);
    let recorder = Arc::new(Recorder::default());
    let job = JobOptions::new()
        .with_progress(recorder.clone())
        .with_batch_size(2);

    build_side_by_side_gif_with_options(
        root.path().join("left"),
        root.path().join("right"),
        root.path().join("out.gif"),
        &StitchOptions::new(),
        &job,
    )
    .expect("build");

    // Two batch reports plus the final one.
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn cancelled_job_stops() {
    let root = tempfile::tempdir().expect("tempdir");
    write_pairs(root.path(), 3);
    let token = CancellationToken::new();
    token.cancel();
    let job = JobOptions::new().with_cancellation(token);
    let output = root.path().join("out.gif");

    let result = build_side_by_side_gif_with_options(
        root.path().join("left"),
        root.path().join("right"),
        &output,
        &StitchOptions::new(),
        &job,
    );
    assert!(matches!(result, Err(FramestitchError::Cancelled)));
    assert!(!output.exists());
}

#[test]
fn token_clones_share_state() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());
    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn batch_size_is_clamped() {
    let job = JobOptions::new().with_batch_size(0);
    assert!(format!("{job:?}").contains("batch_size: 1"));
}

#[test]
fn resample_reports_each_encoded_frame() {
    let root = tempfile::tempdir().expect("tempdir");
    let input = root.path().join("source.gif");
    write_source_gif(&input);
    let recorder = Arc::new(Recorder::default());
    let job = JobOptions::new().with_progress(recorder.clone());

    let summary = convert_gif_fps_with_options(
        &input,
        root.path().join("out.gif"),
        &ResampleOptions::new(5.0),
        &job,
    )
    .expect("resample");

    assert_eq!(summary.output_frames, 3);
    // One report per frame plus the final one.
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 4);
    let last = recorder.last.lock().unwrap().clone().expect("final report");
    assert_eq!(last.operation, OperationType::FrameSelection);
    assert_eq!(last.current, summary.output_frames as u64);
    assert_eq!(last.total, Some(summary.output_frames as u64));
    assert_eq!(last.percentage, Some(100.0));
}

#[test]
fn cancelled_resample_writes_nothing() {
    let root = tempfile::tempdir().expect("tempdir");
    let input = root.path().join("source.gif");
    write_source_gif(&input);
    let token = CancellationToken::new();
    token.cancel();
    let job = JobOptions::new().with_cancellation(token);
    let output = root.path().join("out.gif");

    let result = convert_gif_fps_with_options(&input, &output, &ResampleOptions::new(5.0), &job);
    assert!(matches!(result, Err(FramestitchError::Cancelled)));
    assert!(!output.exists());
}

/// Cancels the shared token as soon as the first frame is reported.
struct CancelOnFirstReport {
    token: CancellationToken,
}

impl ProgressCallback for CancelOnFirstReport {
    fn on_progress(&self, _info: &ProgressInfo) {
        self.token.cancel();
    }
}

#[test]
fn resample_cancelled_mid_encode_writes_nothing() {
    let root = tempfile::tempdir().expect("tempdir");
    let input = root.path().join("source.gif");
    write_source_gif(&input);
    let token = CancellationToken::new();
    let job = JobOptions::new()
        .with_progress(Arc::new(CancelOnFirstReport {
            token: token.clone(),
        }))
        .with_cancellation(token);
    let output = root.path().join("out.gif");

    let result = convert_gif_fps_with_options(&input, &output, &ResampleOptions::new(5.0), &job);
    assert!(matches!(result, Err(FramestitchError::Cancelled)));
    assert!(!output.exists());
}
