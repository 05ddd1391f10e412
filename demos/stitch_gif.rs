//! Stitch two numbered frame sequences into a side-by-side GIF, printing
//! progress as pairs are composed.
//!
//! Usage:
//!   cargo run --example stitch_gif -- <left_dir> <right_dir> [output.gif]

use std::error::Error;
use std::sync::Arc;

use framestitch::{
    JobOptions, ProgressCallback, ProgressInfo, StitchOptions, build_side_by_side_gif_with_options,
    validate_sequences,
};

struct PrintProgress;

impl ProgressCallback for PrintProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        let pct = info
            .percentage
            .map_or("??".to_string(), |p| format!("{p:.1}"));
        println!(
            "[{:?}] {}/{} ({pct}%)",
            info.operation,
            info.current,
            info.total.map_or("?".to_string(), |t| t.to_string()),
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let left = args.next().unwrap_or_else(|| "left/rgb".to_string());
    let right = args.next().unwrap_or_else(|| "right/rgb".to_string());
    let output = args.next().unwrap_or_else(|| "stitched.gif".to_string());

    let report = validate_sequences(&left, &right);
    print!("{report}");
    if !report.is_valid() {
        return Err("sequences cannot be stitched".into());
    }

    let options = StitchOptions::new().fps(10.0).scale(0.5).strict(false);
    let job = JobOptions::new()
        .with_progress(Arc::new(PrintProgress))
        .with_batch_size(10);
    let summary = build_side_by_side_gif_with_options(&left, &right, &output, &options, &job)?;

    println!(
        "Wrote {output}: {} frames at {}x{}",
        summary.frame_count, summary.width, summary.height
    );
    Ok(())
}
