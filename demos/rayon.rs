//! Parallel pair stitching example (feature = "rayon").
//!
//! Usage:
//!   cargo run --features=rayon --example rayon -- <left_dir> <right_dir>

use std::error::Error;
use std::time::Instant;

use framestitch::{StitchOptions, build_side_by_side_gif};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let left = args.next().unwrap_or_else(|| "left/rgb".to_string());
    let right = args.next().unwrap_or_else(|| "right/rgb".to_string());

    println!("Stitching pairs across {} threads...", rayon::current_num_threads());
    let start = Instant::now();
    let summary = build_side_by_side_gif(&left, &right, "parallel.gif", &StitchOptions::new())?;
    let elapsed = start.elapsed();

    println!(
        "Stitched {} frames in {elapsed:.2?} ({:.1} fps)",
        summary.frame_count,
        summary.frame_count as f64 / elapsed.as_secs_f64(),
    );
    println!("Saved parallel.gif");
    Ok(())
}
