//! Resample an animated GIF to a new frame rate.
//!
//! Usage:
//!   cargo run --example convert_fps -- <input.gif> [target_fps]

use std::error::Error;

use framestitch::{
    DurationPolicy, GifTimingAnalysis, ResampleOptions, convert_gif_fps, decode_gif,
    default_resample_output,
};

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| "input.gif".to_string());
    let target_fps: f64 = args.next().map_or(Ok(12.0), |s| s.parse())?;

    // ── Source timing ──────────────────────────────────────────────
    let decoded = decode_gif(&input_path, DurationPolicy::default())?;
    let timing = GifTimingAnalysis::from_durations(&decoded.durations_ms);
    println!(
        "{input_path}: {} frames, {} ms, {:.2} fps mean{}",
        timing.frame_count,
        timing.total_duration_ms,
        timing.mean_frames_per_second,
        if timing.is_variable_frame_rate {
            " (variable)"
        } else {
            ""
        },
    );

    // ── Resample ───────────────────────────────────────────────────
    let output_path = default_resample_output(&input_path, target_fps);
    let summary = convert_gif_fps(&input_path, &output_path, &ResampleOptions::new(target_fps))?;

    println!(
        "Wrote {} ({} -> {} frames, {} ms per frame)",
        output_path.display(),
        summary.source_frames,
        summary.output_frames,
        summary.frame_delay_ms,
    );
    Ok(())
}
