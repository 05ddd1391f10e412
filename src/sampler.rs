//! Time-based frame sampling.
//!
//! Down-sampling an animation by keeping "every Nth frame" is wrong as soon
//! as source frames carry different display durations, which is common in
//! GIFs. [`sample_indices_by_time`] instead walks the cumulative-duration
//! timeline of the source and, at each evenly spaced output instant, picks
//! the source frame that is on screen at that moment.
//!
//! # Example
//!
//! ```
//! use framestitch::sample_indices_by_time;
//!
//! // Five 100 ms frames (10 fps) resampled to 5 fps.
//! let indices = sample_indices_by_time(&[100, 100, 100, 100, 100], 5.0)?;
//! assert_eq!(indices, vec![0, 2, 4]);
//! # Ok::<(), framestitch::FramestitchError>(())
//! ```

use crate::error::FramestitchError;

/// Select the source frames visible at each sample time of `target_fps`.
///
/// Sample times are `t = k * (1000 / target_fps)` milliseconds for
/// `k = 0, 1, 2, ...` while `t` is below the total duration. For each
/// sample time the first frame whose cumulative end-time is strictly
/// greater than `t` is chosen, so a sample landing exactly on a frame
/// boundary selects the frame that starts there.
///
/// Consecutive duplicates (which appear when `target_fps` exceeds the
/// source rate over some span) are collapsed; the result is otherwise in
/// source order and every index is below `durations_ms.len()`.
///
/// Empty input, or input whose durations sum to zero, yields `[0]` so that
/// callers always have at least one frame to emit.
///
/// # Errors
///
/// Returns [`FramestitchError::InvalidArgument`] if `target_fps` is not a
/// finite positive number.
pub fn sample_indices_by_time(
    durations_ms: &[u32],
    target_fps: f64,
) -> Result<Vec<usize>, FramestitchError> {
    let step_ms = frame_step_ms(target_fps)?;

    let mut ends = Vec::with_capacity(durations_ms.len());
    let mut accumulated: u64 = 0;
    for &duration in durations_ms {
        accumulated += u64::from(duration);
        ends.push(accumulated);
    }

    let total_ms = accumulated as f64;
    if accumulated == 0 {
        return Ok(vec![0]);
    }

    let frame_count = ends.len();
    let mut indices: Vec<usize> = Vec::new();
    let mut cursor = 0usize;
    let mut sample: u64 = 0;

    loop {
        // Multiplying instead of accumulating keeps long walks from drifting.
        let time = sample as f64 * step_ms;
        if time >= total_ms {
            break;
        }
        while cursor < frame_count && ends[cursor] as f64 <= time {
            cursor += 1;
        }
        if cursor >= frame_count {
            break;
        }
        if indices.last() != Some(&cursor) {
            indices.push(cursor);
        }
        // Every sample before `ends[cursor]` lands on the same frame. Skip to
        // one step short of it and let the loop settle the boundary itself,
        // so ties still go through the `<=` comparison above.
        let boundary = (ends[cursor] as f64 / step_ms).floor() as u64;
        sample = (sample + 1).max(boundary.saturating_sub(1));
    }

    if indices.is_empty() {
        indices.push(0);
    }

    Ok(indices)
}

/// Constant per-frame delay, in milliseconds, for output at `target_fps`.
///
/// Computed as `round(1000 / target_fps)` and never less than 1 ms.
///
/// # Errors
///
/// Returns [`FramestitchError::InvalidArgument`] if `target_fps` is not a
/// finite positive number.
pub fn output_frame_delay_ms(target_fps: f64) -> Result<u32, FramestitchError> {
    let step_ms = frame_step_ms(target_fps)?;
    Ok((step_ms.round() as u32).max(1))
}

fn frame_step_ms(target_fps: f64) -> Result<f64, FramestitchError> {
    if !target_fps.is_finite() || target_fps <= 0.0 {
        return Err(FramestitchError::InvalidArgument(format!(
            "target frame rate must be > 0 (got {target_fps})"
        )));
    }
    Ok(1000.0 / target_fps)
}
