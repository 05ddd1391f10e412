//! Frame timing: duration normalisation and constant/variable rate analysis.
//!
//! GIF frames each carry their own delay, so an animation may play at a
//! steady rate or vary frame to frame. [`GifTimingAnalysis`] summarises a
//! duration sequence the same way regardless of where it came from.
//!
//! # Example
//!
//! ```
//! use framestitch::GifTimingAnalysis;
//!
//! let analysis = GifTimingAnalysis::from_durations(&[40, 40, 120, 40]);
//! assert_eq!(analysis.total_duration_ms, 240);
//! assert!(analysis.is_variable_frame_rate);
//! ```

use crate::configuration::DurationPolicy;

/// Replace every unusable raw duration with the policy's fallback.
///
/// Values that are zero, negative, or larger than `u32::MAX` are treated
/// as missing.
pub fn normalize_durations(raw_ms: &[i64], policy: DurationPolicy) -> Vec<u32> {
    let fallback = policy.fallback_ms.max(1);
    let mut coerced = 0usize;

    let durations: Vec<u32> = raw_ms
        .iter()
        .map(|&value| match u32::try_from(value) {
            Ok(ms) if ms > 0 => ms,
            _ => {
                coerced += 1;
                fallback
            }
        })
        .collect();

    if coerced > 0 {
        log::warn!(
            "{coerced} of {} frame durations were missing or non-positive; using {fallback} ms",
            raw_ms.len()
        );
    }
    durations
}

/// Timing summary of a frame-duration sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct GifTimingAnalysis {
    /// Number of frames analysed.
    pub frame_count: usize,
    /// Sum of all frame durations in milliseconds.
    pub total_duration_ms: u64,
    /// Mean frame duration in milliseconds.
    pub mean_frame_duration_ms: f64,
    /// Standard deviation of frame durations in milliseconds.
    pub frame_duration_stddev_ms: f64,
    /// Slowest instantaneous rate (from the longest frame).
    pub min_frames_per_second: f64,
    /// Fastest instantaneous rate (from the shortest frame).
    pub max_frames_per_second: f64,
    /// Effective rate over the whole animation.
    pub mean_frames_per_second: f64,
    /// `true` when the stddev exceeds 10% of the mean frame duration.
    pub is_variable_frame_rate: bool,
}

impl GifTimingAnalysis {
    /// Analyse a sequence of per-frame durations in milliseconds.
    ///
    /// Zero-length frames are counted but ignored for rate statistics. An
    /// empty or all-zero sequence produces zeroed statistics.
    pub fn from_durations(durations_ms: &[u32]) -> Self {
        let total_duration_ms: u64 = durations_ms.iter().map(|&d| u64::from(d)).sum();
        let positive: Vec<f64> = durations_ms
            .iter()
            .filter(|&&d| d > 0)
            .map(|&d| f64::from(d))
            .collect();

        if positive.is_empty() {
            return Self {
                frame_count: durations_ms.len(),
                total_duration_ms,
                mean_frame_duration_ms: 0.0,
                frame_duration_stddev_ms: 0.0,
                min_frames_per_second: 0.0,
                max_frames_per_second: 0.0,
                mean_frames_per_second: 0.0,
                is_variable_frame_rate: false,
            };
        }

        let mean = positive.iter().sum::<f64>() / positive.len() as f64;
        let variance =
            positive.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / positive.len() as f64;
        let stddev = variance.sqrt();

        let shortest = positive.iter().copied().fold(f64::INFINITY, f64::min);
        let longest = positive.iter().copied().fold(0.0_f64, f64::max);

        let max_fps = 1000.0 / shortest;
        let min_fps = 1000.0 / longest;
        // 1000/mean can land a hair outside [min, max] through rounding.
        let mean_fps = (1000.0 / mean).clamp(min_fps, max_fps);

        Self {
            frame_count: durations_ms.len(),
            total_duration_ms,
            mean_frame_duration_ms: mean,
            frame_duration_stddev_ms: stddev,
            min_frames_per_second: min_fps,
            max_frames_per_second: max_fps,
            mean_frames_per_second: mean_fps,
            is_variable_frame_rate: (stddev / mean) > 0.10,
        }
    }
}
