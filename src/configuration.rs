//! Default constants and per-run job settings.
//!
//! The constants are the defaults of the three CLI jobs and of the option
//! structs that mirror them. [`DurationPolicy`] decides what a GIF frame
//! with a missing delay is worth, and [`JobOptions`] carries progress
//! reporting and cancellation into the frame loops.
//!
//! ```
//! use framestitch::{CancellationToken, JobOptions};
//!
//! let stop = CancellationToken::new();
//! let job = JobOptions::new().with_cancellation(stop.clone()).with_batch_size(25);
//! stop.cancel();
//! # let _ = job;
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Duration assumed for a GIF frame with a missing or non-positive delay
/// (roughly 30 fps).
pub const DEFAULT_FRAME_DURATION_MS: u32 = 33;

/// Default output frame rate for GIF jobs.
pub const DEFAULT_GIF_FPS: f64 = 12.0;

/// Default output frame rate for MP4 jobs.
pub const DEFAULT_VIDEO_FPS: f64 = 30.0;

/// Default output height, in pixels, for MP4 jobs.
pub const DEFAULT_VIDEO_HEIGHT: u32 = 480;

/// Default H.264 constant rate factor (lower is better quality).
pub const DEFAULT_CRF: u8 = 28;

/// Highest CRF value accepted by libx264.
pub const MAX_CRF: u8 = 51;

/// Default libx264 preset.
pub const DEFAULT_PRESET: &str = "slow";

/// Environment variable consulted for the `ffmpeg` executable path.
pub const FFMPEG_ENV_VAR: &str = "FRAMESTITCH_FFMPEG";

/// Policy applied to raw per-frame durations before sampling.
///
/// Any stored duration that is zero, negative, or unrepresentable is
/// replaced by [`fallback_ms`](DurationPolicy::fallback_ms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationPolicy {
    /// Replacement duration in milliseconds. Clamped to at least 1.
    pub fallback_ms: u32,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            fallback_ms: DEFAULT_FRAME_DURATION_MS,
        }
    }
}

impl DurationPolicy {
    /// Create a policy with the given fallback duration.
    pub fn new(fallback_ms: u32) -> Self {
        Self {
            fallback_ms: fallback_ms.max(1),
        }
    }
}

/// Per-run settings for the frame loops of
/// [`build_side_by_side_gif_with_options`](crate::build_side_by_side_gif_with_options)
/// and [`convert_gif_fps_with_options`](crate::convert_gif_fps_with_options).
///
/// The default reports to nobody, never stops early and reports after
/// every frame.
#[derive(Clone)]
pub struct JobOptions {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
    /// Frames between two progress reports.
    pub(crate) batch_size: u64,
}

impl Debug for JobOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // The callback is opaque; only say whether a token is present.
        f.debug_struct("JobOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }
}

impl JobOptions {
    /// Same as [`JobOptions::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Report progress to `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Stop with [`FramestitchError::Cancelled`](crate::FramestitchError::Cancelled)
    /// once `token` is cancelled. The check runs before each frame and
    /// nothing is written after it fires.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Report every `frames` frames instead of every frame. Zero is
    /// treated as 1.
    #[must_use]
    pub fn with_batch_size(mut self, frames: u64) -> Self {
        self.batch_size = frames.max(1);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(&self.cancellation, Some(token) if token.is_cancelled())
    }
}
