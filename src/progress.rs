//! Progress callbacks and cooperative cancellation for frame loops.
//!
//! Both long-running jobs (stitching a pair sequence, encoding a resampled
//! GIF) report through a [`ProgressCallback`] attached to
//! [`JobOptions`](crate::JobOptions) and stop early when its
//! [`CancellationToken`] is triggered.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framestitch::{
//!     FramestitchError, JobOptions, ProgressCallback, ProgressInfo, StitchOptions,
//! };
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}%", info.operation);
//!         }
//!     }
//! }
//!
//! let job = JobOptions::new().with_progress(Arc::new(PrintProgress));
//! framestitch::build_side_by_side_gif_with_options(
//!     "left/rgb",
//!     "right/rgb",
//!     "out.gif",
//!     &StitchOptions::default(),
//!     &job,
//! )?;
//! # Ok::<(), FramestitchError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use crate::configuration::JobOptions;

/// Which job loop produced a [`ProgressInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Loading left/right pairs and composing side-by-side frames.
    Stitching,
    /// Encoding the frames kept by a GIF resample.
    FrameSelection,
}

/// Point-in-time view of a running job.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// The loop reporting.
    pub operation: OperationType,
    /// Frames finished so far.
    pub current: u64,
    /// Frames the loop will process, when known up front.
    pub total: Option<u64>,
    /// `current / total` as 0.0 to 100.0.
    pub percentage: Option<f32>,
    /// Time since the loop started.
    pub elapsed: Duration,
    /// Linear extrapolation of the time left.
    pub estimated_remaining: Option<Duration>,
    /// Frame number of the item just finished; `None` on the final report.
    pub current_frame: Option<u64>,
}

/// Receives [`ProgressInfo`] snapshots.
///
/// With the `rayon` feature enabled, reports can arrive from worker
/// threads, hence the `Send + Sync` bound. Callbacks only observe; stopping
/// a job goes through [`CancellationToken`].
pub trait ProgressCallback: Send + Sync {
    /// Handle one snapshot.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Callback used when none is configured.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Shared flag asking a job to stop before its next frame.
///
/// ```
/// use framestitch::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every job holding a clone of this token to stop.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Counts finished frames for one job loop and forwards a snapshot to the
/// callback every `batch_size` frames.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    batch_size: u64,
    started: Instant,
    done: u64,
    pending: u64,
}

impl ProgressTracker {
    pub(crate) fn new(job: &JobOptions, operation: OperationType, total: Option<u64>) -> Self {
        Self {
            callback: Arc::clone(&job.progress),
            operation,
            total,
            batch_size: job.batch_size.max(1),
            started: Instant::now(),
            done: 0,
            pending: 0,
        }
    }

    /// Mark `frame` as finished.
    pub(crate) fn advance(&mut self, frame: Option<u64>) {
        self.done += 1;
        self.pending += 1;
        if self.pending == self.batch_size {
            self.pending = 0;
            self.emit(frame);
        }
    }

    /// Send the closing snapshot regardless of batching.
    pub(crate) fn finish(&mut self) {
        self.pending = 0;
        self.emit(None);
    }

    fn emit(&self, frame: Option<u64>) {
        let elapsed = self.started.elapsed();
        let known_total = self.total.filter(|&total| total > 0);

        let percentage = known_total.map(|total| self.done as f32 * 100.0 / total as f32);
        let estimated_remaining = known_total.filter(|_| self.done > 0).map(|total| {
            let left = total.saturating_sub(self.done);
            elapsed.mul_f64(left as f64 / self.done as f64)
        });

        self.callback.on_progress(&ProgressInfo {
            operation: self.operation,
            current: self.done,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_frame: frame,
        });
    }
}
