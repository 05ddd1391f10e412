//! GIF frame-rate conversion by time-based frame skipping.
//!
//! [`convert_gif_fps`] decodes a GIF, keeps the frames chosen by
//! [`sample_indices_by_time`], and writes them back out with a constant
//! delay matching the target rate.
//!
//! # Example
//!
//! ```no_run
//! use framestitch::{FramestitchError, ResampleOptions};
//!
//! let input = "assets/my_30fps.gif";
//! let output = framestitch::default_resample_output(input, 12.0);
//! let summary = framestitch::convert_gif_fps(input, &output, &ResampleOptions::new(12.0))?;
//! println!("frames {} -> {}", summary.source_frames, summary.output_frames);
//! # Ok::<(), FramestitchError>(())
//! ```

use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::configuration::{DEFAULT_GIF_FPS, DurationPolicy, JobOptions};
use crate::error::FramestitchError;
use crate::gif::{GifOptions, decode_gif, encode_gif_to_memory_with, write_gif_file};
use crate::progress::{OperationType, ProgressTracker};
use crate::sampler::{output_frame_delay_ms, sample_indices_by_time};

/// Settings for [`convert_gif_fps`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ResampleOptions {
    /// Target frame rate.
    pub target_fps: f64,
    /// Fallback for frames with a missing or zero delay.
    pub duration_policy: DurationPolicy,
    /// GIF encoder settings. The frame delay is derived from `target_fps`.
    pub gif: GifOptions,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self::new(DEFAULT_GIF_FPS)
    }
}

impl ResampleOptions {
    /// Options targeting `target_fps` with default policy and encoder settings.
    pub fn new(target_fps: f64) -> Self {
        Self {
            target_fps,
            duration_policy: DurationPolicy::default(),
            gif: GifOptions::default(),
        }
    }

    /// Override the fallback frame duration.
    pub fn with_duration_policy(mut self, policy: DurationPolicy) -> Self {
        self.duration_policy = policy;
        self
    }

    /// Set GIF encoder settings (repeat, quantiser speed).
    pub fn with_gif_options(mut self, gif: GifOptions) -> Self {
        self.gif = gif;
        self
    }
}

/// Outcome of a [`convert_gif_fps`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleSummary {
    /// Frames in the source GIF.
    pub source_frames: usize,
    /// Frames written to the output GIF.
    pub output_frames: usize,
    /// Rate the output was sampled at.
    pub target_fps: f64,
    /// Constant delay written for every output frame, in milliseconds.
    pub frame_delay_ms: u32,
}

/// Default output path: `<stem>_<fps>fps.<ext>` next to `input`.
///
/// The rate is truncated to an integer, so 12.5 fps yields `_12fps`.
pub fn default_resample_output<P: AsRef<Path>>(input: P, target_fps: f64) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_{}fps{extension}", target_fps.trunc() as i64))
}

/// Resample an animated GIF to `options.target_fps`.
///
/// # Errors
///
/// Returns [`FramestitchError::InvalidArgument`] for a non-positive target
/// rate (checked before the input is read), plus the errors of
/// [`decode_gif`] and [`encode_gif`](crate::encode_gif).
pub fn convert_gif_fps<I, O>(
    input: I,
    output: O,
    options: &ResampleOptions,
) -> Result<ResampleSummary, FramestitchError>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
{
    convert_gif_fps_with_options(input, output, options, &JobOptions::default())
}

/// Like [`convert_gif_fps`] with progress and cancellation support.
///
/// Progress is reported per encoded frame as
/// [`OperationType::FrameSelection`]. Cancellation is checked before
/// encoding starts and between frames; a cancelled run leaves `output`
/// untouched.
pub fn convert_gif_fps_with_options<I, O>(
    input: I,
    output: O,
    options: &ResampleOptions,
    job: &JobOptions,
) -> Result<ResampleSummary, FramestitchError>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
{
    let frame_delay_ms = output_frame_delay_ms(options.target_fps)?;

    let decoded = decode_gif(input, options.duration_policy)?;
    let source_frames = decoded.len();
    let mut frames = decoded.frames;
    let mut durations = decoded.durations_ms;
    if frames.len() != durations.len() {
        let shared = frames.len().min(durations.len());
        log::warn!(
            "Frame/duration count mismatch ({} vs {}); truncating to {shared}",
            frames.len(),
            durations.len()
        );
        frames.truncate(shared);
        durations.truncate(shared);
    }

    let indices = sample_indices_by_time(&durations, options.target_fps)?;
    log::debug!(
        "Sampled {} of {} frames at {} fps",
        indices.len(),
        frames.len(),
        options.target_fps
    );

    // Indices are strictly increasing, so the kept frames can be moved out
    // in a single pass.
    let mut wanted = indices.iter().copied().peekable();
    let selected: Vec<DynamicImage> = frames
        .into_iter()
        .enumerate()
        .filter_map(|(position, frame)| {
            wanted
                .next_if_eq(&position)
                .map(|_| DynamicImage::ImageRgba8(frame))
        })
        .collect();
    if selected.len() != indices.len() {
        return Err(FramestitchError::GifDecodeError(format!(
            "sampled {} frames but only {} could be selected",
            indices.len(),
            selected.len()
        )));
    }

    if job.is_cancelled() {
        return Err(FramestitchError::Cancelled);
    }
    let gif_options = options.gif.clone().frame_delay_ms(frame_delay_ms);
    let last = selected.len() - 1;
    let mut tracker = ProgressTracker::new(
        job,
        OperationType::FrameSelection,
        Some(selected.len() as u64),
    );
    // Encoding dominates the run time, so progress and cancellation follow
    // the encoder. Bytes only reach `output` once every frame is in.
    let bytes = encode_gif_to_memory_with(&selected, &gif_options, |position| {
        tracker.advance(Some(indices[position] as u64));
        if position < last && job.is_cancelled() {
            return Err(FramestitchError::Cancelled);
        }
        Ok(())
    })?;
    tracker.finish();
    write_gif_file(output.as_ref(), &bytes)?;

    Ok(ResampleSummary {
        source_frames,
        output_frames: selected.len(),
        target_fps: options.target_fps,
        frame_delay_ms,
    })
}
