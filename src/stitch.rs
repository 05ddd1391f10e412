//! Side-by-side composition of paired frames.
//!
//! [`stitch_pair`] places a left and right image next to each other at a
//! common height, and [`build_side_by_side_gif`] runs that over two
//! numbered sequences to produce an animated GIF.
//!
//! # Example
//!
//! ```no_run
//! use framestitch::{FramestitchError, StitchOptions};
//!
//! let options = StitchOptions::new().fps(12.0).scale(0.5).strict(false);
//! let summary = framestitch::build_side_by_side_gif(
//!     "assets/pre-processed image folders/25/ego_left/rgb",
//!     "assets/pre-processed image folders/25/ego_right/rgb",
//!     "assets/preprocessed_25.gif",
//!     &options,
//! )?;
//! println!("{} frames at {}x{}", summary.frame_count, summary.width, summary.height);
//! # Ok::<(), FramestitchError>(())
//! ```

use std::path::Path;

use image::{DynamicImage, GenericImage, imageops::FilterType};

use crate::configuration::{DEFAULT_GIF_FPS, JobOptions};
use crate::error::FramestitchError;
use crate::gif::{GifOptions, encode_gif};
use crate::progress::{OperationType, ProgressTracker};
use crate::sampler::output_frame_delay_ms;
use crate::sequence::{FramePair, list_frames, pair_frames};

/// Settings for [`build_side_by_side_gif`].
#[derive(Debug, Clone)]
#[must_use]
pub struct StitchOptions {
    /// Output frame rate (default 12).
    pub fps: f64,
    /// Uniform scale applied to both images before stitching (default 1.0).
    pub scale: f64,
    /// Fail when a frame has no partner on the other side (default `true`).
    pub strict: bool,
    /// GIF encoder settings. The frame delay is derived from `fps`.
    pub gif: GifOptions,
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            fps: DEFAULT_GIF_FPS,
            scale: 1.0,
            strict: true,
            gif: GifOptions::default(),
        }
    }
}

impl StitchOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output frame rate.
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Set the uniform scale factor.
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Require every frame to have a partner.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set GIF encoder settings (repeat, quantiser speed).
    pub fn gif(mut self, gif: GifOptions) -> Self {
        self.gif = gif;
        self
    }

    fn validate(&self) -> Result<(), FramestitchError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(FramestitchError::InvalidArgument(format!(
                "fps must be > 0 (got {})",
                self.fps
            )));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(FramestitchError::InvalidArgument(format!(
                "scale must be > 0 (got {})",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Outcome of a [`build_side_by_side_gif`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StitchSummary {
    /// Number of frames written.
    pub frame_count: usize,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Constant delay written for every frame, in milliseconds.
    pub frame_delay_ms: u32,
}

/// Place `left` and `right` side by side.
///
/// Both images are converted to RGB and, unless `scale` is 1.0, scaled
/// uniformly. The taller image is then resized (preserving aspect ratio)
/// to the height of the shorter one. The result is
/// `left.width + right.width` wide.
///
/// # Errors
///
/// Returns [`FramestitchError::ImageError`] if either half cannot be
/// pasted onto the canvas.
pub fn stitch_pair(
    left: &DynamicImage,
    right: &DynamicImage,
    scale: f64,
) -> Result<DynamicImage, FramestitchError> {
    let left = scale_uniform(DynamicImage::ImageRgb8(left.to_rgb8()), scale);
    let right = scale_uniform(DynamicImage::ImageRgb8(right.to_rgb8()), scale);

    let target_height = left.height().min(right.height());
    let left = match_height(left, target_height);
    let right = match_height(right, target_height);

    let mut canvas = DynamicImage::new_rgb8(left.width() + right.width(), target_height);
    canvas.copy_from(&left, 0, 0)?;
    canvas.copy_from(&right, left.width(), 0)?;
    Ok(canvas)
}

/// Stitch two numbered sequences into a side-by-side animated GIF.
///
/// # Errors
///
/// Returns [`FramestitchError::InvalidArgument`] for a non-positive `fps`
/// or `scale`, the errors of [`list_frames`] and [`pair_frames`], image
/// loading errors, and GIF encoding errors.
pub fn build_side_by_side_gif<L, R, O>(
    left_dir: L,
    right_dir: R,
    output: O,
    options: &StitchOptions,
) -> Result<StitchSummary, FramestitchError>
where
    L: AsRef<Path>,
    R: AsRef<Path>,
    O: AsRef<Path>,
{
    build_side_by_side_gif_with_options(left_dir, right_dir, output, options, &JobOptions::default())
}

/// Like [`build_side_by_side_gif`] with progress and cancellation support.
pub fn build_side_by_side_gif_with_options<L, R, O>(
    left_dir: L,
    right_dir: R,
    output: O,
    options: &StitchOptions,
    job: &JobOptions,
) -> Result<StitchSummary, FramestitchError>
where
    L: AsRef<Path>,
    R: AsRef<Path>,
    O: AsRef<Path>,
{
    options.validate()?;
    let frame_delay_ms = output_frame_delay_ms(options.fps)?;
    log::debug!(
        "Stitching {:?} + {:?} -> {:?} (fps={}, scale={}, strict={})",
        left_dir.as_ref(),
        right_dir.as_ref(),
        output.as_ref(),
        options.fps,
        options.scale,
        options.strict,
    );

    let left_frames = list_frames(left_dir)?;
    let right_frames = list_frames(right_dir)?;
    let pairs = pair_frames(&left_frames, &right_frames, options.strict)?;

    let mut frames = stitch_all(&pairs, options.scale, job)?;
    conform_sizes(&mut frames);

    let (width, height) = (frames[0].width(), frames[0].height());
    let gif_options = options.gif.clone().frame_delay_ms(frame_delay_ms);
    encode_gif(output, &frames, &gif_options)?;

    Ok(StitchSummary {
        frame_count: frames.len(),
        width,
        height,
        frame_delay_ms,
    })
}

fn load_and_stitch(pair: &FramePair, scale: f64) -> Result<DynamicImage, FramestitchError> {
    let left = image::open(&pair.left)?;
    let right = image::open(&pair.right)?;
    stitch_pair(&left, &right, scale)
}

#[cfg(not(feature = "rayon"))]
fn stitch_all(
    pairs: &[FramePair],
    scale: f64,
    job: &JobOptions,
) -> Result<Vec<DynamicImage>, FramestitchError> {
    let total = Some(pairs.len() as u64);
    let mut tracker = ProgressTracker::new(job, OperationType::Stitching, total);

    let mut frames = Vec::with_capacity(pairs.len());
    for pair in pairs {
        if job.is_cancelled() {
            return Err(FramestitchError::Cancelled);
        }
        frames.push(load_and_stitch(pair, scale)?);
        tracker.advance(Some(pair.index));
    }
    tracker.finish();
    Ok(frames)
}

#[cfg(feature = "rayon")]
fn stitch_all(
    pairs: &[FramePair],
    scale: f64,
    job: &JobOptions,
) -> Result<Vec<DynamicImage>, FramestitchError> {
    use std::sync::Mutex;

    use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};

    let total = Some(pairs.len() as u64);
    let tracker = Mutex::new(ProgressTracker::new(job, OperationType::Stitching, total));

    // `collect` into a Result keeps the original pair order.
    let frames = pairs
        .par_iter()
        .map(|pair| {
            if job.is_cancelled() {
                return Err(FramestitchError::Cancelled);
            }
            let frame = load_and_stitch(pair, scale)?;
            if let Ok(mut tracker) = tracker.lock() {
                tracker.advance(Some(pair.index));
            }
            Ok(frame)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Ok(mut tracker) = tracker.lock() {
        tracker.finish();
    }
    Ok(frames)
}

/// GIF frames must share one size; resize stragglers to the first frame.
fn conform_sizes(frames: &mut [DynamicImage]) {
    let Some(first) = frames.first() else {
        return;
    };
    let (width, height) = (first.width(), first.height());
    for (index, frame) in frames.iter_mut().enumerate().skip(1) {
        if frame.width() != width || frame.height() != height {
            log::warn!(
                "Frame {index} is {}x{}; resizing to {width}x{height}",
                frame.width(),
                frame.height()
            );
            *frame = frame.resize_exact(width, height, FilterType::Lanczos3);
        }
    }
}

fn scale_uniform(image: DynamicImage, scale: f64) -> DynamicImage {
    if scale == 1.0 {
        return image;
    }
    let width = scaled_dimension(image.width(), scale);
    let height = scaled_dimension(image.height(), scale);
    image.resize_exact(width, height, FilterType::Lanczos3)
}

fn match_height(image: DynamicImage, target_height: u32) -> DynamicImage {
    if image.height() == target_height {
        return image;
    }
    let ratio = f64::from(target_height) / f64::from(image.height());
    let width = scaled_dimension(image.width(), ratio);
    image.resize_exact(width, target_height, FilterType::Lanczos3)
}

fn scaled_dimension(dimension: u32, factor: f64) -> u32 {
    ((f64::from(dimension) * factor).round() as u32).max(1)
}
