//! MP4 output through an external `ffmpeg` process.
//!
//! The two numbered sequences are handed to `ffmpeg` as image-sequence
//! inputs; scaling and horizontal stacking happen inside its filter graph
//! and the result is encoded with libx264.
//!
//! # Example
//!
//! ```no_run
//! use framestitch::{FramestitchError, VideoLayout, VideoStitchOptions};
//!
//! let options = VideoStitchOptions::new()
//!     .fps(30.0)
//!     .height(480)
//!     .layout(VideoLayout::SideBySide);
//! framestitch::stitch_video("left/rgb", "right/rgb", "out.mp4", &options)?;
//! # Ok::<(), FramestitchError>(())
//! ```

use std::env;
use std::ffi::OsString;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::configuration::{
    DEFAULT_CRF, DEFAULT_PRESET, DEFAULT_VIDEO_FPS, DEFAULT_VIDEO_HEIGHT, FFMPEG_ENV_VAR, MAX_CRF,
};
use crate::error::FramestitchError;
use crate::sequence::list_frames;

/// Which camera a single-perspective video shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Perspective {
    /// The left sequence (ffmpeg input 0).
    #[default]
    Left,
    /// The right sequence (ffmpeg input 1).
    Right,
}

impl Perspective {
    fn input_index(self) -> usize {
        match self {
            Perspective::Left => 0,
            Perspective::Right => 1,
        }
    }
}

impl Display for Perspective {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Perspective::Left => write!(f, "left"),
            Perspective::Right => write!(f, "right"),
        }
    }
}

/// Arrangement of the output video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoLayout {
    /// Both sequences scaled to the same height and stacked horizontally.
    SideBySide,
    /// Only one sequence.
    Single(Perspective),
}

impl Default for VideoLayout {
    fn default() -> Self {
        VideoLayout::Single(Perspective::Left)
    }
}

/// Settings for [`stitch_video`].
#[derive(Debug, Clone)]
#[must_use]
pub struct VideoStitchOptions {
    /// Input and output frame rate (default 30).
    pub fps: f64,
    /// Output height in pixels; width follows the aspect ratio (default 480).
    pub height: u32,
    /// Output arrangement (default: left perspective only).
    pub layout: VideoLayout,
    /// libx264 constant rate factor, 0–51 (default 28).
    pub crf: u8,
    /// libx264 preset (default `slow`).
    pub preset: String,
    /// Explicit `ffmpeg` executable. See [`locate_ffmpeg`].
    pub ffmpeg: Option<PathBuf>,
}

impl Default for VideoStitchOptions {
    fn default() -> Self {
        Self {
            fps: DEFAULT_VIDEO_FPS,
            height: DEFAULT_VIDEO_HEIGHT,
            layout: VideoLayout::default(),
            crf: DEFAULT_CRF,
            preset: DEFAULT_PRESET.to_string(),
            ffmpeg: None,
        }
    }
}

impl VideoStitchOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the frame rate.
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Set the output height.
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Set the output arrangement.
    pub fn layout(mut self, layout: VideoLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the constant rate factor.
    pub fn crf(mut self, crf: u8) -> Self {
        self.crf = crf;
        self
    }

    /// Set the libx264 preset.
    pub fn preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = preset.into();
        self
    }

    /// Use a specific `ffmpeg` executable.
    pub fn ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg = Some(path.into());
        self
    }

    /// Check the numeric settings.
    ///
    /// # Errors
    ///
    /// Returns [`FramestitchError::InvalidArgument`] for a non-positive
    /// `fps` or `height`, a `crf` above 51, or an empty preset.
    pub fn validate(&self) -> Result<(), FramestitchError> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(FramestitchError::InvalidArgument(format!(
                "fps must be > 0 (got {})",
                self.fps
            )));
        }
        if self.height == 0 {
            return Err(FramestitchError::InvalidArgument(
                "height must be > 0".to_string(),
            ));
        }
        if self.crf > MAX_CRF {
            return Err(FramestitchError::InvalidArgument(format!(
                "crf must be between 0 and {MAX_CRF} (got {})",
                self.crf
            )));
        }
        if self.preset.trim().is_empty() {
            return Err(FramestitchError::InvalidArgument(
                "preset must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// An image-sequence input as `ffmpeg` expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceInput {
    /// printf-style path, e.g. `left/rgb/%d.jpg`.
    pub pattern: PathBuf,
    /// Number of the first frame.
    pub start_number: u64,
}

impl SequenceInput {
    /// Describe the sequence in `directory` from its first frame.
    ///
    /// A `%d` pattern only matches unpadded numbers with a single
    /// extension, so every frame must be named `<index>.<ext>` with the same
    /// `<ext>`.
    ///
    /// # Errors
    ///
    /// Same as [`list_frames`], plus [`FramestitchError::ValidationError`]
    /// for zero-padded names or mixed extensions.
    pub fn from_directory<P: AsRef<Path>>(directory: P) -> Result<Self, FramestitchError> {
        let directory = directory.as_ref();
        let frames = list_frames(directory)?;
        let extension = frame_extension(&frames[0].path);

        for frame in &frames {
            let stem = frame.path.file_stem().map(|s| s.to_string_lossy());
            if stem.as_deref() != Some(frame.index.to_string().as_str()) {
                return Err(FramestitchError::ValidationError(format!(
                    "Frame {:?} is not named by its plain number; ffmpeg expects {}.{extension}",
                    frame.path, frame.index
                )));
            }
            let other = frame_extension(&frame.path);
            if other != extension {
                return Err(FramestitchError::ValidationError(format!(
                    "Mixed extensions in {:?}: .{extension} and .{other}",
                    directory
                )));
            }
        }

        Ok(Self {
            pattern: directory.join(format!("%d.{extension}")),
            start_number: frames[0].index,
        })
    }
}

fn frame_extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The `-filter_complex` graph for a layout.
pub fn filter_graph(layout: VideoLayout, height: u32) -> String {
    match layout {
        VideoLayout::SideBySide => format!(
            "[0:v]scale=-2:{height}[l];[1:v]scale=-2:{height}[r];[l][r]hstack=inputs=2"
        ),
        VideoLayout::Single(perspective) => {
            format!("[{}:v]scale=-2:{height}", perspective.input_index())
        }
    }
}

/// Full `ffmpeg` argument list (excluding the program name).
pub fn ffmpeg_arguments(
    left: &SequenceInput,
    right: &SequenceInput,
    output: &Path,
    options: &VideoStitchOptions,
) -> Vec<OsString> {
    let fps = options.fps.to_string();
    let mut arguments: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error"]
        .into_iter()
        .map(OsString::from)
        .collect();

    for input in [left, right] {
        arguments.push("-framerate".into());
        arguments.push(fps.clone().into());
        arguments.push("-start_number".into());
        arguments.push(input.start_number.to_string().into());
        arguments.push("-i".into());
        arguments.push(input.pattern.clone().into_os_string());
    }

    arguments.push("-filter_complex".into());
    arguments.push(filter_graph(options.layout, options.height).into());
    arguments.push("-r".into());
    arguments.push(fps.into());
    arguments.push("-c:v".into());
    arguments.push("libx264".into());
    arguments.push("-pix_fmt".into());
    arguments.push("yuv420p".into());
    arguments.push("-crf".into());
    arguments.push(options.crf.to_string().into());
    arguments.push("-preset".into());
    arguments.push(options.preset.clone().into());
    arguments.push(output.as_os_str().to_os_string());
    arguments
}

/// Resolve the `ffmpeg` executable.
///
/// Uses [`VideoStitchOptions::ffmpeg`] when set, then the
/// `FRAMESTITCH_FFMPEG` environment variable, then `ffmpeg` on `PATH`.
pub fn locate_ffmpeg(options: &VideoStitchOptions) -> PathBuf {
    if let Some(path) = &options.ffmpeg {
        return path.clone();
    }
    match env::var_os(FFMPEG_ENV_VAR) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from("ffmpeg"),
    }
}

/// Encode two numbered sequences into an MP4 with `ffmpeg`.
///
/// Both directories are required even in single-perspective mode, since
/// the filter graph addresses inputs by position.
///
/// # Errors
///
/// Returns [`FramestitchError::InvalidArgument`] for invalid options,
/// [`FramestitchError::NotFound`] for a missing or empty directory,
/// [`FramestitchError::EncoderNotFound`] if `ffmpeg` cannot be launched and
/// [`FramestitchError::EncoderFailed`] if it exits unsuccessfully.
pub fn stitch_video<L, R, O>(
    left_dir: L,
    right_dir: R,
    output: O,
    options: &VideoStitchOptions,
) -> Result<PathBuf, FramestitchError>
where
    L: AsRef<Path>,
    R: AsRef<Path>,
    O: AsRef<Path>,
{
    options.validate()?;
    let output = output.as_ref();
    let left = SequenceInput::from_directory(left_dir)?;
    let right = SequenceInput::from_directory(right_dir)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let program = locate_ffmpeg(options);
    let arguments = ffmpeg_arguments(&left, &right, output, options);
    log::debug!("Running {:?} {:?}", program, arguments);

    let result = Command::new(&program)
        .args(&arguments)
        .output()
        .map_err(|e| FramestitchError::EncoderNotFound {
            program: program.clone(),
            reason: e.to_string(),
        })?;

    if !result.status.success() {
        return Err(FramestitchError::EncoderFailed {
            status: result.status,
            stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
        });
    }

    log::debug!("Wrote {:?}", output);
    Ok(output.to_path_buf())
}
