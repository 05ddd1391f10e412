//! # framestitch
//!
//! Resample GIF frame rates and stitch paired left/right frame sequences
//! into side-by-side GIFs and MP4s.
//!
//! ## Quick Start
//!
//! ### Resample a GIF
//!
//! ```no_run
//! use framestitch::ResampleOptions;
//!
//! let summary = framestitch::convert_gif_fps(
//!     "assets/my_30fps.gif",
//!     "assets/my_12fps.gif",
//!     &ResampleOptions::new(12.0),
//! ).unwrap();
//! println!("frames {} -> {}", summary.source_frames, summary.output_frames);
//! ```
//!
//! ### Sample frame indices directly
//!
//! ```
//! // 30 frames of 33 ms (~30 fps) down to 12 fps.
//! let indices = framestitch::sample_indices_by_time(&[33; 30], 12.0).unwrap();
//! assert_eq!(indices.len(), 12);
//! assert_eq!(indices[0], 0);
//! ```
//!
//! ### Stitch left/right sequences
//!
//! ```no_run
//! use framestitch::{StitchOptions, VideoLayout, VideoStitchOptions};
//!
//! framestitch::build_side_by_side_gif(
//!     "left/rgb",
//!     "right/rgb",
//!     "side_by_side.gif",
//!     &StitchOptions::new().fps(12.0),
//! ).unwrap();
//!
//! framestitch::stitch_video(
//!     "left/rgb",
//!     "right/rgb",
//!     "side_by_side.mp4",
//!     &VideoStitchOptions::new().layout(VideoLayout::SideBySide),
//! ).unwrap();
//! ```
//!
//! ## Features
//!
//! - **Time-based resampling**: picks the frame visible at each output
//!   instant, so GIFs with uneven frame delays keep their pacing
//! - **Side-by-side GIFs**: numbered left/right sequences, optional scaling,
//!   strict or intersecting pairing
//! - **Side-by-side MP4s**: via an external `ffmpeg` with libx264
//! - **Timing analysis**: constant vs variable frame rate detection
//! - **Validation**: pairing health report before a long job
//! - **Progress & cancellation**: callbacks and `CancellationToken`
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | Compose side-by-side frames across rayon threads |
//! | `full` | Enables all of the above |
//!
//! ## Requirements
//!
//! MP4 output needs an `ffmpeg` executable with libx264, either on `PATH`
//! or named by the `FRAMESTITCH_FFMPEG` environment variable.

pub mod configuration;
pub mod dataset;
pub mod error;
pub mod gif;
pub mod progress;
pub mod resample;
pub mod sampler;
pub mod sequence;
pub mod stitch;
pub mod timing;
pub mod validation;
pub mod video;

pub use configuration::{
    DEFAULT_CRF, DEFAULT_FRAME_DURATION_MS, DEFAULT_GIF_FPS, DEFAULT_PRESET, DEFAULT_VIDEO_FPS,
    DEFAULT_VIDEO_HEIGHT, DurationPolicy, JobOptions,
};
pub use dataset::{DEFAULT_DATASETS, SequencePaths, gif_output_path, video_output_path};
pub use error::FramestitchError;
pub use gif::{DecodedGif, GifOptions, decode_gif, encode_gif, encode_gif_to_memory};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use resample::{
    ResampleOptions, ResampleSummary, convert_gif_fps, convert_gif_fps_with_options,
    default_resample_output,
};
pub use sampler::{output_frame_delay_ms, sample_indices_by_time};
pub use sequence::{FramePair, NumberedFrame, PairingSummary, list_frames, pair_frames};
pub use stitch::{
    StitchOptions, StitchSummary, build_side_by_side_gif, build_side_by_side_gif_with_options,
    stitch_pair,
};
pub use timing::{GifTimingAnalysis, normalize_durations};
pub use validation::{ValidationReport, validate_sequences};
pub use video::{
    Perspective, SequenceInput, VideoLayout, VideoStitchOptions, ffmpeg_arguments, filter_graph,
    locate_ffmpeg, stitch_video,
};
