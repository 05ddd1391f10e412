//! Error types for the `framestitch` crate.
//!
//! This module defines [`FramestitchError`], the unified error type returned
//! by all fallible operations in the crate. Errors carry enough context
//! (paths, offending values, encoder output) to diagnose a failed job from
//! the message alone.

use std::{io::Error as IoError, path::PathBuf, process::ExitStatus};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `framestitch` operations.
///
/// Every public function that can fail returns
/// `Result<T, FramestitchError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramestitchError {
    /// A caller-supplied argument is out of range (e.g. a frame rate that
    /// is zero or negative).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An input file or directory does not exist, or holds no usable frames.
    #[error("Not found: {path}: {reason}")]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
        /// What was missing.
        reason: String,
    },

    /// Input exists but is not shaped the way the job requires
    /// (non-numeric frame names, unmatched left/right frames, ...).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An animated GIF could not be decoded.
    #[error("GIF decoding error: {0}")]
    GifDecodeError(String),

    /// An animated GIF could not be encoded.
    #[error("GIF encoding error: {0}")]
    GifEncodeError(String),

    /// The external `ffmpeg` executable could not be started.
    #[error("Failed to launch encoder {program}: {reason}")]
    EncoderNotFound {
        /// The program that was invoked.
        program: PathBuf,
        /// Underlying spawn error.
        reason: String,
    },

    /// The external encoder ran but exited unsuccessfully.
    #[error("Encoder exited with {status}: {stderr}")]
    EncoderFailed {
        /// Exit status of the encoder process.
        status: ExitStatus,
        /// Captured standard error output (trimmed).
        stderr: String,
    },

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while loading or converting frames.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl FramestitchError {
    /// Shorthand for a [`FramestitchError::NotFound`] error.
    pub(crate) fn not_found(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        FramestitchError::NotFound {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
