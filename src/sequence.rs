//! Numbered frame sequences and left/right pairing.
//!
//! A sequence is a flat directory of images named by frame number
//! (`0.jpg`, `1.jpg`, ..., `198.jpg`). Two sequences (left and right camera)
//! are paired by that number.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FramestitchError;

/// File extensions accepted as frames (compared case-insensitively).
pub const FRAME_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// How many missing indices to list per side in a pairing error.
const MISSING_PREVIEW_LIMIT: usize = 20;

/// One image file in a numbered sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberedFrame {
    /// Frame number parsed from the file stem.
    pub index: u64,
    /// Full path to the image.
    pub path: PathBuf,
}

/// A left and right frame sharing the same frame number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePair {
    /// Shared frame number.
    pub index: u64,
    /// Left-hand image.
    pub left: PathBuf,
    /// Right-hand image.
    pub right: PathBuf,
}

/// How two sequences line up, before any strictness is applied.
#[derive(Debug, Clone, Default)]
pub struct PairingSummary {
    /// Pairs present on both sides, ordered by frame number.
    pub pairs: Vec<FramePair>,
    /// Frame numbers present on the right but missing on the left.
    pub missing_left: Vec<u64>,
    /// Frame numbers present on the left but missing on the right.
    pub missing_right: Vec<u64>,
}

impl PairingSummary {
    /// Line up two listings by frame number.
    pub fn from_frames(left: &[NumberedFrame], right: &[NumberedFrame]) -> Self {
        let left_map: BTreeMap<u64, &PathBuf> = left.iter().map(|f| (f.index, &f.path)).collect();
        let right_map: BTreeMap<u64, &PathBuf> =
            right.iter().map(|f| (f.index, &f.path)).collect();

        let pairs = left_map
            .iter()
            .filter_map(|(&index, &left)| {
                right_map.get(&index).map(|&right| FramePair {
                    index,
                    left: left.clone(),
                    right: right.clone(),
                })
            })
            .collect();
        let missing_left = right_map
            .keys()
            .filter(|index| !left_map.contains_key(*index))
            .copied()
            .collect();
        let missing_right = left_map
            .keys()
            .filter(|index| !right_map.contains_key(*index))
            .copied()
            .collect();

        Self {
            pairs,
            missing_left,
            missing_right,
        }
    }

    /// `true` when every frame on either side has a partner.
    pub fn is_complete(&self) -> bool {
        self.missing_left.is_empty() && self.missing_right.is_empty()
    }
}

/// List the frames of a numbered sequence, sorted by frame number.
///
/// Only regular files with a [`FRAME_EXTENSIONS`] extension are considered.
///
/// # Errors
///
/// Returns [`FramestitchError::NotFound`] if the directory is missing or
/// holds no frames, and [`FramestitchError::ValidationError`] if a frame's
/// stem is not a number.
pub fn list_frames<P: AsRef<Path>>(directory: P) -> Result<Vec<NumberedFrame>, FramestitchError> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(FramestitchError::not_found(directory, "missing directory"));
    }

    let mut frames = Vec::new();
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() || !has_frame_extension(&path) {
            continue;
        }
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let index = stem.parse::<u64>().map_err(|_| {
            FramestitchError::ValidationError(format!(
                "frame filenames must be numeric (e.g. 0.jpg, 1.jpg); found {:?} in {}",
                stem,
                directory.display()
            ))
        })?;
        frames.push(NumberedFrame { index, path });
    }

    if frames.is_empty() {
        return Err(FramestitchError::not_found(directory, "no frames found"));
    }

    frames.sort_by_key(|frame| frame.index);
    log::debug!("Found {} frames in {:?}", frames.len(), directory);
    Ok(frames)
}

/// Pair two sequences by frame number.
///
/// With `strict` set, any frame without a partner is an error; otherwise
/// only the intersection is kept.
///
/// # Errors
///
/// Returns [`FramestitchError::ValidationError`] when strict pairing fails
/// or no frame number is common to both sides.
pub fn pair_frames(
    left: &[NumberedFrame],
    right: &[NumberedFrame],
    strict: bool,
) -> Result<Vec<FramePair>, FramestitchError> {
    let summary = PairingSummary::from_frames(left, right);

    if strict && !summary.is_complete() {
        let mut message = String::from("Left/right frames do not match.");
        if !summary.missing_left.is_empty() {
            message.push_str(&format!(
                " Missing in left: {}",
                preview_indices(&summary.missing_left)
            ));
        }
        if !summary.missing_right.is_empty() {
            message.push_str(&format!(
                " Missing in right: {}",
                preview_indices(&summary.missing_right)
            ));
        }
        return Err(FramestitchError::ValidationError(message));
    }

    if summary.pairs.is_empty() {
        return Err(FramestitchError::ValidationError(
            "no matching left/right frames".to_string(),
        ));
    }

    if !summary.is_complete() {
        log::warn!(
            "Dropping unpaired frames ({} missing on the left, {} on the right)",
            summary.missing_left.len(),
            summary.missing_right.len()
        );
    }
    Ok(summary.pairs)
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
}

fn preview_indices(indices: &[u64]) -> String {
    let shown: Vec<String> = indices
        .iter()
        .take(MISSING_PREVIEW_LIMIT)
        .map(u64::to_string)
        .collect();
    let ellipsis = if indices.len() > MISSING_PREVIEW_LIMIT {
        "..."
    } else {
        ""
    };
    format!("[{}]{ellipsis}", shown.join(", "))
}
