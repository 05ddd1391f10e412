//! Default on-disk layout for paired camera datasets.
//!
//! ```text
//! <root>/assets/
//!   pre-processed image folders/
//!     25/
//!       ego_left/rgb/0.jpg ...
//!       ego_right/rgb/0.jpg ...
//!     50/
//!       left/0.jpg ...
//!       right/0.jpg ...
//! ```
//!
//! Outputs land next to the folders in `assets/`.

use std::path::{Path, PathBuf};

use crate::video::{VideoLayout, VideoStitchOptions};

/// Datasets processed when none are named.
pub const DEFAULT_DATASETS: [&str; 2] = ["25", "50"];

const ASSETS_DIR: &str = "assets";
const DATASETS_DIR: &str = "pre-processed image folders";

/// Left and right sequence directories of one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencePaths {
    /// Dataset name (e.g. `"25"`).
    pub dataset: String,
    /// Left-camera frames.
    pub left_dir: PathBuf,
    /// Right-camera frames.
    pub right_dir: PathBuf,
}

impl SequencePaths {
    /// Resolve a dataset under `root`.
    ///
    /// Prefers `ego_left/rgb` + `ego_right/rgb`; when either is missing,
    /// falls back to plain `left` + `right`. The result is not checked
    /// for existence beyond that choice.
    pub fn resolve<P: AsRef<Path>>(root: P, dataset: &str) -> Self {
        let base = dataset_dir(root, dataset);
        let ego_left = base.join("ego_left").join("rgb");
        let ego_right = base.join("ego_right").join("rgb");

        let (left_dir, right_dir) = if ego_left.is_dir() && ego_right.is_dir() {
            (ego_left, ego_right)
        } else {
            (base.join("left"), base.join("right"))
        };

        Self {
            dataset: dataset.to_string(),
            left_dir,
            right_dir,
        }
    }
}

/// `<root>/assets/pre-processed image folders/<dataset>`.
pub fn dataset_dir<P: AsRef<Path>>(root: P, dataset: &str) -> PathBuf {
    root.as_ref()
        .join(ASSETS_DIR)
        .join(DATASETS_DIR)
        .join(dataset)
}

/// `<root>/assets/preprocessed_<dataset>.gif`.
pub fn gif_output_path<P: AsRef<Path>>(root: P, dataset: &str) -> PathBuf {
    root.as_ref()
        .join(ASSETS_DIR)
        .join(format!("preprocessed_{dataset}.gif"))
}

/// `<root>/assets/preprocessed_<dataset>_<height>p_<fps>fps[_<perspective>].mp4`.
///
/// The frame rate is truncated to an integer; the perspective suffix is
/// only present for single-perspective layouts.
pub fn video_output_path<P: AsRef<Path>>(
    root: P,
    dataset: &str,
    options: &VideoStitchOptions,
) -> PathBuf {
    let mut suffix = format!("{}p_{}fps", options.height, options.fps.trunc() as i64);
    if let VideoLayout::Single(perspective) = options.layout {
        suffix.push_str(&format!("_{perspective}"));
    }
    root.as_ref()
        .join(ASSETS_DIR)
        .join(format!("preprocessed_{dataset}_{suffix}.mp4"))
}
