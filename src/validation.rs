//! Pairing health checks for left/right sequences.
//!
//! [`validate_sequences`] inspects two frame directories without decoding
//! any image and returns a [`ValidationReport`] describing what a stitch
//! job would see.
//!
//! # Example
//!
//! ```no_run
//! let report = framestitch::validate_sequences("left/rgb", "right/rgb");
//! if report.is_valid() {
//!     println!("Sequences pair cleanly");
//! } else {
//!     print!("{report}");
//! }
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use crate::sequence::{PairingSummary, list_frames};
use crate::video::SequenceInput;

/// Findings of [`validate_sequences`], grouped by severity.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Counts and other facts that need no action.
    pub info: Vec<String>,
    /// Problems a non-strict stitch tolerates.
    pub warnings: Vec<String>,
    /// Problems no stitch job can get past.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// `true` when `errors` is empty; warnings are ignored.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Entries across all three severities.
    pub fn issue_count(&self) -> usize {
        [&self.info, &self.warnings, &self.errors]
            .iter()
            .map(|entries| entries.len())
            .sum()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let sections = [
            ("INFO", &self.info),
            ("WARN", &self.warnings),
            ("ERROR", &self.errors),
        ];
        for (label, entries) in sections {
            for entry in entries {
                writeln!(f, "[{label}] {entry}")?;
            }
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Check that two numbered sequences can be stitched.
pub fn validate_sequences<L: AsRef<Path>, R: AsRef<Path>>(
    left_dir: L,
    right_dir: R,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    // ── Listing ────────────────────────────────────────────────────
    let left = match list_frames(left_dir.as_ref()) {
        Ok(frames) => {
            report.info.push(format!("Left: {} frames", frames.len()));
            Some(frames)
        }
        Err(error) => {
            report.errors.push(format!("Left: {error}"));
            None
        }
    };
    let right = match list_frames(right_dir.as_ref()) {
        Ok(frames) => {
            report.info.push(format!("Right: {} frames", frames.len()));
            Some(frames)
        }
        Err(error) => {
            report.errors.push(format!("Right: {error}"));
            None
        }
    };

    let (Some(left), Some(right)) = (left, right) else {
        return report;
    };

    // ── Pairing ────────────────────────────────────────────────────
    let summary = PairingSummary::from_frames(&left, &right);
    if summary.pairs.is_empty() {
        report
            .errors
            .push("No frame number is present on both sides".to_string());
        return report;
    }

    report
        .info
        .push(format!("{} matching pairs", summary.pairs.len()));

    if !summary.missing_left.is_empty() {
        report.warnings.push(format!(
            "{} frame(s) missing on the left (strict stitching will fail)",
            summary.missing_left.len()
        ));
    }
    if !summary.missing_right.is_empty() {
        report.warnings.push(format!(
            "{} frame(s) missing on the right (strict stitching will fail)",
            summary.missing_right.len()
        ));
    }

    // ── Numbering ──────────────────────────────────────────────────
    let first = summary.pairs[0].index;
    let last = summary.pairs[summary.pairs.len() - 1].index;
    // Pairs are sorted and distinct, so the spread is at least len - 1.
    let spread = last - first;
    if spread != (summary.pairs.len() - 1) as u64 {
        report.warnings.push(format!(
            "Pair numbering {first}..={last} has gaps; ffmpeg image sequences stop at the first gap"
        ));
    }

    // ── Naming ─────────────────────────────────────────────────────
    for (side, directory) in [("Left", left_dir.as_ref()), ("Right", right_dir.as_ref())] {
        if let Err(error) = SequenceInput::from_directory(directory) {
            report
                .warnings
                .push(format!("{side}: {error} (MP4 stitching will fail)"));
        }
    }

    report
}
