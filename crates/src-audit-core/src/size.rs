//! File-size audit.
//!
//! Counts the significant lines of every Rust source under a project root
//! and sorts oversized files into a warning bucket and an error bucket.
//! Thresholds are strict: a file sitting exactly on a threshold is not
//! flagged.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use tracing::debug;

use crate::error::ScanResult;
use crate::lines;
use crate::policy::Gate;
use crate::walk;

/// Files with more significant lines than this are reported as warnings.
pub const MAX_LINES_WARNING: usize = 300;

/// Files with more significant lines than this are reported as errors.
pub const MAX_LINES_ERROR: usize = 500;

/// Extensions audited for size.
pub const SIZE_EXTENSIONS: &[&str] = &[".rs"];

/// Directory names never entered by the size audit.
pub const SIZE_EXCLUDED_DIRS: &[&str] = &[".git", "target", "node_modules", ".gemini"];

/// Warning and error line limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    /// Line count above which a file is a warning.
    pub warning: usize,
    /// Line count above which a file is an error.
    pub error: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: MAX_LINES_WARNING,
            error: MAX_LINES_ERROR,
        }
    }
}

impl Thresholds {
    /// Classify a line count.
    pub const fn level(&self, lines: usize) -> SizeLevel {
        if lines > self.error {
            SizeLevel::Error
        } else if lines > self.warning {
            SizeLevel::Warning
        } else {
            SizeLevel::Ok
        }
    }
}

/// Bucket a file lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeLevel {
    /// At or under the warning threshold.
    Ok,
    /// Over the warning threshold, at or under the error threshold.
    Warning,
    /// Over the error threshold.
    Error,
}

/// A flagged file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeFinding {
    /// Path relative to the project root.
    pub path: Utf8PathBuf,
    /// Significant line count.
    pub lines: usize,
}

/// Aggregate numbers over every audited file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SizeStats {
    /// Number of files audited.
    pub total_files: usize,
    /// Sum of significant lines.
    pub total_lines: usize,
    /// Integer mean of significant lines (0 when no files).
    pub average_lines: usize,
    /// Number of files in the warning bucket.
    pub warning_files: usize,
    /// Number of files in the error bucket.
    pub error_files: usize,
}

/// Result of a file-size audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeReport {
    /// Limits used for classification.
    pub thresholds: Thresholds,
    /// Files over the error threshold, largest first.
    pub errors: Vec<SizeFinding>,
    /// Files over the warning threshold only, largest first.
    pub warnings: Vec<SizeFinding>,
    /// Totals over all files.
    pub stats: SizeStats,
}

impl SizeReport {
    /// Build a report from per-file line counts.
    pub fn from_counts<I>(counts: I, thresholds: Thresholds) -> Self
    where
        I: IntoIterator<Item = (Utf8PathBuf, usize)>,
    {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut total_files = 0usize;
        let mut total_lines = 0usize;

        for (path, lines) in counts {
            total_files += 1;
            total_lines += lines;
            match thresholds.level(lines) {
                SizeLevel::Error => errors.push(SizeFinding { path, lines }),
                SizeLevel::Warning => warnings.push(SizeFinding { path, lines }),
                SizeLevel::Ok => {}
            }
        }

        sort_largest_first(&mut errors);
        sort_largest_first(&mut warnings);

        let average_lines = total_lines.checked_div(total_files).unwrap_or(0);
        let stats = SizeStats {
            total_files,
            total_lines,
            average_lines,
            warning_files: warnings.len(),
            error_files: errors.len(),
        };

        Self {
            thresholds,
            errors,
            warnings,
            stats,
        }
    }

    /// Returns `true` if no file was flagged at all.
    pub const fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

impl Gate for SizeReport {
    fn blocking_findings(&self) -> usize {
        self.errors.len()
    }
}

fn sort_largest_first(findings: &mut [SizeFinding]) {
    findings.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.path.cmp(&b.path)));
}

/// Audit every Rust source under `root` against the default thresholds.
#[tracing::instrument]
pub fn audit_file_sizes(root: &Utf8Path) -> ScanResult<SizeReport> {
    audit_file_sizes_with(root, Thresholds::default())
}

/// Audit every Rust source under `root` against the given thresholds.
pub fn audit_file_sizes_with(root: &Utf8Path, thresholds: Thresholds) -> ScanResult<SizeReport> {
    let targets = walk::find_files(root, SIZE_EXCLUDED_DIRS, SIZE_EXTENSIONS)?;
    let counts = targets.into_iter().map(|target| {
        let lines = lines::count_target_lines(&target);
        debug!(path = %target.relative, lines, "counted");
        (target.relative, lines)
    });
    Ok(SizeReport::from_counts(counts, thresholds))
}
