//! TODO/FIXME marker scanning.
//!
//! Every line of every matched file is searched for whole-word tags
//! (`TODO`, `FIXME`, `XXX`; case-sensitive). Test files may also declare
//! themselves as expected failures in their first lines:
//!
//! ```text
//! // @expect-error: FIXME - crashes on empty input
//! ```
//!
//! Such an annotation is recorded once per file and never as an ordinary
//! marker. Any line containing the annotation prefix is skipped by the
//! ordinary scan, wherever it appears; only the first
//! [`ANNOTATION_HEADER_LINES`] lines can produce an [`ExpectedFailure`].

use std::borrow::Cow;
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ScanResult;
use crate::lines;
use crate::policy::Gate;
use crate::walk;

/// Extensions scanned for markers.
pub const MARKER_EXTENSIONS: &[&str] = &[".rs", ".py", ".sh", ".md", ".brl"];

/// Directory names never entered by the marker scan.
pub const MARKER_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "target",
    "node_modules",
    ".gemini",
    "assets",
    "docs",
    "scripts",
];

/// Literal prefix of an expected-failure annotation.
pub const ANNOTATION_PREFIX: &str = "@expect-error";

/// Number of leading lines inspected for an expected-failure annotation.
pub const ANNOTATION_HEADER_LINES: usize = 5;

/// Previews longer than this many characters are truncated.
pub const PREVIEW_MAX_CHARS: usize = 60;

const PREVIEW_KEEP_CHARS: usize = PREVIEW_MAX_CHARS - 3;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(TODO|FIXME|XXX)\b").expect("tag regex should compile"));

static ANNOTATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@expect-error:\s*(TODO|FIXME|XXX)\b\s*-\s*(.*)")
        .expect("annotation regex should compile")
});

/// A marker tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Tag {
    /// Work not done yet.
    #[serde(rename = "TODO")]
    Todo,
    /// Known breakage.
    #[serde(rename = "FIXME")]
    Fixme,
    /// Generic placeholder.
    #[serde(rename = "XXX")]
    Xxx,
}

impl Tag {
    /// All tags, in report order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::Fixme, Self::Xxx];

    /// The tag as it appears in source.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Fixme => "FIXME",
            Self::Xxx => "XXX",
        }
    }

    /// Parse a tag exactly as written in source.
    pub fn from_source(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_str() == s)
    }

    /// What an expected failure carrying this tag means.
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Fixme => FailureKind::Defect,
            Self::Todo | Self::Xxx => FailureKind::Unimplemented,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of an expected failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// The feature under test is not implemented yet.
    Unimplemented,
    /// The test exposes a known defect.
    Defect,
}

/// One tag occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    /// Path relative to the project root.
    pub path: Utf8PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// The line with surrounding whitespace trimmed.
    pub content: String,
}

impl Marker {
    /// Line content shortened for display.
    pub fn preview(&self) -> Cow<'_, str> {
        preview(&self.content)
    }
}

/// A file declared as an expected failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedFailure {
    /// Path relative to the project root.
    pub path: Utf8PathBuf,
    /// Tag named by the annotation.
    pub tag: Tag,
    /// Free-text reason following the tag.
    pub reason: String,
}

/// Everything found in a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// Ordinary markers, in line order.
    pub markers: Vec<(Tag, Marker)>,
    /// The file's expected-failure annotation, if any.
    pub expected_failure: Option<ExpectedFailure>,
}

/// Scan one file's text.
pub fn scan_text(path: &Utf8Path, text: &str) -> FileScan {
    let mut scan = FileScan::default();

    for (idx, line) in lines::normalize_newlines(text).lines().enumerate() {
        let line_no = idx + 1;

        if line.contains(ANNOTATION_PREFIX) {
            if line_no <= ANNOTATION_HEADER_LINES
                && scan.expected_failure.is_none()
                && let Some(failure) = parse_annotation(path, line)
            {
                scan.expected_failure = Some(failure);
            }
            continue;
        }

        let mut seen: Vec<Tag> = TAG_RE
            .captures_iter(line)
            .filter_map(|cap| Tag::from_source(&cap[1]))
            .collect();
        seen.sort();
        seen.dedup();

        for tag in seen {
            scan.markers.push((
                tag,
                Marker {
                    path: path.to_path_buf(),
                    line: line_no,
                    content: line.trim().to_string(),
                },
            ));
        }
    }

    scan
}

fn parse_annotation(path: &Utf8Path, line: &str) -> Option<ExpectedFailure> {
    let cap = ANNOTATION_RE.captures(line)?;
    let tag = Tag::from_source(&cap[1])?;
    Some(ExpectedFailure {
        path: path.to_path_buf(),
        tag,
        reason: cap[2].trim().to_string(),
    })
}

/// Shorten `content` to at most [`PREVIEW_MAX_CHARS`] characters.
pub fn preview(content: &str) -> Cow<'_, str> {
    if content.chars().count() > PREVIEW_MAX_CHARS {
        let kept: String = content.chars().take(PREVIEW_KEEP_CHARS).collect();
        Cow::Owned(format!("{kept}..."))
    } else {
        Cow::Borrowed(content)
    }
}

/// Markers sharing one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagGroup {
    /// The tag.
    pub tag: Tag,
    /// Occurrences, ordered by path then line.
    pub markers: Vec<Marker>,
}

/// Expected failures split by meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpectedFailures {
    /// Not yet implemented (`TODO`, `XXX`).
    pub unimplemented: Vec<ExpectedFailure>,
    /// Known defects (`FIXME`).
    pub defect: Vec<ExpectedFailure>,
}

impl ExpectedFailures {
    /// Total number of expected failures.
    pub const fn len(&self) -> usize {
        self.unimplemented.len() + self.defect.len()
    }

    /// Returns `true` if no file declared an expected failure.
    pub const fn is_empty(&self) -> bool {
        self.unimplemented.is_empty() && self.defect.is_empty()
    }

    fn push(&mut self, failure: ExpectedFailure) {
        match failure.tag.failure_kind() {
            FailureKind::Unimplemented => self.unimplemented.push(failure),
            FailureKind::Defect => self.defect.push(failure),
        }
    }
}

/// Result of a marker scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerReport {
    /// Files read and scanned.
    pub files_scanned: usize,
    /// Files skipped because they could not be read.
    pub files_skipped: usize,
    /// One group per tag, in [`Tag::ALL`] order.
    pub groups: Vec<TagGroup>,
    /// Expected-failure annotations.
    pub expected_failures: ExpectedFailures,
}

impl Default for MarkerReport {
    fn default() -> Self {
        Self {
            files_scanned: 0,
            files_skipped: 0,
            groups: Tag::ALL
                .into_iter()
                .map(|tag| TagGroup {
                    tag,
                    markers: Vec::new(),
                })
                .collect(),
            expected_failures: ExpectedFailures::default(),
        }
    }
}

impl MarkerReport {
    /// Fold one file's scan into the report.
    pub fn add(&mut self, scan: FileScan) {
        self.files_scanned += 1;
        for (tag, marker) in scan.markers {
            if let Some(group) = self.groups.iter_mut().find(|g| g.tag == tag) {
                group.markers.push(marker);
            }
        }
        if let Some(failure) = scan.expected_failure {
            self.expected_failures.push(failure);
        }
    }

    /// Sort every list into its report order.
    pub fn finish(mut self) -> Self {
        for group in &mut self.groups {
            group
                .markers
                .sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
        }
        self.expected_failures
            .unimplemented
            .sort_by(|a, b| a.path.cmp(&b.path));
        self.expected_failures
            .defect
            .sort_by(|a, b| a.path.cmp(&b.path));
        self
    }

    /// Markers recorded for `tag`.
    pub fn markers(&self, tag: Tag) -> &[Marker] {
        self.groups
            .iter()
            .find(|g| g.tag == tag)
            .map(|g| g.markers.as_slice())
            .unwrap_or_default()
    }

    /// Total ordinary markers across all tags.
    pub fn total_markers(&self) -> usize {
        self.groups.iter().map(|g| g.markers.len()).sum()
    }
}

impl Gate for MarkerReport {
    fn blocking_findings(&self) -> usize {
        self.total_markers()
    }
}

/// Scan every matching file under `root` for markers.
///
/// Files that cannot be read are skipped with a warning.
#[tracing::instrument]
pub fn scan_markers(root: &Utf8Path) -> ScanResult<MarkerReport> {
    let targets = walk::find_files(root, MARKER_EXCLUDED_DIRS, MARKER_EXTENSIONS)?;
    let mut report = MarkerReport::default();

    for target in targets {
        match target.read() {
            Ok(text) => {
                let scan = scan_text(&target.relative, &text);
                debug!(path = %target.relative, markers = scan.markers.len(), "scanned");
                report.add(scan);
            }
            Err(err) => {
                warn!(path = %target.relative, error = %err, "unable to read file, skipping");
                report.files_skipped += 1;
            }
        }
    }

    Ok(report.finish())
}
