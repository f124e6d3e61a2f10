//! Significant-line counting.
//!
//! Rust sources are counted comment-aware: block comments (nested ones
//! included) are blanked out first, then every line is cut at the first
//! `//`. Any other file counts its non-blank lines.
//!
//! The `//` cut is purely textual: a `//` inside a string literal also ends
//! the line. The line still counts as long as something non-blank precedes
//! the cut.
//!
//! `\r\n`, `\n` and a lone `\r` all end a line. Rust sources additionally
//! break at vertical tab, form feed, the `\x1c`..`\x1e` separators, NEL and
//! the Unicode line and paragraph separators.

use std::borrow::Cow;

use tracing::warn;

use crate::walk::ScanTarget;

/// Opens a block comment.
const BLOCK_OPEN: &str = "/*";
/// Closes a block comment.
const BLOCK_CLOSE: &str = "*/";
/// Starts a line comment.
const LINE_COMMENT: &str = "//";

/// How a file's lines are classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Every non-blank line counts.
    Plain,
    /// Comments are stripped before counting non-blank lines.
    Rust,
}

impl LineMode {
    /// Pick the mode for a file extension (without the leading dot).
    pub fn for_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("rs") => Self::Rust,
            _ => Self::Plain,
        }
    }
}

/// Count the significant lines of `text` under the given mode.
pub fn count_lines(text: &str, mode: LineMode) -> usize {
    match mode {
        LineMode::Plain => count_non_blank_lines(text),
        LineMode::Rust => count_rust_code_lines(text),
    }
}

/// Rewrite `\r\n` and lone `\r` line endings as `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Count lines that contain anything besides whitespace.
pub fn count_non_blank_lines(text: &str) -> usize {
    normalize_newlines(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .count()
}

/// Count Rust lines that still hold code once comments are removed.
pub fn count_rust_code_lines(text: &str) -> usize {
    neutralize_block_comments(&normalize_newlines(text))
        .split(is_rust_line_break)
        .map(strip_line_comment)
        .filter(|line| !line.trim().is_empty())
        .count()
}

const fn is_rust_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Replace every block comment with spaces, keeping newlines in place.
///
/// Block comments nest: each `/*` raises the depth and each `*/` lowers it.
/// A `*/` seen at depth zero is ordinary text and survives untouched.
pub fn neutralize_block_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if rest.starts_with(BLOCK_OPEN) {
            depth += 1;
            out.push_str("  ");
            rest = &rest[BLOCK_OPEN.len()..];
        } else if rest.starts_with(BLOCK_CLOSE) {
            if depth > 0 {
                depth -= 1;
                out.push_str("  ");
            } else {
                out.push_str(BLOCK_CLOSE);
            }
            rest = &rest[BLOCK_CLOSE.len()..];
        } else {
            if depth > 0 && c != '\n' {
                out.push(' ');
            } else {
                out.push(c);
            }
            rest = &rest[c.len_utf8()..];
        }
    }

    out
}

fn strip_line_comment(line: &str) -> &str {
    line.split_once(LINE_COMMENT).map_or(line, |(code, _)| code)
}

/// Count the significant lines of a file on disk.
///
/// A file that cannot be read or decoded counts as zero lines; the failure
/// is logged as a warning and never aborts the audit.
pub fn count_target_lines(target: &ScanTarget) -> usize {
    match target.read() {
        Ok(text) => count_lines(&text, LineMode::for_extension(target.extension())),
        Err(err) => {
            warn!(path = %target.relative, error = %err, "unable to read file, counting 0 lines");
            0
        }
    }
}
