//! Source tree traversal.
//!
//! Enumerates files under a project root, pruning excluded directory names
//! at any depth and keeping only files whose name ends with one of the
//! accepted extensions. Both audits share this walker; each passes its own
//! constant extension and exclusion sets.

use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{ScanError, ScanResult};

/// Directory name that marks a helper-script folder inside a project.
///
/// When an audit is started from inside this folder, the project root is
/// its parent.
pub const SCRIPTS_DIR: &str = "scripts";

/// A file discovered under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// Full path to the file.
    pub path: Utf8PathBuf,
    /// Path relative to the scan root; this is what reports show.
    pub relative: Utf8PathBuf,
}

impl ScanTarget {
    /// Read the whole file as UTF-8 text.
    pub fn read(&self) -> ScanResult<String> {
        std::fs::read_to_string(self.path.as_std_path()).map_err(|source| {
            if source.kind() == ErrorKind::InvalidData {
                ScanError::Decode {
                    path: self.relative.clone(),
                }
            } else {
                ScanError::Read {
                    path: self.relative.clone(),
                    source,
                }
            }
        })
    }

    /// Extension of the file, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.path.extension()
    }
}

/// Resolve the project root an audit should run against.
///
/// A start directory named [`SCRIPTS_DIR`] resolves to its parent; any other
/// directory is the root itself.
pub fn resolve_project_root(start: &Utf8Path) -> Utf8PathBuf {
    match (start.file_name(), start.parent()) {
        (Some(SCRIPTS_DIR), Some(parent)) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => start.to_path_buf(),
    }
}

/// Find every file under `root` whose name ends with one of `extensions`.
///
/// Directories named in `excluded_dirs` are never entered, at any depth.
/// The root itself is always entered. Unreadable entries are skipped.
/// Results are sorted by relative path.
#[tracing::instrument(skip(excluded_dirs, extensions))]
pub fn find_files(
    root: &Utf8Path,
    excluded_dirs: &[&str],
    extensions: &[&str],
) -> ScanResult<Vec<ScanTarget>> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let walker = WalkDir::new(root.as_std_path())
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded_dir(entry, excluded_dirs));

    let mut targets = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        let is_file =
            entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping file with non-UTF-8 name");
            continue;
        };
        if !extensions.iter().any(|ext| name.ends_with(ext)) {
            continue;
        }

        let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
            Ok(path) => path,
            Err(path) => {
                warn!(path = %path.display(), "skipping non-UTF-8 path");
                continue;
            }
        };
        let relative = path
            .strip_prefix(root)
            .map_or_else(|_| path.clone(), Utf8Path::to_path_buf);
        targets.push(ScanTarget { path, relative });
    }

    targets.sort_by(|a, b| a.relative.cmp(&b.relative));
    debug!(count = targets.len(), "collected scan targets");
    Ok(targets)
}

fn is_excluded_dir(entry: &DirEntry, excluded_dirs: &[&str]) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded_dirs.contains(&name))
}
