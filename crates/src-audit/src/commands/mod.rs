//! Command implementations.

use camino::{Utf8Path, Utf8PathBuf};

use src_audit_core::walk;

pub mod file_size;
pub mod info;
pub mod todos;

/// Resolve the project root a command audits.
///
/// A relative `arg` is taken relative to `cwd`; with no `arg` the audit
/// starts from `cwd`. Starting inside a `scripts/` folder audits its parent.
pub fn resolve_root(arg: Option<&Utf8Path>, cwd: &Utf8Path) -> Utf8PathBuf {
    let start = match arg {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => cwd.join(path),
        None => cwd.to_path_buf(),
    };
    walk::resolve_project_root(&start)
}
