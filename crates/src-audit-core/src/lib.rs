//! Core library for src-audit.
//!
//! Two read-only audits over a project's source tree, meant to run in CI:
//!
//! - [`size`] - flags files whose significant line count is too high
//! - [`markers`] - reports `TODO`/`FIXME`/`XXX` markers and expected-failure
//!   annotations in test files
//!
//! # Modules
//!
//! - [`walk`] - Source tree traversal and project root resolution
//! - [`lines`] - Comment-aware line counting
//! - [`policy`] - Strict/advisory exit policies
//! - [`config`] - Runtime settings
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use camino::Utf8Path;
//! use src_audit_core::{ExitPolicy, Gate, size};
//!
//! let report = size::audit_file_sizes(Utf8Path::new(".")).expect("audit failed");
//! for finding in &report.errors {
//!     println!("{}: {} lines", finding.path, finding.lines);
//! }
//! assert!(!report.fails(ExitPolicy::Advisory));
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod lines;
pub mod markers;
pub mod policy;
pub mod size;
pub mod walk;

pub use config::{Config, ConfigLoader, LogLevel};
pub use error::{ConfigError, ConfigResult, ScanError, ScanResult};
pub use policy::{ExitPolicy, Gate};
