//! Todos command - report leftover markers and expected-failure annotations.
//!
//! Advisory by default: markers are listed but never fail the run unless
//! `--policy strict` is given.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use src_audit_core::markers::{self, ExpectedFailure, MarkerReport, Tag, TagGroup};
use src_audit_core::policy::{ExitPolicy, Gate};

use super::resolve_root;

/// Arguments for the `todos` subcommand.
#[derive(Args, Debug)]
pub struct TodosArgs {
    /// Project root to scan (defaults to the current directory).
    pub root: Option<Utf8PathBuf>,

    /// Whether any marker fails the run.
    #[arg(long, value_enum, default_value_t = ExitPolicy::Advisory)]
    pub policy: ExitPolicy,
}

#[derive(Serialize)]
struct TodosOutput<'a> {
    root: &'a Utf8Path,
    policy: ExitPolicy,
    pass: bool,
    total_markers: usize,
    #[serde(flatten)]
    report: &'a MarkerReport,
}

/// Scan the project root for markers.
#[instrument(name = "cmd_todos", skip_all, fields(root = tracing::field::Empty))]
pub fn cmd_todos(args: TodosArgs, global_json: bool, cwd: &Utf8Path) -> anyhow::Result<()> {
    let root = resolve_root(args.root.as_deref(), cwd);
    tracing::Span::current().record("root", root.as_str());
    debug!(root = %root, policy = %args.policy, "executing todos command");

    let report = markers::scan_markers(&root)
        .with_context(|| format!("failed to scan markers under {root}"))?;
    let fails = report.fails(args.policy);

    if global_json {
        let output = TodosOutput {
            root: &root,
            policy: args.policy,
            pass: !fails,
            total_markers: report.total_markers(),
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&root, &report);
    }

    if fails {
        bail!("{} marker(s) found under {root}", report.total_markers());
    }

    Ok(())
}

fn print_report(root: &Utf8Path, report: &MarkerReport) {
    println!("{} {}", "Scanning for TODO/FIXME markers in".bold(), root);
    println!();

    for group in report.groups.iter().filter(|g| !g.markers.is_empty()) {
        print_group(group);
        println!();
    }

    let failures = &report.expected_failures;
    if !failures.is_empty() {
        println!("{}", "Expected failures".bold().underline());
        print_failures("Unimplemented", &failures.unimplemented);
        print_failures("Defects", &failures.defect);
        println!();
    }

    let total = report.total_markers();
    if total == 0 {
        println!("{} no unfinished markers found", "PASS:".green());
    } else {
        println!("{} {} markers found", "Total:".bold(), total);
    }
}

fn print_group(group: &TagGroup) {
    let label = format!("{}:", group.tag);
    let label = match group.tag {
        Tag::Fixme => label.red().to_string(),
        Tag::Todo | Tag::Xxx => label.yellow().to_string(),
    };
    println!("{label} found {} {}s", group.markers.len(), group.tag);
    for marker in &group.markers {
        println!("   {}:{:<4} {}", marker.path, marker.line, marker.preview());
    }
}

fn print_failures(heading: &str, failures: &[ExpectedFailure]) {
    if failures.is_empty() {
        return;
    }
    println!("  {} ({}):", heading.cyan(), failures.len());
    for failure in failures {
        println!("   {} [{}]: {}", failure.path, failure.tag, failure.reason);
    }
}
