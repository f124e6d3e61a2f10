//! File-size command - flag Rust sources with too many significant lines.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use src_audit_core::policy::{ExitPolicy, Gate};
use src_audit_core::size::{self, SizeFinding, SizeReport};

use super::resolve_root;

/// Arguments for the `file-size` subcommand.
#[derive(Args, Debug)]
pub struct FileSizeArgs {
    /// Project root to audit (defaults to the current directory).
    pub root: Option<Utf8PathBuf>,

    /// Whether files over the error threshold fail the run.
    #[arg(long, value_enum, default_value_t = ExitPolicy::Strict)]
    pub policy: ExitPolicy,
}

#[derive(Serialize)]
struct FileSizeOutput<'a> {
    root: &'a Utf8Path,
    policy: ExitPolicy,
    pass: bool,
    #[serde(flatten)]
    report: &'a SizeReport,
}

/// Audit file sizes under the project root.
#[instrument(name = "cmd_file_size", skip_all, fields(root = tracing::field::Empty))]
pub fn cmd_file_size(args: FileSizeArgs, global_json: bool, cwd: &Utf8Path) -> anyhow::Result<()> {
    let root = resolve_root(args.root.as_deref(), cwd);
    tracing::Span::current().record("root", root.as_str());
    debug!(root = %root, policy = %args.policy, "executing file-size command");

    let report = size::audit_file_sizes(&root)
        .with_context(|| format!("failed to audit file sizes under {root}"))?;
    let fails = report.fails(args.policy);

    if global_json {
        let output = FileSizeOutput {
            root: &root,
            policy: args.policy,
            pass: !fails,
            report: &report,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&root, &report);
    }

    if fails {
        bail!(
            "{} file(s) exceed {} significant lines",
            report.errors.len(),
            report.thresholds.error,
        );
    }

    Ok(())
}

fn print_report(root: &Utf8Path, report: &SizeReport) {
    println!("{} {}", "Scanning Rust files in".bold(), root);
    println!(
        "  {}: {} lines",
        "Warning threshold".dimmed(),
        report.thresholds.warning
    );
    println!(
        "  {}: {} lines",
        "Error threshold".dimmed(),
        report.thresholds.error
    );
    println!();

    if !report.errors.is_empty() {
        println!("{} files too large (refactor required):", "ERROR:".red());
        print_findings(&report.errors);
        println!();
    }

    if !report.warnings.is_empty() {
        println!(
            "{} files getting large (consider refactoring):",
            "WARNING:".yellow()
        );
        print_findings(&report.warnings);
        println!();
    }

    if report.is_clean() {
        println!("{} all Rust files are a reasonable size", "PASS:".green());
        println!();
    }

    let stats = &report.stats;
    println!("{}", "Summary".bold().underline());
    println!("  {}: {}", "Files".dimmed(), stats.total_files);
    println!("  {}: {}", "Total lines".dimmed(), stats.total_lines);
    println!("  {}: {}", "Average lines".dimmed(), stats.average_lines);
    println!("  {}: {}", "Warnings".dimmed(), stats.warning_files);
    println!("  {}: {}", "Errors".dimmed(), stats.error_files);
}

fn print_findings(findings: &[SizeFinding]) {
    for finding in findings {
        println!("   {}: {} lines", finding.path, finding.lines);
    }
}
