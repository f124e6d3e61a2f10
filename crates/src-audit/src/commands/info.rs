//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use src_audit_core::config::{self, Config};
use src_audit_core::markers::MARKER_EXTENSIONS;
use src_audit_core::size::{MAX_LINES_ERROR, MAX_LINES_WARNING, SIZE_EXTENSIONS};
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cache_dir: Option<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config) -> Self {
        Self {
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            cache_dir: config::user_cache_dir().map(|p| p.to_string()),
        }
    }
}

#[derive(Serialize)]
struct AuditInfo {
    max_lines_warning: usize,
    max_lines_error: usize,
    size_extensions: &'static [&'static str],
    marker_extensions: &'static [&'static str],
}

impl AuditInfo {
    const fn new() -> Self {
        Self {
            max_lines_warning: MAX_LINES_WARNING,
            max_lines_error: MAX_LINES_ERROR,
            size_extensions: SIZE_EXTENSIONS,
            marker_extensions: MARKER_EXTENSIONS,
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    audits: AuditInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(_args: InfoArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config),
        audits: AuditInfo::new(),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }
    if !full_info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            full_info.package.repository.cyan()
        );
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
    match full_info.config.log_dir {
        Some(ref dir) => println!("{}: {}", "Log directory".dimmed(), dir),
        None => println!("{}: {}", "Log directory".dimmed(), "(not set)".dimmed()),
    }
    if let Some(ref dir) = full_info.config.cache_dir {
        println!("{}: {}", "Cache directory".dimmed(), dir);
    }

    println!();
    println!("{}", "Audits".bold().underline());
    println!(
        "{}: warn > {}, error > {} ({})",
        "File size".dimmed(),
        full_info.audits.max_lines_warning,
        full_info.audits.max_lines_error,
        full_info.audits.size_extensions.join(" "),
    );
    println!(
        "{}: {}",
        "Markers".dimmed(),
        full_info.audits.marker_extensions.join(" "),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_info_text_succeeds() {
        assert!(cmd_info(InfoArgs::default(), false, &Config::default()).is_ok());
    }

    #[test]
    fn test_cmd_info_json_via_global() {
        assert!(cmd_info(InfoArgs::default(), true, &Config::default()).is_ok());
    }

    #[test]
    fn test_config_info_defaults() {
        let info = ConfigInfo::from_config(&Config::default());
        assert_eq!(info.log_level, "info");
        assert!(info.log_dir.is_none());
    }
}
