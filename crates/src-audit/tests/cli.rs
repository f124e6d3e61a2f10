//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Write `lines` distinct code lines to `root/rel`.
fn write_code(root: &Path, rel: &str, lines: usize) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let body: String = (0..lines).map(|i| format!("let v{i} = {i};\n")).collect();
    fs::write(path, body).unwrap();
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Run a command with `--json` from `dir` and parse stdout.
fn json_output(dir: &Path, args: &[&str]) -> (Value, bool) {
    let output = cmd()
        .arg("-C")
        .arg(dir)
        .arg("--json")
        .args(args)
        .output()
        .expect("failed to run command");
    let json = serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    (json, output.status.success())
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("file-size"))
        .stdout(predicate::str::contains("todos"));
}

#[test]
fn no_arguments_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

// =============================================================================
// file-size
// =============================================================================

#[test]
fn file_size_clean_tree_succeeds() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "src/lib.rs", 40);

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .arg("file-size")
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS:"))
        .stdout(predicate::str::contains("Files"));
}

#[test]
fn file_size_error_bucket_fails_run() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "src/big.rs", 505);
    write_code(tmp.path(), "src/small.rs", 50);

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .arg("file-size")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("src/big.rs: 505 lines"))
        .stdout(predicate::str::contains("src/small.rs").not())
        .stdout(predicate::str::contains("277"))
        .stderr(predicate::str::contains("exceed 500"));
}

#[test]
fn file_size_json_report() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "src/big.rs", 505);
    write_code(tmp.path(), "src/small.rs", 50);

    let (json, success) = json_output(tmp.path(), &["file-size"]);
    assert!(!success);
    assert_eq!(json["pass"], false);
    assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    assert_eq!(json["errors"][0]["path"], "src/big.rs");
    assert_eq!(json["errors"][0]["lines"], 505);
    assert!(json["warnings"].as_array().unwrap().is_empty());
    assert_eq!(json["stats"]["total_files"], 2);
    assert_eq!(json["stats"]["average_lines"], 277);
}

#[test]
fn file_size_threshold_boundaries() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "at_warning.rs", 300);
    write_code(tmp.path(), "over_warning.rs", 301);
    write_code(tmp.path(), "at_error.rs", 500);

    let (json, success) = json_output(tmp.path(), &["file-size"]);
    assert!(success, "warnings alone must not fail the run");
    let warnings: Vec<&str> = json["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["path"].as_str().unwrap())
        .collect();
    assert_eq!(warnings, vec!["at_error.rs", "over_warning.rs"]);
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[test]
fn file_size_ignores_comments_and_excluded_dirs() {
    let tmp = TempDir::new().unwrap();
    let mut text: String = (0..200).map(|i| format!("let v{i} = {i};\n")).collect();
    text.push_str("/* outer /* inner */\n");
    text.push_str(&"dead code\n".repeat(600));
    text.push_str("*/\n");
    write(tmp.path(), "src/lib.rs", &text);
    write_code(tmp.path(), "target/debug/generated.rs", 5000);
    write_code(tmp.path(), "node_modules/pkg/x.rs", 5000);

    let (json, success) = json_output(tmp.path(), &["file-size"]);
    assert!(success);
    assert_eq!(json["stats"]["total_files"], 1);
    assert_eq!(json["stats"]["total_lines"], 200);
}

#[test]
fn file_size_advisory_policy_never_fails() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "huge.rs", 900);

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["file-size", "--policy", "advisory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("huge.rs: 900 lines"));
}

#[test]
fn file_size_from_scripts_dir_audits_parent() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "src/big.rs", 600);
    fs::create_dir_all(tmp.path().join("scripts")).unwrap();

    let (json, success) = json_output(&tmp.path().join("scripts"), &["file-size"]);
    assert!(!success);
    assert_eq!(json["errors"][0]["path"], "src/big.rs");
}

#[test]
fn file_size_explicit_root_argument() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "project/a.rs", 10);

    let (json, success) = json_output(tmp.path(), &["file-size", "project"]);
    assert!(success);
    assert_eq!(json["stats"]["total_files"], 1);
}

#[test]
fn file_size_missing_root_fails() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["file-size", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a directory"));
}

#[test]
fn file_size_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    write_code(tmp.path(), "a.rs", 320);
    write_code(tmp.path(), "b.rs", 320);
    write_code(tmp.path(), "c.rs", 520);

    let first = cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["--color", "never", "file-size"])
        .output()
        .unwrap();
    let second = cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["--color", "never", "file-size"])
        .output()
        .unwrap();
    assert_eq!(first.stdout, second.stdout);
    assert_eq!(first.status.code(), second.status.code());
}

// =============================================================================
// todos
// =============================================================================

#[test]
fn todos_reports_markers_and_expected_failures() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "tests/case.brl",
        "@expect-error: FIXME - known crash\nfn main() {}\n// TODO fix this\n",
    );

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .arg("todos")
        .assert()
        .success()
        .stdout(predicate::str::contains("tests/case.brl:3"))
        .stdout(predicate::str::contains("// TODO fix this"))
        .stdout(predicate::str::contains("known crash"))
        .stdout(predicate::str::contains("Defects"));
}

#[test]
fn todos_json_report() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "tests/case.brl",
        "@expect-error: FIXME - known crash\nfn main() {}\n// TODO fix this\n",
    );
    write(tmp.path(), "src/lib.rs", "let TODONT = 1;\n");

    let (json, success) = json_output(tmp.path(), &["todos"]);
    assert!(success);
    assert_eq!(json["total_markers"], 1);
    assert_eq!(json["groups"][0]["tag"], "TODO");
    assert_eq!(json["groups"][0]["markers"][0]["path"], "tests/case.brl");
    assert_eq!(json["groups"][0]["markers"][0]["line"], 3);
    assert!(json["groups"][1]["markers"].as_array().unwrap().is_empty());
    let defect = &json["expected_failures"]["defect"][0];
    assert_eq!(defect["tag"], "FIXME");
    assert_eq!(defect["reason"], "known crash");
    assert!(
        json["expected_failures"]["unimplemented"]
            .as_array()
            .unwrap()
            .is_empty()
    );
}

#[test]
fn todos_truncates_long_lines() {
    let tmp = TempDir::new().unwrap();
    let long = format!("// TODO {}", "x".repeat(100));
    write(tmp.path(), "notes.md", &long);

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .arg("todos")
        .assert()
        .success()
        .stdout(predicate::str::contains("..."))
        .stdout(predicate::str::contains(long.as_str()).not());
}

#[test]
fn todos_clean_tree() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/lib.rs", "fn main() {}\n");

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .arg("todos")
        .assert()
        .success()
        .stdout(predicate::str::contains("no unfinished markers"));
}

#[test]
fn todos_skips_excluded_dirs() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "docs/plan.md", "TODO write docs\n");
    write(tmp.path(), "scripts/run.sh", "# FIXME flaky\n");
    write(tmp.path(), "assets/readme.md", "XXX\n");

    let (json, success) = json_output(tmp.path(), &["todos"]);
    assert!(success);
    assert_eq!(json["total_markers"], 0);
    assert_eq!(json["files_scanned"], 0);
}

#[test]
fn todos_strict_policy_fails_on_markers() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "src/lib.rs", "// FIXME broken\n");

    cmd()
        .arg("-C")
        .arg(tmp.path())
        .args(["todos", "--policy", "strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 marker(s) found"));
}

// =============================================================================
// Unreadable Files
// =============================================================================

#[test]
fn file_size_warns_on_undecodable_file_and_continues() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.rs"), [0xff_u8, 0xfe, 0xfd, 0x0a]).unwrap();
    write_code(tmp.path(), "good.rs", 12);

    cmd()
        .env_remove("RUST_LOG")
        .env_remove("SRC_AUDIT_LOG_LEVEL")
        .arg("-C")
        .arg(tmp.path())
        .arg("file-size")
        .assert()
        .success()
        .stderr(predicate::str::contains("unable to read file"))
        .stderr(predicate::str::contains("bad.rs"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn todos_warns_on_undecodable_file_and_continues() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.md"), [0xff_u8, 0xfe, 0xfd]).unwrap();
    write(tmp.path(), "notes.md", "TODO keep going\n");

    cmd()
        .env_remove("RUST_LOG")
        .env_remove("SRC_AUDIT_LOG_LEVEL")
        .arg("-C")
        .arg(tmp.path())
        .arg("todos")
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.md:1"))
        .stderr(predicate::str::contains("unable to read file"))
        .stderr(predicate::str::contains("bad.md"));
}

#[test]
fn color_always_keeps_escapes_on_stderr() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("bad.rs"), [0xff_u8, 0xfe]).unwrap();

    cmd()
        .env_remove("RUST_LOG")
        .env_remove("SRC_AUDIT_LOG_LEVEL")
        .arg("-C")
        .arg(tmp.path())
        .args(["--color", "always", "file-size"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\u{1b}["));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: Value = serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["audits"]["max_lines_warning"], 300);
    assert_eq!(json["audits"]["max_lines_error"], 500);
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}
