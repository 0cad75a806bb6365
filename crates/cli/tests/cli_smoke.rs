//! CLI smoke tests for pipewright.
//!
//! These tests verify that all CLI commands run without panicking and
//! return appropriate exit codes.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the pipewright binary.
fn pipewright_cmd() -> Command {
  let mut cmd: Command = cargo_bin_cmd!("pipewright");
  cmd.env_remove("BUILD_NUMBER");
  cmd
}

/// Create a temp directory with a package manifest.
fn temp_project() -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::write(
    temp.path().join("package.json"),
    r#"{ "name": "equation-editor", "version": "1.0.0" }"#,
  )
  .unwrap();
  temp
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  pipewright_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  pipewright_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("pipewright"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["run", "list", "version", "init"] {
    pipewright_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

#[test]
fn run_requires_target() {
  pipewright_cmd().arg("run").assert().failure();
}

#[test]
fn run_rejects_bad_interval() {
  let temp = temp_project();

  pipewright_cmd()
    .current_dir(temp.path())
    .args(["run", "dev", "--interval", "soon"])
    .assert()
    .failure();
}

#[test]
fn run_rejects_zero_interval() {
  let temp = temp_project();

  pipewright_cmd()
    .current_dir(temp.path())
    .args(["run", "dev", "--interval", "0ms"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("interval must be greater than zero"));
}

// =============================================================================
// init
// =============================================================================

#[test]
fn init_creates_config_files() {
  let temp = TempDir::new().unwrap();
  let init_dir = temp.path().join("plugin");

  pipewright_cmd()
    .arg("init")
    .arg(&init_dir)
    .assert()
    .success()
    .stdout(predicate::str::contains("Initialized pipewright project"));

  assert!(init_dir.join("pipewright.toml").exists());
  assert!(init_dir.join("src/text/license-header.js").exists());
  assert!(init_dir.join("webpack.demo.config.js").exists());
}

#[test]
fn init_fails_if_config_exists() {
  let temp = temp_project();
  std::fs::write(temp.path().join("pipewright.toml"), "").unwrap();

  pipewright_cmd()
    .arg("init")
    .arg(temp.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_force_overwrites() {
  let temp = temp_project();
  std::fs::write(temp.path().join("pipewright.toml"), "").unwrap();

  pipewright_cmd().arg("init").arg(temp.path()).arg("--force").assert().success();

  let config = std::fs::read_to_string(temp.path().join("pipewright.toml")).unwrap();
  assert!(config.contains("[pipelines]"));
}

#[test]
fn initialized_project_lists_and_versions() {
  let temp = temp_project();
  pipewright_cmd().arg("init").arg(temp.path()).assert().success();

  pipewright_cmd()
    .current_dir(temp.path())
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("release"));

  pipewright_cmd()
    .current_dir(temp.path())
    .arg("version")
    .assert()
    .success()
    .stdout(predicate::str::contains("1.0.0-0"));
}

// =============================================================================
// config
// =============================================================================

#[test]
fn explicit_missing_config_fails() {
  let temp = temp_project();

  pipewright_cmd()
    .current_dir(temp.path())
    .args(["--config", "/nonexistent/pipewright.toml", "list"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn malformed_config_fails() {
  let temp = temp_project();
  std::fs::write(temp.path().join("pipewright.toml"), "[[task]]\nname = 3\n").unwrap();

  pipewright_cmd()
    .current_dir(temp.path())
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid configuration"));
}
