//! `pipewright run` against the release fixture.

#![cfg(unix)]

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn release_writes_version_without_build_number() {
  let env = TestEnv::release_project();

  env
    .pipewright_cmd()
    .args(["run", "release"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Pipeline 'release' complete (1.0.0-0)"));

  assert_eq!(env.read_file("dist/equation-editor/version.txt"), "1.0.0-0");
  assert!(env.exists("dist/equation-editor/LICENSE"));
  assert!(env.exists("dist/equation-editor/CHANGELOG.md"));
  assert!(env.exists("dist/equation-editor/editor/index.html"));
}

#[test]
fn release_uses_build_number_from_environment() {
  let env = TestEnv::release_project();
  env.write_file("package.json", r#"{ "name": "equation-editor", "version": "2.3.1" }"#);

  env
    .pipewright_cmd()
    .env("BUILD_NUMBER", "42")
    .args(["run", "release"])
    .assert()
    .success();

  assert_eq!(env.read_file("dist/equation-editor/version.txt"), "2.3.1-42");
}

#[test]
fn release_stamps_license_header_into_both_bundles() {
  let env = TestEnv::release_project();

  env.pipewright_cmd().args(["run", "release"]).assert().success();

  let full = env.read_file("dist/equation-editor/plugin.js");
  let min = env.read_file("dist/equation-editor/plugin.min.js");
  assert!(full.starts_with("// v1.0.0-0\n"), "unexpected header: {full}");
  assert!(!full.contains("@BUILD_NUMBER@"));
  assert!(full.contains("(function () {"));
  assert_eq!(full, min);
}

#[test]
fn release_clears_previous_output() {
  let env = TestEnv::release_project();
  env.write_file("dist/stale.txt", "old");
  env.write_file("scratch/leftover.js", "old");

  env.pipewright_cmd().args(["run", "release"]).assert().success();

  assert!(!env.exists("dist/stale.txt"));
  assert!(!env.exists("scratch/leftover.js"));
}

#[test]
fn lint_failure_stops_pipeline() {
  let env = TestEnv::release_project();
  env.write_file("src/main/ts/Main.ts", "var x = 1;\n");
  env.write_file("scratch/compiled/plugin.js", "stale");

  env
    .pipewright_cmd()
    .args(["run", "release"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("task 'lint' failed (step 2 of 7)"))
    .stderr(predicate::str::contains("exited with code 2"))
    .stderr(predicate::str::contains("var x = 1;"));

  // clean ran first, bundle never did
  assert!(!env.exists("scratch/compiled/plugin.js"));
  assert!(!env.exists("dist/equation-editor/version.txt"));
}

#[test]
fn single_task_runs_alone() {
  let env = TestEnv::release_project();
  env.write_file("dist/keep.txt", "kept");

  env.pipewright_cmd().args(["run", "version"]).assert().success();

  assert_eq!(env.read_file("dist/equation-editor/version.txt"), "1.0.0-0");
  assert!(env.exists("dist/keep.txt"));
}

#[test]
fn unknown_target_fails() {
  let env = TestEnv::release_project();

  env
    .pipewright_cmd()
    .args(["run", "deploy"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown task 'deploy'"));
}

#[test]
fn missing_input_is_reported() {
  let env = TestEnv::release_project();
  std::fs::remove_file(env.path().join("lib/main/ts/Main.js")).unwrap();

  env
    .pipewright_cmd()
    .args(["run", "release"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("task 'bundle' is missing input"));
}

#[test]
fn json_report_lists_artifacts() {
  let env = TestEnv::release_project();

  let output = env
    .pipewright_cmd()
    .args(["--output", "json", "run", "release"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["pipeline"], "release");
  assert_eq!(report["display_version"], "1.0.0-0");
  assert_eq!(report["tasks"].as_array().unwrap().len(), 7);
  assert_eq!(report["tasks"][1]["name"], "lint");
}

#[test]
fn pipeline_reading_before_producing_is_rejected() {
  let env = TestEnv::from_fixture("backwards.toml");
  env.write_file("lib/main/ts/Main.js", "main();\n");

  env
    .pipewright_cmd()
    .args(["run", "release"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("minify"));

  assert!(!env.exists("scratch"));
}
