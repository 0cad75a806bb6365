//! `pipewright version`.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn prints_display_version() {
  let env = TestEnv::from_fixture("release.toml");

  env
    .pipewright_cmd()
    .arg("version")
    .assert()
    .success()
    .stdout(predicate::str::diff("1.0.0-0\n"));
}

#[test]
fn honours_build_number() {
  let env = TestEnv::from_fixture("release.toml");

  env
    .pipewright_cmd()
    .env("BUILD_NUMBER", "17")
    .arg("version")
    .assert()
    .success()
    .stdout(predicate::str::diff("1.0.0-17\n"));
}

#[test]
fn rejects_non_numeric_build_number() {
  let env = TestEnv::from_fixture("release.toml");

  env
    .pipewright_cmd()
    .env("BUILD_NUMBER", "nightly")
    .arg("version")
    .assert()
    .failure()
    .stderr(predicate::str::contains("build number must be numeric"));
}

#[test]
fn json_output() {
  let env = TestEnv::from_fixture("release.toml");

  let output = env.pipewright_cmd().args(["version", "--output", "json"]).output().unwrap();
  assert!(output.status.success());

  let version: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(version["name"], "equation-editor");
  assert_eq!(version["build_number"], "0");
  assert_eq!(version["display_version"], "1.0.0-0");
}

#[test]
fn missing_manifest_fails() {
  let env = TestEnv::empty();
  std::fs::write(&env.config_path, "").unwrap();

  env
    .pipewright_cmd()
    .arg("version")
    .assert()
    .failure()
    .stderr(predicate::str::contains("package manifest not found"));
}
