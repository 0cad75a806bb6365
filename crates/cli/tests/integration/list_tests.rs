//! `pipewright list`.

use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn lists_pipelines_in_order() {
  let env = TestEnv::from_fixture("release.toml");

  env
    .pipewright_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("Pipelines:"))
    .stdout(predicate::str::contains("clean"))
    .stdout(predicate::str::contains("typecheck [typecheck]"))
    .stdout(predicate::str::contains("version [custom-action]"));
}

#[test]
fn json_lists_producers() {
  let env = TestEnv::from_fixture("release.toml");

  let output = env.pipewright_cmd().args(["list", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  let pipelines = list["pipelines"].as_array().unwrap();
  let release = pipelines.iter().find(|p| p["name"] == "release").unwrap();
  assert_eq!(release["tasks"][0], "clean");
  assert_eq!(release["tasks"][6], "version");

  let minify = list["tasks"]
    .as_array()
    .unwrap()
    .iter()
    .find(|t| t["name"] == "minify")
    .unwrap();
  assert_eq!(minify["after"], serde_json::json!(["bundle"]));
}

#[test]
fn unknown_task_in_pipeline_fails_to_load() {
  let env = TestEnv::from_fixture("unknown_task.toml");

  env
    .pipewright_cmd()
    .arg("list")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown task 'deploy'"));
}

#[test]
fn builtin_template_used_without_config() {
  let env = TestEnv::empty();
  env.write_file("package.json", r#"{ "name": "equation-editor", "version": "1.0.0" }"#);

  env
    .pipewright_cmd()
    .arg("list")
    .assert()
    .success()
    .stdout(predicate::str::contains("built-in"))
    .stdout(predicate::str::contains("watch-demo"));
}
