//! Implementation of the `pipewright list` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use pipewright_lib::config::Project;
use pipewright_lib::pipeline::{ArtifactFlow, PipelineDefinition};

use crate::output::{OutputFormat, print_info, print_json, symbols};

#[derive(Serialize)]
struct TaskSummary<'a> {
  name: &'a str,
  kind: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  description: Option<&'a str>,
  inputs: &'a [PathBuf],
  outputs: &'a [PathBuf],
  after: Vec<&'a str>,
}

#[derive(Serialize)]
struct ListOutput<'a> {
  source: String,
  pipelines: Vec<&'a PipelineDefinition>,
  tasks: Vec<TaskSummary<'a>>,
}

/// Print every pipeline with its ordered tasks, then every registered task.
pub fn cmd_list(config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = Project::load(config).context("Failed to load configuration")?;
  let flow = ArtifactFlow::from_registry(project.registry());

  let tasks: Vec<TaskSummary<'_>> = project
    .registry()
    .iter()
    .map(|task| TaskSummary {
      name: &task.name,
      kind: task.kind.label(),
      description: task.description.as_deref(),
      inputs: &task.inputs,
      outputs: &task.outputs,
      after: flow.producers_of(&task.name).into_iter().map(|(name, _)| name).collect(),
    })
    .collect();

  if output.is_json() {
    return print_json(&ListOutput {
      source: project.source().to_string(),
      pipelines: project.pipelines().values().collect(),
      tasks,
    });
  }

  print_info(&format!("Configuration: {}", project.source()));
  println!();
  println!("{}", "Pipelines:".if_supports_color(Stream::Stdout, |s| s.bold()));
  for pipeline in project.pipelines().values() {
    println!(
      "  {} {}",
      pipeline.name.if_supports_color(Stream::Stdout, |s| s.cyan()),
      pipeline.tasks.join(format!(" {} ", symbols::ARROW).as_str())
    );
  }

  println!();
  println!("{}", "Tasks:".if_supports_color(Stream::Stdout, |s| s.bold()));
  for task in &tasks {
    println!(
      "  {} [{}]{}",
      task.name.if_supports_color(Stream::Stdout, |s| s.cyan()),
      task.kind,
      task.description.map(|d| format!(" {d}")).unwrap_or_default()
    );
    for input in task.inputs {
      println!("      {} {}", symbols::MINUS, input.display());
    }
    for out in task.outputs {
      println!("      {} {}", symbols::PLUS, out.display());
    }
  }

  Ok(())
}
