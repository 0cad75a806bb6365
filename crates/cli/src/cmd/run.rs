//! Implementation of the `pipewright run` command.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::watch;

use pipewright_lib::config::Project;
use pipewright_lib::pipeline::RunReport;

use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success};

/// Execute the run command.
///
/// Runs the named pipeline, or the named task on its own. Watch tasks keep
/// running until Ctrl-C, which ends the run as stopped.
pub fn cmd_run(config: Option<&Path>, target: &str, interval: Option<Duration>, output: OutputFormat) -> Result<()> {
  let project = Project::load(config).context("Failed to load configuration")?;
  let definition = project.target(target)?;

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(async {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        let _ = shutdown_tx.send(true);
      }
    });

    project
      .runner()
      .with_watch_interval(interval)
      .with_shutdown(shutdown_rx)
      .run(&definition)
      .await
  });
  let report = report.with_context(|| format!("Pipeline '{}' failed", definition.name))?;

  if output.is_json() {
    print_json(&report)?;
  } else {
    print_report(&report);
  }

  Ok(())
}

fn print_report(report: &RunReport) {
  println!();
  if report.stopped {
    print_info(&format!(
      "Pipeline '{}' stopped ({})",
      report.pipeline, report.display_version
    ));
  } else {
    print_success(&format!(
      "Pipeline '{}' complete ({})",
      report.pipeline, report.display_version
    ));
  }
  for task in &report.tasks {
    print_stat(
      &format!("{} [{}]", task.name, task.kind),
      &format_duration(task.duration),
    );
    for artifact in &task.artifacts {
      println!(
        "      {}  {}",
        artifact.sha256.short(12),
        artifact.path.display()
      );
    }
  }
  print_stat("Artifacts", &report.artifact_count().to_string());
  print_stat("Duration", &format_duration(report.duration));
}
