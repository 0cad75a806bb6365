use std::path::PathBuf;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{ArtifactRecord, PipelineDefinition, PipelineError, RunReport, TaskReport, validate_artifact_flow};
use crate::config::BuildMetadata;
use crate::consts::DEFAULT_STAMP_TOKEN;
use crate::execute::{self, TaskContext};
use crate::livereload::LiveReloadServer;
use crate::substitution::SubstitutionContext;
use crate::task::{Task, TaskKind, TaskRegistry};
use crate::util::hash::hash_path;
use crate::watch::{WatchOptions, watch_task};

/// Executes pipelines strictly in order, stopping at the first failure.
///
/// For every task the runner:
/// 1. checks that each required input exists,
/// 2. executes the task,
/// 3. checks that each declared output exists and digests it.
///
/// Outputs of earlier tasks are left in place when a later task fails.
pub struct Runner<'a> {
  registry: &'a TaskRegistry,
  metadata: &'a BuildMetadata,
  root: PathBuf,
  stamp: SubstitutionContext,
  watch_interval: Option<Duration>,
  shutdown: Option<watch::Receiver<bool>>,
}

impl<'a> Runner<'a> {
  pub fn new(registry: &'a TaskRegistry, metadata: &'a BuildMetadata, root: impl Into<PathBuf>) -> Self {
    Self {
      registry,
      metadata,
      root: root.into(),
      stamp: metadata.substitution_context(DEFAULT_STAMP_TOKEN),
      watch_interval: None,
      shutdown: None,
    }
  }

  /// Token replaced by the display version in stamped headers.
  pub fn with_stamp_token(mut self, token: &str) -> Self {
    self.stamp = self.metadata.substitution_context(token);
    self
  }

  /// Debounce window for watch tasks, overriding each task's own.
  pub fn with_watch_interval(mut self, interval: Option<Duration>) -> Self {
    self.watch_interval = interval;
    self
  }

  /// Signal that ends watch tasks. Without one, watch tasks run until Ctrl-C.
  pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
    self.shutdown = Some(shutdown);
    self
  }

  /// Run a pipeline.
  ///
  /// Every task name is resolved and the artifact flow checked before the
  /// first task starts, so a misconfigured pipeline executes nothing. A watch
  /// task can only be last; once it is shut down the run ends and the report
  /// is marked as stopped.
  pub async fn run(&self, definition: &PipelineDefinition) -> Result<RunReport, PipelineError> {
    if definition.is_empty() {
      return Err(PipelineError::Empty(definition.name.clone()));
    }
    definition.validate(self.registry)?;
    validate_artifact_flow(definition, self.registry)?;

    let started = Instant::now();
    let total = definition.len();
    info!(pipeline = %definition.name, tasks = total, version = %self.metadata.display_version(), "starting pipeline");

    let mut reports = Vec::with_capacity(total);
    let mut stopped = false;
    for (index, name) in definition.tasks.iter().enumerate() {
      let task = self.registry.resolve(name)?;
      reports.push(self.run_step(task, index + 1, total).await?);
      if task.kind.is_watch() {
        stopped = true;
        break;
      }
    }

    let duration = started.elapsed();
    if stopped {
      info!(pipeline = %definition.name, elapsed = ?duration, "pipeline stopped");
    } else {
      info!(pipeline = %definition.name, elapsed = ?duration, "pipeline complete");
    }
    Ok(RunReport {
      pipeline: definition.name.clone(),
      display_version: self.metadata.display_version(),
      tasks: reports,
      stopped,
      duration,
    })
  }

  /// Run a single registered task as a one-step pipeline.
  pub async fn run_task(&self, name: &str) -> Result<RunReport, PipelineError> {
    self.run(&PipelineDefinition::new(name, [name])).await
  }

  async fn run_step(&self, task: &Task, position: usize, total: usize) -> Result<TaskReport, PipelineError> {
    let ctx = TaskContext::new(&self.root, self.metadata, &self.stamp);
    info!(task = %task.name, kind = task.kind.label(), "[{position}/{total}] {}", task.name);

    for input in task.required_inputs() {
      if !ctx.path(input).exists() {
        return Err(PipelineError::MissingInput {
          task: task.name.clone(),
          path: input.to_path_buf(),
        });
      }
    }

    let started = Instant::now();
    if let TaskKind::WatchBundle {
      watch,
      interval_ms,
      livereload_port,
      ..
    } = &task.kind
    {
      self.run_watch(task, ctx, watch, *interval_ms, *livereload_port).await?;
    } else {
      let outcome = execute::execute_task(task, ctx)
        .await
        .map_err(|source| PipelineError::TaskFailed {
          task: task.name.clone(),
          position,
          total,
          source,
        })?;
      outcome.log(&task.name);

      if let Some(missing) = task.outputs.iter().find(|o| !ctx.path(o).exists()) {
        return Err(PipelineError::MissingOutput {
          task: task.name.clone(),
          path: missing.clone(),
        });
      }
    }
    let duration = started.elapsed();

    let artifacts = self.digest_outputs(task, ctx)?;
    debug!(task = %task.name, artifacts = artifacts.len(), elapsed = ?duration, "task complete");

    Ok(TaskReport {
      name: task.name.clone(),
      kind: task.kind.label(),
      duration,
      artifacts,
    })
  }

  async fn run_watch(
    &self,
    task: &Task,
    ctx: TaskContext<'_>,
    watch: &[PathBuf],
    interval_ms: u64,
    livereload_port: Option<u16>,
  ) -> Result<(), PipelineError> {
    let livereload = match livereload_port {
      Some(port) => Some(
        LiveReloadServer::bind(("127.0.0.1", port))
          .await
          .map_err(|source| PipelineError::LiveReload {
            task: task.name.clone(),
            port,
            source,
          })?,
      ),
      None => None,
    };
    let options = WatchOptions {
      paths: watch.iter().map(|p| ctx.path(p)).collect(),
      debounce: self.watch_interval.unwrap_or(Duration::from_millis(interval_ms)),
    };

    let summary = watch_task(task, ctx, &options, livereload.as_ref(), self.shutdown_signal())
      .await
      .map_err(|source| PipelineError::Watch {
        task: task.name.clone(),
        source,
      })?;
    if summary.failures > 0 {
      warn!(task = %task.name, failures = summary.failures, "watch ended with failed compiles");
    }
    Ok(())
  }

  fn shutdown_signal(&self) -> watch::Receiver<bool> {
    if let Some(shutdown) = &self.shutdown {
      return shutdown.clone();
    }

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        let _ = tx.send(true);
      }
    });
    rx
  }

  /// Digest declared outputs. Watch tasks may stop before ever producing
  /// output, so absent outputs are skipped here; other kinds were already
  /// checked.
  fn digest_outputs(&self, task: &Task, ctx: TaskContext<'_>) -> Result<Vec<ArtifactRecord>, PipelineError> {
    let mut artifacts = Vec::with_capacity(task.outputs.len());
    for output in &task.outputs {
      let path = ctx.path(output);
      if !path.exists() {
        continue;
      }
      let sha256 = hash_path(&path).map_err(|source| PipelineError::Digest {
        task: task.name.clone(),
        source,
      })?;
      artifacts.push(ArtifactRecord {
        path: output.clone(),
        sha256,
      });
    }
    Ok(artifacts)
  }
}
