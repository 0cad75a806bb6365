//! Pipeline errors and run reports.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use super::FlowError;
use crate::execute::ExecuteError;
use crate::task::RegistryError;
use crate::util::hash::{ContentHash, HashError};
use crate::watch::WatchError;

/// Why a pipeline stopped.
///
/// Only [`PipelineError::TaskFailed`] wraps a lower-level error with the
/// failing task's name and position; the others are raised by the runner
/// itself and already name what they concern.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error(transparent)]
  Flow(#[from] FlowError),

  #[error("pipeline '{0}' has no tasks")]
  Empty(String),

  #[error("task '{task}' is missing input {}", path.display())]
  MissingInput { task: String, path: PathBuf },

  #[error("task '{task}' did not produce output {}", path.display())]
  MissingOutput { task: String, path: PathBuf },

  #[error("task '{task}' failed (step {position} of {total})")]
  TaskFailed {
    task: String,
    position: usize,
    total: usize,
    #[source]
    source: ExecuteError,
  },

  #[error("task '{task}' could not start live reload on port {port}")]
  LiveReload {
    task: String,
    port: u16,
    #[source]
    source: io::Error,
  },

  #[error("task '{task}' could not watch its sources")]
  Watch {
    task: String,
    #[source]
    source: WatchError,
  },

  #[error("failed to digest output of task '{task}'")]
  Digest {
    task: String,
    #[source]
    source: HashError,
  },
}

/// A produced artifact and its content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
  pub path: PathBuf,
  pub sha256: ContentHash,
}

/// One completed task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
  pub name: String,
  pub kind: &'static str,
  #[serde(serialize_with = "serialize_millis")]
  pub duration: Duration,
  pub artifacts: Vec<ArtifactRecord>,
}

/// A pipeline run that ended without error.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
  pub pipeline: String,
  pub display_version: String,
  pub tasks: Vec<TaskReport>,
  /// The run ended because a watch task was shut down rather than by
  /// finishing its last task.
  pub stopped: bool,
  #[serde(serialize_with = "serialize_millis")]
  pub duration: Duration,
}

impl RunReport {
  pub fn artifact_count(&self) -> usize {
    self.tasks.iter().map(|t| t.artifacts.len()).sum()
  }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.serialize_u64(duration.as_millis() as u64)
}
