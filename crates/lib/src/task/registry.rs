use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use super::Task;
use crate::util::path::normalize;

#[derive(Debug, Error)]
pub enum RegistryError {
  #[error("task '{0}' is already registered")]
  DuplicateTask(String),

  #[error("output {} of task '{task}' is already produced by task '{owner}'", path.display())]
  DuplicateOutput { task: String, owner: String, path: PathBuf },

  #[error("unknown task '{0}'")]
  UnknownTask(String),

  #[error("invalid task '{task}': {reason}")]
  InvalidTask { task: String, reason: String },
}

/// Named tasks in registration order.
///
/// Every output path is owned by exactly one task; registering a second task
/// that declares an already-owned output fails.
#[derive(Debug, Default)]
pub struct TaskRegistry {
  tasks: Vec<Task>,
  index: HashMap<String, usize>,
  outputs: HashMap<PathBuf, String>,
}

impl TaskRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add a task.
  ///
  /// # Errors
  ///
  /// Fails if the task is structurally invalid, its name is taken, or one of
  /// its outputs is already declared (by another task or twice by this one).
  pub fn register(&mut self, task: Task) -> Result<(), RegistryError> {
    task.validate().map_err(|reason| RegistryError::InvalidTask {
      task: task.name.clone(),
      reason,
    })?;

    if self.index.contains_key(&task.name) {
      return Err(RegistryError::DuplicateTask(task.name));
    }

    let mut claimed: Vec<PathBuf> = Vec::with_capacity(task.outputs.len());
    for output in &task.outputs {
      let key = normalize(output);
      let owner = match self.outputs.get(&key) {
        Some(owner) => Some(owner.clone()),
        None if claimed.contains(&key) => Some(task.name.clone()),
        None => None,
      };
      if let Some(owner) = owner {
        return Err(RegistryError::DuplicateOutput {
          task: task.name.clone(),
          owner,
          path: output.clone(),
        });
      }
      claimed.push(key);
    }

    debug!(task = %task.name, kind = task.kind.label(), "registered task");
    for key in claimed {
      self.outputs.insert(key, task.name.clone());
    }
    self.index.insert(task.name.clone(), self.tasks.len());
    self.tasks.push(task);
    Ok(())
  }

  /// Look a task up by name.
  pub fn resolve(&self, name: &str) -> Result<&Task, RegistryError> {
    self
      .index
      .get(name)
      .map(|&i| &self.tasks[i])
      .ok_or_else(|| RegistryError::UnknownTask(name.to_string()))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.index.contains_key(name)
  }

  /// Task names in registration order.
  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.tasks.iter().map(|t| t.name.as_str())
  }

  pub fn iter(&self) -> impl Iterator<Item = &Task> {
    self.tasks.iter()
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }
}
