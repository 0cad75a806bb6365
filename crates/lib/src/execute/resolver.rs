//! Placeholder resolver for task execution.

use std::path::Path;

use crate::placeholder::{MetaField, PlaceholderError, Resolver};
use crate::task::Task;

use super::types::TaskContext;

/// Resolves `$${input:N}`, `$${out:N}` and metadata placeholders for one task.
///
/// Paths resolve to absolute paths under the project root, so tools see the
/// same files regardless of their working directory.
pub struct TaskResolver<'a> {
  task: &'a Task,
  ctx: TaskContext<'a>,
}

impl<'a> TaskResolver<'a> {
  pub fn new(task: &'a Task, ctx: TaskContext<'a>) -> Self {
    Self { task, ctx }
  }

  fn path_string(&self, path: &Path) -> String {
    self.ctx.path(path).to_string_lossy().to_string()
  }
}

impl Resolver for TaskResolver<'_> {
  fn resolve_input(&self, index: usize) -> Result<String, PlaceholderError> {
    self
      .task
      .inputs
      .get(index)
      .map(|p| self.path_string(p))
      .ok_or(PlaceholderError::UnresolvedInput(index))
  }

  fn resolve_inputs(&self) -> Result<Vec<String>, PlaceholderError> {
    Ok(self.task.inputs.iter().map(|p| self.path_string(p)).collect())
  }

  fn resolve_out(&self, index: usize) -> Result<String, PlaceholderError> {
    self
      .task
      .outputs
      .get(index)
      .map(|p| self.path_string(p))
      .ok_or(PlaceholderError::UnresolvedOutput(index))
  }

  fn resolve_meta(&self, field: MetaField) -> Result<String, PlaceholderError> {
    self.ctx.metadata.resolve_meta(field)
  }
}
