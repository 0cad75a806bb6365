use serde::{Deserialize, Serialize};

use crate::task::{RegistryError, TaskRegistry};

/// A named, ordered list of task names.
///
/// Order is execution order. A name may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDefinition {
  pub name: String,
  pub tasks: Vec<String>,
}

impl PipelineDefinition {
  pub fn new<I, S>(name: impl Into<String>, tasks: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      name: name.into(),
      tasks: tasks.into_iter().map(Into::into).collect(),
    }
  }

  /// Check that every referenced task is registered.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::UnknownTask`] for the first unresolved name, in
  /// pipeline order.
  pub fn validate(&self, registry: &TaskRegistry) -> Result<(), RegistryError> {
    for name in &self.tasks {
      registry.resolve(name)?;
    }
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.tasks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.tasks.is_empty()
  }
}
