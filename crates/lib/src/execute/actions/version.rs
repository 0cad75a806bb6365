//! Write-version action.

use std::fs;
use std::path::{Path, PathBuf};

use crate::execute::types::{ExecuteError, TaskContext};

/// Write the display version, with no trailing newline.
pub fn execute_write_version(output: &Path, ctx: TaskContext<'_>) -> Result<PathBuf, ExecuteError> {
  let path = ctx.path(output);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(ExecuteError::io("create", parent))?;
  }
  fs::write(&path, ctx.metadata.display_version()).map_err(ExecuteError::io("write", &path))?;
  Ok(path)
}
