//! Copy action: files and directory trees into a distribution directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::execute::types::{ExecuteError, TaskContext};

/// Copy each input into `dest`.
///
/// A file input lands at `dest/<file name>`. A directory input is copied
/// file-by-file to `dest/<directory name>/...`, keeping its relative layout.
/// Only regular files are copied; empty directories are not recreated.
///
/// Returns the destination paths of every copied file.
pub fn execute_copy(inputs: &[PathBuf], dest: &Path, ctx: TaskContext<'_>) -> Result<Vec<PathBuf>, ExecuteError> {
  let dest = ctx.path(dest);
  fs::create_dir_all(&dest).map_err(ExecuteError::io("create", &dest))?;

  let mut copied = Vec::new();
  for input in inputs {
    let source = ctx.path(input);
    let Some(name) = source.file_name() else {
      continue;
    };
    let target_base = dest.join(name);

    if source.is_dir() {
      for entry in WalkDir::new(&source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ExecuteError::Walk {
          path: source.clone(),
          source: e,
        })?;
        if !entry.file_type().is_file() {
          continue;
        }
        let rel = entry.path().strip_prefix(&source).unwrap_or(entry.path());
        copied.push(copy_file(entry.path(), &target_base.join(rel))?);
      }
    } else {
      copied.push(copy_file(&source, &target_base)?);
    }
  }

  Ok(copied)
}

fn copy_file(from: &Path, to: &Path) -> Result<PathBuf, ExecuteError> {
  if let Some(parent) = to.parent() {
    fs::create_dir_all(parent).map_err(ExecuteError::io("create", parent))?;
  }
  fs::copy(from, to).map_err(ExecuteError::io("copy", from))?;
  debug!(from = ?from, to = ?to, "copied");
  Ok(to.to_path_buf())
}
