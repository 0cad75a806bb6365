//! Clean action: remove build directories.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::execute::types::{ExecuteError, TaskContext};

/// Remove every target. Targets that do not exist are skipped.
///
/// Returns the paths that were actually removed.
pub fn execute_clean(dirs: &[PathBuf], ctx: TaskContext<'_>) -> Result<Vec<PathBuf>, ExecuteError> {
  let mut removed = Vec::new();

  for dir in dirs {
    let target = ctx.path(dir);
    let result = match fs::symlink_metadata(&target) {
      Ok(meta) if meta.is_dir() => fs::remove_dir_all(&target),
      Ok(_) => fs::remove_file(&target),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = ?target, "nothing to clean");
        continue;
      }
      Err(e) => Err(e),
    };

    match result {
      Ok(()) => {
        info!(path = ?target, "removed");
        removed.push(target);
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => return Err(ExecuteError::io("remove", &target)(e)),
    }
  }

  Ok(removed)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{metadata, write_file};
  use tempfile::TempDir;

  #[test]
  fn removes_existing_and_skips_absent() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "dist/equation-editor/plugin.js", "x");
    write_file(temp.path(), "scratch/compiled/plugin.js", "x");
    let meta = metadata("1.0.0", None);
    let stamp = meta.substitution_context("@BUILD_NUMBER@");
    let ctx = TaskContext::new(temp.path(), &meta, &stamp);

    let removed = execute_clean(
      &[PathBuf::from("dist"), PathBuf::from("scratch"), PathBuf::from("lib")],
      ctx,
    )
    .unwrap();

    assert_eq!(removed.len(), 2);
    assert!(!temp.path().join("dist").exists());
    assert!(!temp.path().join("scratch").exists());
  }

  #[test]
  fn cleaning_twice_is_fine() {
    let temp = TempDir::new().unwrap();
    let meta = metadata("1.0.0", None);
    let stamp = meta.substitution_context("@BUILD_NUMBER@");
    let ctx = TaskContext::new(temp.path(), &meta, &stamp);

    assert!(execute_clean(&[PathBuf::from("dist")], ctx).unwrap().is_empty());
    assert!(execute_clean(&[PathBuf::from("dist")], ctx).unwrap().is_empty());
  }

  #[test]
  fn removes_plain_files() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "scratch.log", "x");
    let meta = metadata("1.0.0", None);
    let stamp = meta.substitution_context("@BUILD_NUMBER@");

    execute_clean(&[PathBuf::from("scratch.log")], TaskContext::new(temp.path(), &meta, &stamp)).unwrap();
    assert!(!temp.path().join("scratch.log").exists());
  }
}
