//! Types for task execution.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::BuildMetadata;
use crate::placeholder::PlaceholderError;
use crate::substitution::SubstitutionContext;
use crate::util::path::resolve;

/// Errors raised while executing a single task.
#[derive(Debug, Error)]
pub enum ExecuteError {
  /// A placeholder in a tool argument could not be resolved.
  #[error("placeholder error")]
  Placeholder(#[from] PlaceholderError),

  /// The tool could not be started at all.
  #[error("failed to start `{program}`")]
  Spawn {
    program: String,
    #[source]
    source: io::Error,
  },

  /// The tool ran and reported failure.
  #[error("`{program}` {}{}", describe_exit(.code), diagnostics_suffix(.diagnostics))]
  ToolFailed {
    program: String,
    code: Option<i32>,
    diagnostics: String,
  },

  /// A filesystem operation of a built-in action failed.
  #[error("failed to {action} {}", path.display())]
  Io {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// Walking a directory tree failed.
  #[error("failed to walk {}", path.display())]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

impl ExecuteError {
  pub(crate) fn io(action: &'static str, path: &Path) -> impl FnOnce(io::Error) -> Self + use<> {
    let path = path.to_path_buf();
    move |source| ExecuteError::Io { action, path, source }
  }
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exited with code {code}"),
    None => "was terminated by a signal".to_string(),
  }
}

fn diagnostics_suffix(diagnostics: &str) -> String {
  if diagnostics.is_empty() {
    String::new()
  } else {
    format!(":\n{diagnostics}")
  }
}

/// Captured output of a tool that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
  pub stdout: String,
  pub stderr: String,
}

/// Everything a task execution may read besides the task itself.
///
/// Shared read-only by every task of a run.
#[derive(Debug, Clone, Copy)]
pub struct TaskContext<'a> {
  /// Directory relative task paths are resolved against.
  pub root: &'a Path,
  pub metadata: &'a BuildMetadata,
  /// Token substitution applied to stamped concatenation headers.
  pub stamp: &'a SubstitutionContext,
}

impl<'a> TaskContext<'a> {
  pub fn new(root: &'a Path, metadata: &'a BuildMetadata, stamp: &'a SubstitutionContext) -> Self {
    Self { root, metadata, stamp }
  }

  /// Resolve a task path against the project root.
  pub fn path(&self, path: &Path) -> PathBuf {
    resolve(self.root, path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tool_failure_message_includes_diagnostics() {
    let err = ExecuteError::ToolFailed {
      program: "tslint".to_string(),
      code: Some(2),
      diagnostics: "src/main/ts/Main.ts[3, 1]: missing semicolon".to_string(),
    };
    assert_eq!(
      err.to_string(),
      "`tslint` exited with code 2:\nsrc/main/ts/Main.ts[3, 1]: missing semicolon"
    );
  }

  #[test]
  fn tool_failure_without_diagnostics() {
    let err = ExecuteError::ToolFailed {
      program: "rollup".to_string(),
      code: None,
      diagnostics: String::new(),
    };
    assert_eq!(err.to_string(), "`rollup` was terminated by a signal");
  }
}
