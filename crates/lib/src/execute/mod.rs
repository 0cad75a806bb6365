//! Task execution.
//!
//! [`execute_task`] performs exactly one run of a task: built-in kinds act on
//! the filesystem directly, tool kinds spawn their configured program. A
//! `watch-bundle` task executes as a single compile here; the long-running
//! loop lives in [`crate::watch`].

pub mod actions;
pub mod resolver;
pub mod types;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::task::{CustomAction, Task, TaskKind};

pub use resolver::TaskResolver;
pub use types::{ExecuteError, TaskContext, ToolOutput};

/// What a single task execution did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutcome {
  /// Captured output, for tool-backed kinds.
  pub tool_output: Option<ToolOutput>,
  /// Paths created or removed by built-in kinds.
  pub touched: Vec<PathBuf>,
}

impl TaskOutcome {
  /// Surface a tool's stdout (a bundler's stats, a linter's summary) and the
  /// paths a built-in kind touched.
  pub fn log(&self, task: &str) {
    if let Some(output) = &self.tool_output
      && !output.stdout.is_empty()
    {
      info!(task = %task, "{}", output.stdout);
    }
    if !self.touched.is_empty() {
      debug!(task = %task, touched = ?self.touched, "paths touched");
    }
  }
}

/// Execute one task once.
///
/// Input and output existence checks are the caller's concern.
pub async fn execute_task(task: &Task, ctx: TaskContext<'_>) -> Result<TaskOutcome, ExecuteError> {
  debug!(task = %task.name, kind = task.kind.label(), "executing task");

  let outcome = match &task.kind {
    TaskKind::Clean { dirs } => TaskOutcome {
      touched: actions::execute_clean(dirs, ctx)?,
      ..Default::default()
    },

    TaskKind::Lint { tool }
    | TaskKind::Typecheck { tool }
    | TaskKind::Bundle { tool }
    | TaskKind::Minify { tool }
    | TaskKind::WatchBundle { tool, .. } => TaskOutcome {
      tool_output: Some(actions::execute_tool(tool, task, ctx).await?),
      ..Default::default()
    },

    TaskKind::Concatenate {
      header,
      separator,
      stamp,
    } => {
      let options = actions::ConcatOptions {
        header: header.as_deref(),
        separator,
        stamp: *stamp,
      };
      TaskOutcome {
        touched: actions::execute_concat(&task.inputs, &task.outputs, options, ctx)?,
        ..Default::default()
      }
    }

    TaskKind::Copy => {
      let mut touched = Vec::new();
      for dest in &task.outputs {
        touched.extend(actions::execute_copy(&task.inputs, dest, ctx)?);
      }
      TaskOutcome {
        touched,
        ..Default::default()
      }
    }

    TaskKind::Custom {
      action: CustomAction::WriteVersion,
    } => {
      let mut touched = Vec::new();
      for output in &task.outputs {
        touched.push(actions::execute_write_version(output, ctx)?);
      }
      TaskOutcome {
        touched,
        ..Default::default()
      }
    }
  };

  Ok(outcome)
}
