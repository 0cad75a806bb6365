//! External tool invocation.
//!
//! Tools inherit the orchestrator's environment (so `PATH` lookups such as
//! `npx` work) plus whatever the task configures. Output is captured; on
//! failure the tool's diagnostics are carried in the error.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::execute::resolver::TaskResolver;
use crate::execute::types::{ExecuteError, TaskContext, ToolOutput};
use crate::placeholder;
use crate::task::{Task, ToolCommand};

/// Run a task's tool after resolving placeholders in its program, arguments,
/// environment, and working directory.
pub async fn execute_tool(tool: &ToolCommand, task: &Task, ctx: TaskContext<'_>) -> Result<ToolOutput, ExecuteError> {
  let resolver = TaskResolver::new(task, ctx);

  let program = placeholder::substitute(&tool.program, &resolver)?;
  let args = placeholder::substitute_args(&tool.args, &resolver)?;

  let mut env = BTreeMap::new();
  for (key, value) in &tool.env {
    env.insert(key.clone(), placeholder::substitute(value, &resolver)?);
  }

  let cwd = match &tool.cwd {
    Some(cwd) => ctx.path(Path::new(&placeholder::substitute(&cwd.to_string_lossy(), &resolver)?)),
    None => ctx.root.to_path_buf(),
  };

  info!(task = %task.name, program = %program, "running tool");
  execute_cmd(&program, &args, &env, &cwd).await
}

/// Spawn `program` with `args` in `cwd` and wait for it.
///
/// # Returns
///
/// The captured output on a zero exit status. A non-zero status becomes
/// [`ExecuteError::ToolFailed`] carrying stderr, or stdout when stderr is empty.
pub async fn execute_cmd(
  program: &str,
  args: &[String],
  env: &BTreeMap<String, String>,
  cwd: &Path,
) -> Result<ToolOutput, ExecuteError> {
  debug!(program = %program, args = ?args, cwd = ?cwd, "spawning process");

  let output = Command::new(program)
    .args(args)
    .envs(env)
    .current_dir(cwd)
    .stdin(Stdio::null())
    .kill_on_drop(true)
    .output()
    .await
    .map_err(|source| ExecuteError::Spawn {
      program: program.to_string(),
      source,
    })?;

  let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
  let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();

  if !stderr.is_empty() {
    debug!(stderr = %stderr, "tool stderr");
  }

  if !output.status.success() {
    let diagnostics = if stderr.is_empty() { stdout } else { stderr };
    return Err(ExecuteError::ToolFailed {
      program: program.to_string(),
      code: output.status.code(),
      diagnostics,
    });
  }

  Ok(ToolOutput { stdout, stderr })
}
