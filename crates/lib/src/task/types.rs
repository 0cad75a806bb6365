use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SEPARATOR, DEFAULT_WATCH_INTERVAL_MS};

/// An external program invocation, the configuration handed to a black-box tool.
///
/// Arguments and environment values may contain placeholders
/// (`$${input:0}`, `$${out}`, `$${display_version}`, ...) which are resolved
/// when the owning task runs. See [`crate::placeholder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
  pub program: String,
  #[serde(default)]
  pub args: Vec<String>,
  #[serde(default)]
  pub env: BTreeMap<String, String>,
  /// Working directory, relative to the project root. Defaults to the root.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cwd: Option<PathBuf>,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      env: BTreeMap::new(),
      cwd: None,
    }
  }

  pub fn with_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.args = args.into_iter().map(Into::into).collect();
    self
  }

}

/// Built-in actions that need no external tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomAction {
  /// Write the display version to the task's single output.
  WriteVersion,
}

/// What a task does, together with its kind-specific options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskKind {
  /// Delete directories (or files). Absent targets are not an error.
  Clean { dirs: Vec<PathBuf> },

  /// Static analysis gate; produces nothing.
  Lint { tool: ToolCommand },

  /// Type checking; may emit compiled sources.
  Typecheck { tool: ToolCommand },

  /// Resolve and inline a module graph into one script.
  Bundle { tool: ToolCommand },

  /// Compress a script.
  Minify { tool: ToolCommand },

  /// Join inputs, optionally behind a stamped header, writing identical bytes
  /// to every declared output.
  Concatenate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<PathBuf>,
    #[serde(default = "default_separator")]
    separator: String,
    /// Replace the stamp token in the header with the display version.
    #[serde(default)]
    stamp: bool,
  },

  /// Copy inputs (files, or the files of directory trees) into the single output directory.
  Copy,

  /// Long-running recompile-on-change loop with live reload.
  WatchBundle {
    tool: ToolCommand,
    watch: Vec<PathBuf>,
    /// Quiet period after a change before recompiling.
    #[serde(default = "default_interval_ms")]
    interval_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    livereload_port: Option<u16>,
  },

  /// A built-in action.
  #[serde(rename = "custom-action")]
  Custom { action: CustomAction },
}

fn default_separator() -> String {
  DEFAULT_SEPARATOR.to_string()
}

fn default_interval_ms() -> u64 {
  DEFAULT_WATCH_INTERVAL_MS
}

impl TaskKind {
  /// The kind name as written in configuration.
  pub fn label(&self) -> &'static str {
    match self {
      TaskKind::Clean { .. } => "clean",
      TaskKind::Lint { .. } => "lint",
      TaskKind::Typecheck { .. } => "typecheck",
      TaskKind::Bundle { .. } => "bundle",
      TaskKind::Minify { .. } => "minify",
      TaskKind::Concatenate { .. } => "concatenate",
      TaskKind::Copy => "copy",
      TaskKind::WatchBundle { .. } => "watch-bundle",
      TaskKind::Custom { .. } => "custom-action",
    }
  }

  /// The external tool this task invokes, if any.
  pub fn tool(&self) -> Option<&ToolCommand> {
    match self {
      TaskKind::Lint { tool }
      | TaskKind::Typecheck { tool }
      | TaskKind::Bundle { tool }
      | TaskKind::Minify { tool }
      | TaskKind::WatchBundle { tool, .. } => Some(tool),
      _ => None,
    }
  }

  /// Keys this kind accepts next to the common task fields.
  fn option_keys(&self) -> &'static [&'static str] {
    match self {
      TaskKind::Clean { .. } => &["dirs"],
      TaskKind::Lint { .. } | TaskKind::Typecheck { .. } | TaskKind::Bundle { .. } | TaskKind::Minify { .. } => {
        &["tool"]
      }
      TaskKind::Concatenate { .. } => &["header", "separator", "stamp"],
      TaskKind::Copy => &[],
      TaskKind::WatchBundle { .. } => &["tool", "watch", "interval_ms", "livereload_port"],
      TaskKind::Custom { .. } => &["action"],
    }
  }

  /// Watch tasks only return once shut down, so nothing may follow them.
  pub fn is_watch(&self) -> bool {
    matches!(self, TaskKind::WatchBundle { .. })
  }
}

/// A single build step: a kind plus its declared inputs and outputs.
///
/// Tasks are plain descriptions. They are validated when registered and never
/// change afterwards; the pipeline runner checks that every input exists before
/// the task runs and that every output exists after it succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
  pub name: String,
  #[serde(flatten)]
  pub kind: TaskKind,
  #[serde(default)]
  pub inputs: Vec<PathBuf>,
  #[serde(default)]
  pub outputs: Vec<PathBuf>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// Every key the fields above did not claim. The flattened kind only
  /// borrows its keys, so these include `kind` and the kind's own options.
  #[serde(flatten, skip_serializing)]
  extra: BTreeMap<String, toml::Value>,
}

impl Task {
  pub fn new(name: impl Into<String>, kind: TaskKind) -> Self {
    Self {
      name: name.into(),
      kind,
      inputs: Vec::new(),
      outputs: Vec::new(),
      description: None,
      extra: BTreeMap::new(),
    }
  }

  pub fn with_inputs<I, P>(mut self, inputs: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
  {
    self.inputs = inputs.into_iter().map(Into::into).collect();
    self
  }

  pub fn with_outputs<I, P>(mut self, outputs: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
  {
    self.outputs = outputs.into_iter().map(Into::into).collect();
    self
  }

  /// Every path that must exist before the task runs: declared inputs plus a
  /// concatenation header.
  pub fn required_inputs(&self) -> Vec<&Path> {
    let mut required: Vec<&Path> = self.inputs.iter().map(PathBuf::as_path).collect();
    if let TaskKind::Concatenate { header: Some(header), .. } = &self.kind {
      required.insert(0, header.as_path());
    }
    required
  }

  /// Check the task's structure, independent of any other task.
  pub fn validate(&self) -> Result<(), String> {
    if self.name.trim().is_empty() {
      return Err("task name cannot be empty".to_string());
    }

    let options = self.kind.option_keys();
    if let Some(key) = self
      .extra
      .keys()
      .find(|key| key.as_str() != "kind" && !options.contains(&key.as_str()))
    {
      return Err(format!("unknown key '{key}' for a {} task", self.kind.label()));
    }

    if let Some(tool) = self.kind.tool()
      && tool.program.trim().is_empty()
    {
      return Err("tool program cannot be empty".to_string());
    }

    match &self.kind {
      TaskKind::Clean { dirs } => {
        if dirs.is_empty() {
          return Err("clean needs at least one directory".to_string());
        }
        if let Some(dir) = dirs.iter().find(|d| !is_contained(d)) {
          return Err(format!(
            "clean target {} must be a relative path inside the project",
            dir.display()
          ));
        }
      }
      TaskKind::Concatenate { .. } => {
        if self.inputs.is_empty() {
          return Err("concatenate needs at least one input".to_string());
        }
        if self.outputs.is_empty() {
          return Err("concatenate needs at least one output".to_string());
        }
      }
      TaskKind::Copy => {
        if self.inputs.is_empty() {
          return Err("copy needs at least one input".to_string());
        }
        if self.outputs.len() != 1 {
          return Err("copy needs exactly one output directory".to_string());
        }
      }
      TaskKind::WatchBundle { watch, interval_ms, .. } => {
        if watch.is_empty() {
          return Err("watch-bundle needs at least one watched path".to_string());
        }
        if *interval_ms == 0 {
          return Err("watch-bundle interval must be positive".to_string());
        }
        if self.outputs.is_empty() {
          return Err("watch-bundle needs at least one output".to_string());
        }
      }
      TaskKind::Custom {
        action: CustomAction::WriteVersion,
      } => {
        if self.outputs.len() != 1 {
          return Err("write-version needs exactly one output".to_string());
        }
      }
      TaskKind::Lint { .. } | TaskKind::Typecheck { .. } | TaskKind::Bundle { .. } | TaskKind::Minify { .. } => {}
    }

    Ok(())
  }
}

/// True for non-empty relative paths that never step above their base.
fn is_contained(path: &Path) -> bool {
  let mut has_normal = false;
  for component in path.components() {
    match component {
      Component::Normal(_) => has_normal = true,
      Component::CurDir => {}
      _ => return false,
    }
  }
  has_normal
}
