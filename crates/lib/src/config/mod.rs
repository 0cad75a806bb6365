//! Project configuration.
//!
//! A project is described by two files in its root directory:
//! - `package.json`, providing the package `name` and `version`
//! - `pipewright.toml`, declaring tasks and pipelines
//!
//! ```toml
//! [project]
//! manifest = "package.json"
//! build_number_env = "BUILD_NUMBER"
//! stamp_token = "@BUILD_NUMBER@"
//!
//! [pipelines]
//! release = ["clean", "version"]
//!
//! [[task]]
//! name = "version"
//! kind = "custom-action"
//! action = "write-version"
//! outputs = ["dist/$${name}/version.txt"]
//! ```
//!
//! Metadata placeholders in task paths are resolved while loading; tool
//! arguments keep theirs until the task runs. Loading registers every task and
//! validates every pipeline, so a project that loads is ready to run.

mod metadata;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::{BUILD_NUMBER_ENV, CONFIG_FILENAME, DEFAULT_STAMP_TOKEN, MANIFEST_FILENAME};
use crate::init::DEFAULT_CONFIG;
use crate::pipeline::{ArtifactFlow, FlowError, PipelineDefinition, Runner};
use crate::placeholder::{self, PlaceholderError};
use crate::task::{RegistryError, Task, TaskKind, TaskRegistry};

pub use metadata::BuildMetadata;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("package manifest not found: {}", path.display())]
  ManifestMissing { path: PathBuf },

  #[error("failed to read {}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("malformed package manifest {}", path.display())]
  MalformedManifest {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("package manifest {} has no `{field}`", path.display())]
  MissingField { path: PathBuf, field: &'static str },

  #[error("build number must be numeric, got '{0}'")]
  InvalidBuildNumber(String),

  #[error("configuration file not found: {}", path.display())]
  ConfigMissing { path: PathBuf },

  #[error("invalid configuration in {source_name}")]
  Parse {
    source_name: String,
    #[source]
    source: toml::de::Error,
  },

  #[error("task '{task}': invalid path {path}")]
  Placeholder {
    task: String,
    path: String,
    #[source]
    source: PlaceholderError,
  },

  #[error(transparent)]
  Registry(#[from] RegistryError),

  #[error("pipeline '{pipeline}' is invalid")]
  Pipeline {
    pipeline: String,
    #[source]
    source: RegistryError,
  },

  #[error("pipeline '{0}' has no tasks")]
  EmptyPipeline(String),

  #[error(transparent)]
  Flow(#[from] FlowError),
}

/// The `[project]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ProjectSettings {
  /// Package manifest, relative to the project root.
  pub manifest: PathBuf,
  /// Environment variable holding the CI build number.
  pub build_number_env: String,
  /// Token replaced by the display version in stamped headers.
  pub stamp_token: String,
}

impl Default for ProjectSettings {
  fn default() -> Self {
    Self {
      manifest: PathBuf::from(MANIFEST_FILENAME),
      build_number_env: BUILD_NUMBER_ENV.to_string(),
      stamp_token: DEFAULT_STAMP_TOKEN.to_string(),
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
  #[serde(default)]
  project: ProjectSettings,
  #[serde(default, rename = "task")]
  tasks: Vec<Task>,
  #[serde(default)]
  pipelines: BTreeMap<String, Vec<String>>,
}

/// Where a project's configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
  File(PathBuf),
  /// No configuration file; the stock template was used.
  Builtin,
}

impl fmt::Display for ConfigSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigSource::File(path) => write!(f, "{}", path.display()),
      ConfigSource::Builtin => write!(f, "built-in template"),
    }
  }
}

/// A loaded project: metadata, registered tasks, and validated pipelines.
#[derive(Debug)]
pub struct Project {
  root: PathBuf,
  source: ConfigSource,
  settings: ProjectSettings,
  metadata: BuildMetadata,
  registry: TaskRegistry,
  pipelines: BTreeMap<String, PipelineDefinition>,
}

impl Project {
  /// Load the project.
  ///
  /// With an explicit path the file must exist. Otherwise `pipewright.toml`
  /// in the current directory is used when present, and the built-in
  /// template when not.
  pub fn load(config: Option<&Path>) -> Result<Self, ConfigError> {
    if let Some(path) = config {
      return Self::from_file(path);
    }

    let cwd = std::env::current_dir().map_err(|source| ConfigError::Read {
      path: PathBuf::from("."),
      source,
    })?;
    let default_path = cwd.join(CONFIG_FILENAME);
    if default_path.is_file() {
      Self::from_file(&default_path)
    } else {
      warn!(dir = %cwd.display(), "no {CONFIG_FILENAME} found, using the built-in template");
      Self::from_source(&cwd, DEFAULT_CONFIG, ConfigSource::Builtin)
    }
  }

  /// Load from a configuration file. The project root is its directory.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let text = match fs::read_to_string(path) {
      Ok(text) => text,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ConfigError::ConfigMissing {
          path: path.to_path_buf(),
        });
      }
      Err(source) => {
        return Err(ConfigError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };
    Self::from_source(dir, &text, ConfigSource::File(path.to_path_buf()))
  }

  /// Load from configuration text, reading metadata from the manifest and
  /// build-number variable the configuration names.
  pub fn from_source(root: &Path, text: &str, source: ConfigSource) -> Result<Self, ConfigError> {
    let root = dunce::canonicalize(root).map_err(|e| ConfigError::Read {
      path: root.to_path_buf(),
      source: e,
    })?;
    let file = parse(text, &source)?;
    let metadata = BuildMetadata::from_env(&root.join(&file.project.manifest), &file.project.build_number_env)?;
    Self::assemble(root, file, metadata, source)
  }

  /// Load from configuration text with metadata supplied by the caller.
  pub fn with_metadata(
    root: &Path,
    text: &str,
    source: ConfigSource,
    metadata: BuildMetadata,
  ) -> Result<Self, ConfigError> {
    let file = parse(text, &source)?;
    Self::assemble(root.to_path_buf(), file, metadata, source)
  }

  fn assemble(
    root: PathBuf,
    file: ConfigFile,
    metadata: BuildMetadata,
    source: ConfigSource,
  ) -> Result<Self, ConfigError> {
    let mut registry = TaskRegistry::new();
    for task in file.tasks {
      registry.register(resolve_task_paths(task, &metadata)?)?;
    }

    let flow = ArtifactFlow::from_registry(&registry);
    flow.check_acyclic()?;

    let mut pipelines = BTreeMap::new();
    for (name, tasks) in file.pipelines {
      let definition = PipelineDefinition::new(name.clone(), tasks);
      if definition.is_empty() {
        return Err(ConfigError::EmptyPipeline(name));
      }
      definition.validate(&registry).map_err(|source| ConfigError::Pipeline {
        pipeline: name.clone(),
        source,
      })?;
      flow.validate(&definition)?;
      pipelines.insert(name, definition);
    }

    debug!(
      source = %source,
      root = %root.display(),
      tasks = registry.len(),
      pipelines = pipelines.len(),
      "loaded project"
    );
    Ok(Self {
      root,
      source,
      settings: file.project,
      metadata,
      registry,
      pipelines,
    })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn source(&self) -> &ConfigSource {
    &self.source
  }

  pub fn settings(&self) -> &ProjectSettings {
    &self.settings
  }

  pub fn metadata(&self) -> &BuildMetadata {
    &self.metadata
  }

  pub fn registry(&self) -> &TaskRegistry {
    &self.registry
  }

  /// Pipelines by name.
  pub fn pipelines(&self) -> &BTreeMap<String, PipelineDefinition> {
    &self.pipelines
  }

  pub fn pipeline(&self, name: &str) -> Option<&PipelineDefinition> {
    self.pipelines.get(name)
  }

  /// What `run <target>` executes: the pipeline of that name, or else a
  /// one-step pipeline of the task of that name.
  pub fn target(&self, name: &str) -> Result<PipelineDefinition, RegistryError> {
    if let Some(pipeline) = self.pipelines.get(name) {
      return Ok(pipeline.clone());
    }
    self.registry.resolve(name)?;
    Ok(PipelineDefinition::new(name, [name]))
  }

  /// A runner over this project's tasks, rooted at the project directory.
  pub fn runner(&self) -> Runner<'_> {
    Runner::new(&self.registry, &self.metadata, &self.root).with_stamp_token(&self.settings.stamp_token)
  }
}

fn parse(text: &str, source: &ConfigSource) -> Result<ConfigFile, ConfigError> {
  toml::from_str(text).map_err(|e| ConfigError::Parse {
    source_name: source.to_string(),
    source: e,
  })
}

/// Resolve metadata placeholders in every path the task declares.
fn resolve_task_paths(mut task: Task, metadata: &BuildMetadata) -> Result<Task, ConfigError> {
  let name = task.name.clone();
  let resolve = |path: &mut PathBuf| -> Result<(), ConfigError> {
    let raw = path.to_string_lossy().to_string();
    let resolved = placeholder::substitute(&raw, metadata).map_err(|source| ConfigError::Placeholder {
      task: name.clone(),
      path: raw,
      source,
    })?;
    *path = PathBuf::from(resolved);
    Ok(())
  };

  for path in task.inputs.iter_mut().chain(task.outputs.iter_mut()) {
    resolve(path)?;
  }
  match &mut task.kind {
    TaskKind::Clean { dirs } => {
      for dir in dirs {
        resolve(dir)?;
      }
    }
    TaskKind::Concatenate {
      header: Some(header), ..
    } => resolve(header)?,
    TaskKind::WatchBundle { watch, .. } => {
      for path in watch {
        resolve(path)?;
      }
    }
    _ => {}
  }

  Ok(task)
}
