//! Scaffold a project for the `init` command.
//!
//! Writes the stock `pipewright.toml` and, when missing, the files its tasks
//! expect: the license header stamped by `license` and the webpack
//! configuration used by `watch-demo`.

mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts::CONFIG_FILENAME;

pub use templates::{DEFAULT_CONFIG, LICENSE_HEADER_TEMPLATE, WEBPACK_DEMO_CONFIG};

const LICENSE_HEADER_PATH: &str = "src/text/license-header.js";
const WEBPACK_DEMO_CONFIG_PATH: &str = "webpack.demo.config.js";

#[derive(Debug, Error)]
pub enum InitError {
  #[error("file already exists: {}", path.display())]
  PathExists { path: PathBuf },

  #[error("failed to create directory {}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to write file {}", path.display())]
  WriteFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Options for initializing a project directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
  /// Project directory; created if missing.
  pub project_dir: PathBuf,
  /// Overwrite an existing configuration file.
  pub force: bool,
}

/// Result of a successful initialization.
#[derive(Debug)]
pub struct InitResult {
  pub config_path: PathBuf,
  /// The license header, if it was created.
  pub license_header: Option<PathBuf>,
  /// The demo webpack configuration, if it was created.
  pub webpack_config: Option<PathBuf>,
}

/// Write the default configuration into the project directory.
///
/// # Errors
///
/// Returns [`InitError::PathExists`] if `pipewright.toml` already exists and
/// `force` is not set.
pub fn init(options: &InitOptions) -> Result<InitResult, InitError> {
  let dir = &options.project_dir;
  create_dir(dir)?;

  let config_path = dir.join(CONFIG_FILENAME);
  if config_path.exists() && !options.force {
    return Err(InitError::PathExists { path: config_path });
  }
  write(&config_path, DEFAULT_CONFIG)?;
  info!(path = %config_path.display(), "wrote configuration");

  let license_header = write_if_missing(&dir.join(LICENSE_HEADER_PATH), LICENSE_HEADER_TEMPLATE)?;
  let webpack_config = write_if_missing(&dir.join(WEBPACK_DEMO_CONFIG_PATH), WEBPACK_DEMO_CONFIG)?;

  Ok(InitResult {
    config_path,
    license_header,
    webpack_config,
  })
}

/// Write `content` unless `path` exists. Returns the path when written.
fn write_if_missing(path: &Path, content: &str) -> Result<Option<PathBuf>, InitError> {
  if path.exists() {
    return Ok(None);
  }
  if let Some(parent) = path.parent() {
    create_dir(parent)?;
  }
  write(path, content)?;
  info!(path = %path.display(), "wrote template");
  Ok(Some(path.to_path_buf()))
}

fn create_dir(path: &Path) -> Result<(), InitError> {
  fs::create_dir_all(path).map_err(|source| InitError::CreateDir {
    path: path.to_path_buf(),
    source,
  })
}

fn write(path: &Path, content: &str) -> Result<(), InitError> {
  fs::write(path, content).map_err(|source| InitError::WriteFile {
    path: path.to_path_buf(),
    source,
  })
}
