//! Build metadata: project identity plus the optional CI build number.
//!
//! Metadata is read once at startup from the package manifest and the
//! build-number environment variable, then passed by reference to every
//! task execution. It is never mutated afterwards.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ConfigError;
use crate::consts::DEFAULT_BUILD_NUMBER;
use crate::placeholder::{MetaField, PlaceholderError, Resolver};
use crate::substitution::SubstitutionContext;

/// The subset of `package.json` the orchestrator cares about.
#[derive(Debug, Deserialize)]
struct PackageManifest {
  name: Option<String>,
  version: Option<String>,
}

/// Immutable build identity shared by all tasks of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata {
  name: String,
  version: String,
  build_number: Option<String>,
}

impl BuildMetadata {
  /// Construct metadata from already-known values.
  ///
  /// An empty or whitespace-only build number is treated as absent.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::InvalidBuildNumber`] if the build number is not numeric.
  pub fn new(
    name: impl Into<String>,
    version: impl Into<String>,
    build_number: Option<String>,
  ) -> Result<Self, ConfigError> {
    let build_number = match build_number.map(|b| b.trim().to_string()) {
      Some(b) if b.is_empty() => None,
      Some(b) if !b.chars().all(|c| c.is_ascii_digit()) => return Err(ConfigError::InvalidBuildNumber(b)),
      other => other,
    };

    Ok(Self {
      name: name.into(),
      version: version.into(),
      build_number,
    })
  }

  /// Load metadata from a package manifest.
  ///
  /// # Errors
  ///
  /// Returns an error if the manifest is missing, is not valid JSON, or lacks a
  /// non-empty `name` or `version`.
  pub fn load(manifest_path: &Path, build_number: Option<String>) -> Result<Self, ConfigError> {
    let content = match fs::read_to_string(manifest_path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(ConfigError::ManifestMissing {
          path: manifest_path.to_path_buf(),
        });
      }
      Err(e) => {
        return Err(ConfigError::Read {
          path: manifest_path.to_path_buf(),
          source: e,
        });
      }
    };

    let manifest: PackageManifest = serde_json::from_str(&content).map_err(|e| ConfigError::MalformedManifest {
      path: manifest_path.to_path_buf(),
      source: e,
    })?;

    let name = required(manifest.name, manifest_path, "name")?;
    let version = required(manifest.version, manifest_path, "version")?;

    let metadata = Self::new(name, version, build_number)?;
    debug!(
      name = %metadata.name,
      version = %metadata.version,
      build = %metadata.build_number(),
      "loaded build metadata"
    );
    Ok(metadata)
  }

  /// Load metadata, taking the build number from the named environment variable.
  ///
  /// An unset variable is not an error; the build number defaults to `"0"`.
  pub fn from_env(manifest_path: &Path, env_var: &str) -> Result<Self, ConfigError> {
    Self::load(manifest_path, std::env::var(env_var).ok())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  /// The build number, or `"0"` when none was supplied.
  pub fn build_number(&self) -> &str {
    self.build_number.as_deref().unwrap_or(DEFAULT_BUILD_NUMBER)
  }

  /// `version-buildNumber`, e.g. `1.0.0-0` or `2.3.1-42`.
  pub fn display_version(&self) -> String {
    format!("{}-{}", self.version, self.build_number())
  }

  /// Substitution context replacing `token` with the display version.
  pub fn substitution_context(&self, token: &str) -> SubstitutionContext {
    SubstitutionContext::new(token, self.display_version())
  }
}

/// Metadata alone resolves only metadata placeholders. Used for paths in
/// configuration, which are fixed before any task runs.
impl Resolver for BuildMetadata {
  fn resolve_input(&self, _index: usize) -> Result<String, PlaceholderError> {
    Err(PlaceholderError::NotAvailable("input".to_string()))
  }

  fn resolve_inputs(&self) -> Result<Vec<String>, PlaceholderError> {
    Err(PlaceholderError::NotAvailable("inputs".to_string()))
  }

  fn resolve_out(&self, _index: usize) -> Result<String, PlaceholderError> {
    Err(PlaceholderError::NotAvailable("out".to_string()))
  }

  fn resolve_meta(&self, field: MetaField) -> Result<String, PlaceholderError> {
    Ok(match field {
      MetaField::Name => self.name.clone(),
      MetaField::Version => self.version.clone(),
      MetaField::BuildNumber => self.build_number().to_string(),
      MetaField::DisplayVersion => self.display_version(),
    })
  }
}

fn required(value: Option<String>, path: &Path, field: &'static str) -> Result<String, ConfigError> {
  match value {
    Some(v) if !v.trim().is_empty() => Ok(v),
    _ => Err(ConfigError::MissingField {
      path: path.to_path_buf(),
      field,
    }),
  }
}
