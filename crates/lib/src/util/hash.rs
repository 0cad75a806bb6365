//! Content digests for produced artifacts.
//!
//! - `hash_file()`: SHA-256 of a single file
//! - `hash_directory()`: deterministic SHA-256 of a directory tree
//! - `hash_path()`: whichever of the two applies

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use walkdir::WalkDir;

/// A full 64-character lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
  /// The first `len` characters, for display.
  pub fn short(&self, len: usize) -> &str {
    &self.0[..len.min(self.0.len())]
  }
}

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

#[derive(Debug, Error)]
pub enum HashError {
  #[error("failed to read {}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to walk {}", path.display())]
  Walk {
    path: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

/// Hash a file or directory, depending on what `path` is.
pub fn hash_path(path: &Path) -> Result<ContentHash, HashError> {
  if path.is_dir() {
    hash_directory(path)
  } else {
    hash_file(path)
  }
}

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> Result<ContentHash, HashError> {
  let read_err = |source| HashError::Read {
    path: path.to_path_buf(),
    source,
  };
  let mut file = fs::File::open(path).map_err(read_err)?;

  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let bytes_read = file.read(&mut buffer).map_err(read_err)?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash a directory's files and structure. Timestamps and permissions are ignored.
pub fn hash_directory(path: &Path) -> Result<ContentHash, HashError> {
  let mut hasher = Sha256::new();

  for entry in WalkDir::new(path).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|source| HashError::Walk {
      path: path.to_path_buf(),
      source,
    })?;
    let rel = entry.path().strip_prefix(path).unwrap_or(entry.path()).to_string_lossy();

    let line = if entry.file_type().is_file() {
      format!("F:{}:{}", rel, hash_file(entry.path())?)
    } else if entry.file_type().is_dir() {
      format!("D:{rel}")
    } else {
      continue;
    };
    hasher.update(line.as_bytes());
    hasher.update(b"\n");
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}
