//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Drop `.` components so `./dist/x` and `dist/x/` compare equal to `dist/x`.
///
/// Purely lexical: `..` is kept and symlinks are not resolved.
pub fn normalize(path: &Path) -> PathBuf {
  path
    .components()
    .filter(|c| !matches!(c, Component::CurDir))
    .collect()
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve(root: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    root.join(normalize(path))
  }
}

/// True if one path contains the other (or they are equal), compared lexically.
pub fn overlaps(a: &Path, b: &Path) -> bool {
  let (a, b) = (normalize(a), normalize(b));
  a.starts_with(&b) || b.starts_with(&a)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_strips_cur_dir() {
    assert_eq!(normalize(Path::new("./dist/./x/")), PathBuf::from("dist/x"));
  }

  #[test]
  fn resolve_relative_and_absolute() {
    let root = Path::new("/project");
    assert_eq!(resolve(root, Path::new("./dist")), PathBuf::from("/project/dist"));
    assert_eq!(resolve(root, Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
  }

  #[test]
  fn overlaps_by_component() {
    assert!(overlaps(Path::new("dist/editor"), Path::new("dist/editor/plugin.js")));
    assert!(overlaps(Path::new("./src"), Path::new("src")));
    assert!(!overlaps(Path::new("dist/editor"), Path::new("dist/editor-old")));
  }
}
