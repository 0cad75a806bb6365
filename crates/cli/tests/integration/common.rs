//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get path to a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    .join("tests")
    .join("fixtures")
    .join(name)
}

/// Read fixture content.
pub fn fixture_content(name: &str) -> String {
  std::fs::read_to_string(fixture_path(name)).unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", name, e))
}

/// Isolated project directory.
///
/// Each test gets its own temporary directory holding a `pipewright.toml`,
/// a `package.json` and whatever sources the test writes.
pub struct TestEnv {
  pub temp: TempDir,
  pub config_path: PathBuf,
}

impl TestEnv {
  /// Create from a configuration fixture plus the fixture `package.json`.
  pub fn from_fixture(name: &str) -> Self {
    let env = Self::empty();
    std::fs::write(&env.config_path, fixture_content(name)).unwrap();
    env.write_file("package.json", &fixture_content("package.json"));
    env
  }

  /// Create from the release fixture with every source the pipeline reads.
  pub fn release_project() -> Self {
    let env = Self::from_fixture("release.toml");
    env.write_file("src/main/ts/Main.ts", "export const main = () => 1;\n");
    env.write_file("lib/main/ts/Main.js", "const main = () => 1;\nmain();\n");
    env.write_file("tsconfig.json", "{}\n");
    env.write_file("src/text/license-header.js", "// v@BUILD_NUMBER@");
    env.write_file("LICENSE", "MIT\n");
    env.write_file("CHANGELOG.md", "# Changelog\n");
    env.write_file("src/demo/html/editor/index.html", "<html></html>\n");
    env
  }

  /// Create an empty test environment.
  ///
  /// Use this when you need to manually set up the directory structure.
  pub fn empty() -> Self {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("pipewright.toml");
    Self { temp, config_path }
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Read a file relative to the temp directory.
  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path))
      .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative_path, e))
  }

  pub fn exists(&self, relative_path: &str) -> bool {
    self.temp.path().join(relative_path).exists()
  }

  /// Get a pre-configured Command for the pipewright binary.
  ///
  /// Runs inside the project directory with `BUILD_NUMBER` and `RUST_LOG`
  /// cleared so the host CI environment cannot leak into results.
  pub fn pipewright_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("pipewright");
    cmd.current_dir(self.temp.path());
    cmd.env_remove("BUILD_NUMBER");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
