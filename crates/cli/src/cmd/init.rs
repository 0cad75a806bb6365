//! Implementation of the `pipewright init` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use pipewright_lib::init::{InitOptions, init};

use crate::output::{OutputFormat, print_json, print_success, symbols};

#[derive(Serialize)]
struct InitOutput<'a> {
  config: &'a Path,
  license_header: Option<&'a Path>,
  webpack_config: Option<&'a Path>,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if `pipewright.toml` already exists (without `--force`) or
/// if files cannot be written.
pub fn cmd_init(path: &Path, force: bool, output: OutputFormat) -> Result<()> {
  let options = InitOptions {
    project_dir: path.to_path_buf(),
    force,
  };
  let result = init(&options).context("Failed to initialize project")?;

  if output.is_json() {
    return print_json(&InitOutput {
      config: &result.config_path,
      license_header: result.license_header.as_deref(),
      webpack_config: result.webpack_config.as_deref(),
    });
  }

  print_success("Initialized pipewright project");
  println!();
  println!("  {} Configuration:  {}", symbols::INFO, result.config_path.display());
  if let Some(header) = &result.license_header {
    println!("  {} License header: {}", symbols::INFO, header.display());
  }
  if let Some(webpack) = &result.webpack_config {
    println!("  {} Webpack config: {}", symbols::INFO, webpack.display());
  }
  println!();
  println!("{}", "Next steps:".if_supports_color(Stream::Stdout, |s| s.bold()));
  println!("  1. Add a package.json with `name` and `version`");
  println!(
    "  2. Run: {}",
    "pipewright run release".if_supports_color(Stream::Stdout, |s| s.cyan())
  );

  Ok(())
}
