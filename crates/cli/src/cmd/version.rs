use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use pipewright_lib::config::Project;

use crate::output::{OutputFormat, print_json};

#[derive(Serialize)]
struct VersionOutput<'a> {
  name: &'a str,
  version: &'a str,
  build_number: &'a str,
  display_version: String,
}

pub fn cmd_version(config: Option<&Path>, output: OutputFormat) -> Result<()> {
  let project = Project::load(config).context("Failed to load configuration")?;
  let metadata = project.metadata();

  if output.is_json() {
    print_json(&VersionOutput {
      name: metadata.name(),
      version: metadata.version(),
      build_number: metadata.build_number(),
      display_version: metadata.display_version(),
    })?;
  } else {
    println!("{}", metadata.display_version());
  }

  Ok(())
}
