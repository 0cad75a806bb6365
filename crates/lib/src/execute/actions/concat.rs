//! Concatenate action: header stamping and joining inputs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::execute::types::{ExecuteError, TaskContext};
use crate::substitution::{count_occurrences, substitute};

/// Options of a concatenation, borrowed from the task kind.
#[derive(Debug, Clone, Copy)]
pub struct ConcatOptions<'a> {
  pub header: Option<&'a Path>,
  pub separator: &'a str,
  pub stamp: bool,
}

/// Build the concatenated bytes: `[header] + inputs`, joined by the separator.
///
/// When `stamp` is set, every occurrence of the stamp token in the header is
/// replaced by the display version. Inputs are never stamped.
pub fn render(inputs: &[PathBuf], options: ConcatOptions<'_>, ctx: TaskContext<'_>) -> Result<Vec<u8>, ExecuteError> {
  let mut parts: Vec<Vec<u8>> = Vec::with_capacity(inputs.len() + 1);

  if let Some(header) = options.header {
    let path = ctx.path(header);
    let text = fs::read_to_string(&path).map_err(ExecuteError::io("read", &path))?;
    let text = if options.stamp {
      debug!(
        header = ?path,
        occurrences = count_occurrences(&text, ctx.stamp.pattern()),
        "stamping header"
      );
      substitute(&text, ctx.stamp)
    } else {
      text
    };
    parts.push(text.into_bytes());
  }

  for input in inputs {
    let path = ctx.path(input);
    parts.push(fs::read(&path).map_err(ExecuteError::io("read", &path))?);
  }

  Ok(parts.join(options.separator.as_bytes()))
}

/// Write the concatenation to every output, creating parent directories.
///
/// All outputs receive byte-identical content.
pub fn execute_concat(
  inputs: &[PathBuf],
  outputs: &[PathBuf],
  options: ConcatOptions<'_>,
  ctx: TaskContext<'_>,
) -> Result<Vec<PathBuf>, ExecuteError> {
  let content = render(inputs, options, ctx)?;

  let mut written = Vec::with_capacity(outputs.len());
  for output in outputs {
    let path = ctx.path(output);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).map_err(ExecuteError::io("create", parent))?;
    }
    fs::write(&path, &content).map_err(ExecuteError::io("write", &path))?;
    debug!(path = ?path, bytes = content.len(), "wrote concatenation");
    written.push(path);
  }

  Ok(written)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::{metadata, read_file, write_file};
  use tempfile::TempDir;

  const HEADER: &str = "/* Equation editor plugin @BUILD_NUMBER@ */";

  fn options(header: Option<&Path>, stamp: bool) -> ConcatOptions<'_> {
    ConcatOptions {
      header,
      separator: "\n",
      stamp,
    }
  }

  #[test]
  fn stamps_header_and_writes_identical_outputs() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "src/text/license-header.js", HEADER);
    write_file(temp.path(), "scratch/compiled/plugin.min.js", "!function(){}();");
    let meta = metadata("1.0.0", None);
    let stamp = meta.substitution_context("@BUILD_NUMBER@");

    let written = execute_concat(
      &[PathBuf::from("scratch/compiled/plugin.min.js")],
      &[
        PathBuf::from("dist/equation-editor/plugin.js"),
        PathBuf::from("dist/equation-editor/plugin.min.js"),
      ],
      options(Some(Path::new("src/text/license-header.js")), true),
      TaskContext::new(temp.path(), &meta, &stamp),
    )
    .unwrap();

    assert_eq!(written.len(), 2);
    let plugin = read_file(temp.path(), "dist/equation-editor/plugin.js");
    assert_eq!(plugin, "/* Equation editor plugin 1.0.0-0 */\n!function(){}();");
    assert_eq!(plugin, read_file(temp.path(), "dist/equation-editor/plugin.min.js"));
  }

  #[test]
  fn unstamped_header_is_verbatim() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "header.js", HEADER);
    write_file(temp.path(), "a.js", "a");
    let meta = metadata("1.0.0", None);
    let stamp = meta.substitution_context("@BUILD_NUMBER@");

    let bytes = render(
      &[PathBuf::from("a.js")],
      options(Some(Path::new("header.js")), false),
      TaskContext::new(temp.path(), &meta, &stamp),
    )
    .unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), format!("{HEADER}\na"));
  }

  #[test]
  fn joins_inputs_with_separator() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "a.js", "a");
    write_file(temp.path(), "b.js", "b");
    let meta = metadata("1.0.0", None);
    let stamp = meta.substitution_context("@BUILD_NUMBER@");

    let bytes = render(
      &[PathBuf::from("a.js"), PathBuf::from("b.js")],
      ConcatOptions {
        header: None,
        separator: ";\n",
        stamp: false,
      },
      TaskContext::new(temp.path(), &meta, &stamp),
    )
    .unwrap();
    assert_eq!(bytes, b"a;\nb");
  }

  #[test]
  fn stamping_never_touches_inputs() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "header.js", "// @BUILD_NUMBER@");
    write_file(temp.path(), "a.js", "var token = '@BUILD_NUMBER@';");
    let meta = metadata("2.3.1", Some("42"));
    let stamp = meta.substitution_context("@BUILD_NUMBER@");

    let bytes = render(
      &[PathBuf::from("a.js")],
      options(Some(Path::new("header.js")), true),
      TaskContext::new(temp.path(), &meta, &stamp),
    )
    .unwrap();
    assert_eq!(
      String::from_utf8(bytes).unwrap(),
      "// 2.3.1-42\nvar token = '@BUILD_NUMBER@';"
    );
  }

  #[test]
  fn missing_input_is_io_error() {
    let temp = TempDir::new().unwrap();
    let meta = metadata("1.0.0", None);
    let stamp = meta.substitution_context("@BUILD_NUMBER@");

    let err = render(
      &[PathBuf::from("missing.js")],
      options(None, false),
      TaskContext::new(temp.path(), &meta, &stamp),
    )
    .unwrap_err();
    assert!(matches!(err, ExecuteError::Io { action: "read", .. }));
  }
}
