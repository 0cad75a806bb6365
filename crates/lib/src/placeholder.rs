//! Placeholder parsing and substitution for tool arguments and task paths.
//!
//! Task declarations cannot hard-code the values that depend on the run: the
//! package name, the display version, or the concrete input and output paths
//! handed to an external tool. Placeholders defer those values until they are
//! known.
//!
//! # Placeholder Formats
//!
//! - `$${name}`, `$${version}`, `$${build_number}`, `$${display_version}` - build metadata
//! - `$${input:N}` - the task's Nth declared input
//! - `$${inputs}` - all declared inputs (one argument each when used alone)
//! - `$${out}` / `$${out:N}` - the task's first / Nth declared output
//!
//! Metadata placeholders may appear in task paths and are resolved when the
//! configuration is loaded. Input and output placeholders are only valid in
//! tool arguments and environment values, which are resolved at invocation.
//!
//! # Shell Variables
//!
//! Single `$` characters pass through unchanged, so `$HOME` and `$PATH` work
//! in arguments without escaping.
//!
//! # Escaping
//!
//! Use `$$$` before `{` to produce a literal `$${` sequence.
//!
//! # Example
//!
//! ```
//! use pipewright_lib::placeholder::{parse, MetaField, Placeholder, Segment};
//!
//! let segments = parse("dist/$${name}/plugin.js").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Literal("dist/".to_string()),
//!     Segment::Placeholder(Placeholder::Meta(MetaField::Name)),
//!     Segment::Literal("/plugin.js".to_string()),
//! ]);
//! ```

use thiserror::Error;

/// Build metadata fields addressable from a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
  Name,
  Version,
  BuildNumber,
  DisplayVersion,
}

/// A parsed placeholder reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
  /// `$${input:N}` - the Nth declared input path
  Input(usize),

  /// `$${inputs}` - every declared input path
  Inputs,

  /// `$${out}` or `$${out:N}` - the Nth declared output path
  Out(usize),

  /// `$${name}` and friends - a build metadata value
  Meta(MetaField),
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A placeholder to be resolved
  Placeholder(Placeholder),
}

/// Errors that can occur during placeholder parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unknown placeholder type: {0}")]
  UnknownType(String),

  #[error("invalid index: {0}")]
  InvalidIndex(String),

  #[error("malformed placeholder: {0}")]
  Malformed(String),

  #[error("unresolved input: index {0}")]
  UnresolvedInput(usize),

  #[error("unresolved output: index {0}")]
  UnresolvedOutput(usize),

  #[error("placeholder '{0}' is not available in this context")]
  NotAvailable(String),
}

/// Trait for resolving placeholder values.
pub trait Resolver {
  /// Resolve the Nth declared input.
  fn resolve_input(&self, index: usize) -> Result<String, PlaceholderError>;

  /// Resolve all declared inputs, in declaration order.
  fn resolve_inputs(&self) -> Result<Vec<String>, PlaceholderError>;

  /// Resolve the Nth declared output.
  fn resolve_out(&self, index: usize) -> Result<String, PlaceholderError>;

  /// Resolve a build metadata field.
  fn resolve_meta(&self, field: MetaField) -> Result<String, PlaceholderError>;
}

/// Parse a string containing placeholders into segments.
///
/// # Errors
///
/// Returns an error if a placeholder is malformed (unclosed, unknown type, etc.)
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek() {
      Some((_, '$')) => {
        chars.next();

        match chars.peek() {
          Some((_, '$')) => {
            chars.next();

            // $$${ is the escape for a literal $${
            if let Some((_, '{')) = chars.peek() {
              literal.push_str("$${");
              chars.next();
            } else {
              literal.push_str("$$$");
            }
          }
          Some((_, '{')) => {
            chars.next();

            if !literal.is_empty() {
              segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }

            let mut content = String::new();
            let mut found_close = false;
            for (_, c) in chars.by_ref() {
              if c == '}' {
                found_close = true;
                break;
              }
              content.push(c);
            }

            if !found_close {
              return Err(PlaceholderError::Unclosed(pos));
            }

            segments.push(Segment::Placeholder(parse_placeholder_content(&content)?));
          }
          _ => literal.push_str("$$"),
        }
      }
      _ => literal.push('$'),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Parse the content inside a placeholder (everything between `$${` and `}`).
fn parse_placeholder_content(content: &str) -> Result<Placeholder, PlaceholderError> {
  match content {
    "name" => return Ok(Placeholder::Meta(MetaField::Name)),
    "version" => return Ok(Placeholder::Meta(MetaField::Version)),
    "build_number" => return Ok(Placeholder::Meta(MetaField::BuildNumber)),
    "display_version" => return Ok(Placeholder::Meta(MetaField::DisplayVersion)),
    "inputs" => return Ok(Placeholder::Inputs),
    "out" => return Ok(Placeholder::Out(0)),
    "input" => return Err(PlaceholderError::Malformed("input placeholder missing index".to_string())),
    _ => {}
  }

  let (kind, rest) = content
    .split_once(':')
    .ok_or_else(|| PlaceholderError::UnknownType(content.to_string()))?;

  let index = || {
    rest
      .parse::<usize>()
      .map_err(|_| PlaceholderError::InvalidIndex(rest.to_string()))
  };

  match kind {
    "input" => Ok(Placeholder::Input(index()?)),
    "out" => Ok(Placeholder::Out(index()?)),
    _ => Err(PlaceholderError::UnknownType(kind.to_string())),
  }
}

/// Substitute all placeholders in a string using the provided resolver.
///
/// `$${inputs}` embedded in a larger string expands to the inputs joined by
/// single spaces.
///
/// # Errors
///
/// Returns an error if parsing fails or if any placeholder cannot be resolved.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  substitute_segments(&segments, resolver)
}

/// Substitute placeholders in pre-parsed segments.
pub fn substitute_segments(segments: &[Segment], resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Placeholder(p) => {
        let value = match p {
          Placeholder::Input(index) => resolver.resolve_input(*index)?,
          Placeholder::Inputs => resolver.resolve_inputs()?.join(" "),
          Placeholder::Out(index) => resolver.resolve_out(*index)?,
          Placeholder::Meta(field) => resolver.resolve_meta(*field)?,
        };
        result.push_str(&value);
      }
    }
  }

  Ok(result)
}

/// Substitute placeholders in an argument vector.
///
/// An argument consisting solely of `$${inputs}` is spliced into one argument
/// per input, so tools receive each path separately.
pub fn substitute_args(args: &[String], resolver: &impl Resolver) -> Result<Vec<String>, PlaceholderError> {
  let mut resolved = Vec::with_capacity(args.len());

  for arg in args {
    let segments = parse(arg)?;
    if let [Segment::Placeholder(Placeholder::Inputs)] = segments.as_slice() {
      resolved.extend(resolver.resolve_inputs()?);
    } else {
      resolved.push(substitute_segments(&segments, resolver)?);
    }
  }

  Ok(resolved)
}
