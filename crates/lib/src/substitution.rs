//! Literal token substitution for text assets.
//!
//! Unlike [`crate::placeholder`], which parses structured `$${...}` references
//! in tool arguments, this engine replaces a single fixed token verbatim. It is
//! used to stamp the display version into the license header before the header
//! is prepended to the distributed scripts.

use serde::{Deserialize, Serialize};

/// A token and the value that replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionContext {
  pattern: String,
  replacement: String,
}

impl SubstitutionContext {
  pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
    Self {
      pattern: pattern.into(),
      replacement: replacement.into(),
    }
  }

  pub fn pattern(&self) -> &str {
    &self.pattern
  }

  pub fn replacement(&self) -> &str {
    &self.replacement
  }
}

/// Replace every occurrence of the context's pattern in `text`.
///
/// Text outside the matched tokens is passed through unchanged. An empty
/// pattern matches nothing.
pub fn substitute(text: &str, ctx: &SubstitutionContext) -> String {
  if ctx.pattern.is_empty() {
    return text.to_string();
  }
  text.replace(&ctx.pattern, &ctx.replacement)
}

/// Count non-overlapping occurrences of `pattern` in `text`.
pub fn count_occurrences(text: &str, pattern: &str) -> usize {
  if pattern.is_empty() {
    return 0;
  }
  text.matches(pattern).count()
}
