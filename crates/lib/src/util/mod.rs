//! Shared utilities.

pub mod hash;
pub mod path;

#[cfg(test)]
pub mod testutil;
