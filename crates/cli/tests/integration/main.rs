//! End-to-end tests driving the `pipewright` binary against fixture projects.

mod common;
mod list_tests;
mod run_tests;
mod version_tests;
