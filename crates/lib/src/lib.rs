//! pipewright-lib: staged build pipelines for browser plugins.
//!
//! This crate provides the pieces behind the `pipewright` command:
//! - `BuildMetadata`: package name, version, and CI build number
//! - `Task` / `TaskRegistry`: typed build steps registered by unique name
//! - `PipelineDefinition` / `Runner`: ordered task sequences and their execution
//! - `watch` / `livereload`: the rebuild-on-change loop of the dev pipeline
//!
//! Tasks exchange data only through the files they declare as inputs and
//! outputs; the runner checks both around every task.

pub mod config;
pub mod consts;
pub mod execute;
pub mod init;
pub mod livereload;
pub mod pipeline;
pub mod placeholder;
pub mod substitution;
pub mod task;
pub mod util;
pub mod watch;
