//! Task model and the registry of named tasks.
//!
//! A [`Task`] describes one build step: its [`TaskKind`], the paths it reads,
//! and the paths it writes. Tasks are registered once, by unique name, in a
//! [`TaskRegistry`]. Pipelines refer to them by name.

mod registry;
mod types;

pub use registry::{RegistryError, TaskRegistry};
pub use types::{CustomAction, Task, TaskKind, ToolCommand};
