//! Pipelines: named task sequences and the runner that executes them.

mod definition;
mod flow;
mod runner;
mod types;

pub use definition::PipelineDefinition;
pub use flow::{ArtifactFlow, FlowError, validate_artifact_flow};
pub use runner::Runner;
pub use types::{ArtifactRecord, PipelineError, RunReport, TaskReport};
