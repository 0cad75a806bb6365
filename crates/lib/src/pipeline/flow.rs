//! Artifact flow between tasks.
//!
//! Tasks never name each other; they are linked only through paths. A task
//! that declares an input overlapping another task's output consumes that
//! task's artifact. The resulting graph is used to reject tasks that feed each
//! other in a loop and pipelines that would run a consumer before its producer.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use thiserror::Error;

use super::PipelineDefinition;
use crate::task::TaskRegistry;
use crate::util::path::overlaps;

#[derive(Debug, Error)]
pub enum FlowError {
  #[error(
    "pipeline '{pipeline}': task '{consumer}' reads {} before task '{producer}' writes it",
    path.display()
  )]
  ConsumedBeforeProduced {
    pipeline: String,
    consumer: String,
    producer: String,
    path: PathBuf,
  },

  #[error("pipeline '{pipeline}': watch task '{task}' never finishes, so '{next}' cannot run after it")]
  WatchNotLast {
    pipeline: String,
    task: String,
    next: String,
  },

  #[error("task '{0}' reads its own output through other tasks")]
  Cycle(String),
}

/// Producer to consumer edges, labelled with the consumed path.
#[derive(Debug)]
pub struct ArtifactFlow {
  graph: DiGraph<String, PathBuf>,
  nodes: HashMap<String, NodeIndex>,
  watchers: HashSet<String>,
}

impl ArtifactFlow {
  /// Link every registered task to the tasks whose outputs it reads.
  pub fn from_registry(registry: &TaskRegistry) -> Self {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();
    let mut watchers = HashSet::new();
    for task in registry.iter() {
      nodes.insert(task.name.clone(), graph.add_node(task.name.clone()));
      if task.kind.is_watch() {
        watchers.insert(task.name.clone());
      }
    }

    for consumer in registry.iter() {
      for producer in registry.iter() {
        if producer.name == consumer.name {
          continue;
        }
        let consumed = consumer
          .required_inputs()
          .into_iter()
          .find(|input| producer.outputs.iter().any(|output| overlaps(input, output)));
        if let Some(path) = consumed {
          graph.add_edge(nodes[&producer.name], nodes[&consumer.name], path.to_path_buf());
        }
      }
    }

    Self { graph, nodes, watchers }
  }

  /// Tasks whose outputs `task` reads, with the path read from each.
  pub fn producers_of(&self, task: &str) -> Vec<(&str, &PathBuf)> {
    let Some(&node) = self.nodes.get(task) else {
      return Vec::new();
    };
    let mut producers: Vec<(&str, &PathBuf)> = self
      .graph
      .edges_directed(node, Direction::Incoming)
      .map(|edge| (self.graph[edge.source()].as_str(), edge.weight()))
      .collect();
    producers.sort();
    producers
  }

  /// Reject a pipeline that runs a task before a producer it depends on, or
  /// that schedules anything after a watch task.
  ///
  /// Producers absent from the pipeline are ignored; their artifacts are
  /// expected to exist already (the runner checks inputs before each task).
  pub fn validate(&self, definition: &PipelineDefinition) -> Result<(), FlowError> {
    if let Some(position) = definition.tasks.iter().position(|t| self.watchers.contains(t))
      && let Some(next) = definition.tasks.get(position + 1)
    {
      return Err(FlowError::WatchNotLast {
        pipeline: definition.name.clone(),
        task: definition.tasks[position].clone(),
        next: next.clone(),
      });
    }

    for (position, consumer) in definition.tasks.iter().enumerate() {
      for (producer, path) in self.producers_of(consumer) {
        let earlier = definition.tasks[..position].iter().any(|t| t == producer);
        let later = definition.tasks[position + 1..].iter().any(|t| t == producer);
        if later && !earlier {
          return Err(FlowError::ConsumedBeforeProduced {
            pipeline: definition.name.clone(),
            consumer: consumer.clone(),
            producer: producer.to_string(),
            path: path.clone(),
          });
        }
      }
    }
    Ok(())
  }

  /// Fail if some set of tasks read each other's outputs in a loop. No order
  /// of such tasks can satisfy every input.
  pub fn check_acyclic(&self) -> Result<(), FlowError> {
    petgraph::algo::toposort(&self.graph, None)
      .map(|_| ())
      .map_err(|cycle| FlowError::Cycle(self.graph[cycle.node_id()].clone()))
  }
}

/// Check that no task in `definition` reads an artifact written by a task
/// scheduled after it.
pub fn validate_artifact_flow(definition: &PipelineDefinition, registry: &TaskRegistry) -> Result<(), FlowError> {
  ArtifactFlow::from_registry(registry).validate(definition)
}
