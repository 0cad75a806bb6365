//! Watch loop for `watch-bundle` tasks.
//!
//! The task's tool compiles once up front, then again whenever the file
//! watcher reports a change under the watched paths. Changes are debounced so
//! that an editor's burst of writes triggers a single rebuild. A failed
//! compile is reported and the loop keeps going; only the shutdown signal
//! ends it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use notify_debouncer_mini::notify::{self, RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use crate::execute::{self, ExecuteError, TaskContext};
use crate::livereload::LiveReloadServer;
use crate::task::Task;

#[derive(Debug, Error)]
pub enum WatchError {
  #[error("failed to start the file watcher")]
  Start(#[source] notify::Error),

  #[error("failed to watch {}", path.display())]
  Path {
    path: PathBuf,
    #[source]
    source: notify::Error,
  },
}

/// What a watch loop watches.
#[derive(Debug, Clone)]
pub struct WatchOptions {
  /// Files or directories to watch recursively, already resolved against the
  /// project root. Each must exist.
  pub paths: Vec<PathBuf>,
  /// Quiet period after the last change before a rebuild starts.
  pub debounce: Duration,
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
  /// Compiles attempted, the initial one included.
  pub builds: usize,
  pub failures: usize,
}

/// Run the compile-on-change loop until `shutdown` becomes `true` (or its
/// sender is dropped).
///
/// After each successful compile every declared output must exist; the first
/// output is then announced to live-reload clients.
///
/// # Errors
///
/// Only when the file watcher cannot be started. Compile failures are
/// counted in the summary instead.
pub async fn watch_task(
  task: &Task,
  ctx: TaskContext<'_>,
  options: &WatchOptions,
  livereload: Option<&LiveReloadServer>,
  mut shutdown: watch::Receiver<bool>,
) -> Result<WatchSummary, WatchError> {
  let (tx, mut changes) = mpsc::unbounded_channel();
  let _watcher = start_watcher(options, tx)?;
  info!(
    task = %task.name,
    paths = ?options.paths,
    debounce = ?options.debounce,
    "watching for changes"
  );

  let mut summary = WatchSummary::default();
  rebuild(task, ctx, livereload, &mut summary).await;

  loop {
    if *shutdown.borrow() {
      break;
    }
    let mut changed: Vec<PathBuf> = tokio::select! {
      result = shutdown.changed() => {
        if result.is_err() || *shutdown.borrow() {
          break;
        }
        continue;
      }
      batch = changes.recv() => match batch {
        Some(paths) => paths,
        None => break,
      },
    };
    while let Ok(more) = changes.try_recv() {
      changed.extend(more);
    }

    info!(task = %task.name, changed = changed.len(), first = ?changed.first(), "sources changed");
    rebuild(task, ctx, livereload, &mut summary).await;
  }

  info!(task = %task.name, builds = summary.builds, failures = summary.failures, "watch stopped");
  Ok(summary)
}

/// Start a debounced recursive watcher forwarding changed paths to `tx`.
/// Watching stops when the returned debouncer is dropped.
fn start_watcher(
  options: &WatchOptions,
  tx: mpsc::UnboundedSender<Vec<PathBuf>>,
) -> Result<Debouncer<RecommendedWatcher>, WatchError> {
  let mut debouncer = new_debouncer(options.debounce, move |result: DebounceEventResult| match result {
    Ok(events) => {
      let _ = tx.send(events.into_iter().map(|event| event.path).collect());
    }
    Err(e) => warn!(error = ?e, "file watcher error"),
  })
  .map_err(WatchError::Start)?;

  for path in &options.paths {
    debouncer
      .watcher()
      .watch(path, RecursiveMode::Recursive)
      .map_err(|source| WatchError::Path {
        path: path.clone(),
        source,
      })?;
  }
  Ok(debouncer)
}

async fn rebuild(task: &Task, ctx: TaskContext<'_>, livereload: Option<&LiveReloadServer>, summary: &mut WatchSummary) {
  summary.builds += 1;
  let started = Instant::now();

  match compile(task, ctx).await {
    Ok(()) => {
      info!(task = %task.name, elapsed = ?started.elapsed(), "rebuilt");
      if let (Some(server), Some(output)) = (livereload, task.outputs.first()) {
        server.notify(&output.to_string_lossy());
      }
    }
    Err(e) => {
      summary.failures += 1;
      error!(task = %task.name, "compile failed: {e}");
    }
  }
}

async fn compile(task: &Task, ctx: TaskContext<'_>) -> Result<(), String> {
  let outcome = execute::execute_task(task, ctx).await.map_err(|e| describe(&e))?;
  outcome.log(&task.name);

  let missing: Vec<_> = task.outputs.iter().filter(|o| !ctx.path(o).exists()).collect();
  if let Some(first) = missing.first() {
    warn!(task = %task.name, missing = missing.len(), "compile produced no output");
    return Err(format!("output {} was not produced", first.display()));
  }
  Ok(())
}

fn describe(e: &ExecuteError) -> String {
  let mut message = e.to_string();
  let mut source = std::error::Error::source(e);
  while let Some(inner) = source {
    message.push_str(": ");
    message.push_str(&inner.to_string());
    source = inner.source();
  }
  message
}
