mod cmd;
mod output;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use output::{OutputFormat, print_error};

/// pipewright - staged build pipelines for browser plugins
#[derive(Parser)]
#[command(name = "pipewright")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the configuration file (default: ./pipewright.toml, or the built-in template)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run a pipeline, or a single task by name
  Run {
    /// Pipeline or task name (a pipeline wins over a task of the same name)
    target: String,

    /// Debounce window for watch tasks, e.g. "500ms" (overrides the configuration)
    #[arg(long, value_parser = parse_interval)]
    interval: Option<Duration>,
  },

  /// List pipelines and registered tasks
  List,

  /// Print the display version (version-buildNumber)
  Version,

  /// Write a starter pipewright.toml
  Init {
    /// Project directory
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(short, long)]
    force: bool,
  },
}

/// A human-readable duration that is not zero.
fn parse_interval(s: &str) -> Result<Duration, String> {
  let interval = humantime::parse_duration(s).map_err(|e| e.to_string())?;
  if interval.is_zero() {
    return Err("interval must be greater than zero".to_string());
  }
  Ok(interval)
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .with_target(false)
    .without_time()
    .init();

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run(cli: Cli) -> Result<()> {
  let config = cli.config.as_deref();
  match cli.command {
    Commands::Run { target, interval } => cmd::cmd_run(config, &target, interval, cli.output),
    Commands::List => cmd::cmd_list(config, cli.output),
    Commands::Version => cmd::cmd_version(config, cli.output),
    Commands::Init { path, force } => cmd::cmd_init(&path, force, cli.output),
  }
}
