mod cmd;
mod host;
mod output;
mod plugin;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scoop_sync_lib::consts::DEFAULT_CONFIG;
use scoop_sync_lib::manager::{ManagerConfig, ScoopCli};

use crate::cmd::{cmd_apply, cmd_plan, cmd_status};

/// scoop-sync - Declarative Scoop bucket and app synchronization
#[derive(Parser)]
#[command(name = "scoop-sync")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Package manager executable (overrides SCOOP_SYNC_PROGRAM)
  #[arg(long, global = true, value_name = "PROGRAM")]
  scoop: Option<String>,

  /// Shell to run package manager commands through (overrides SCOOP_SYNC_SHELL)
  #[arg(long, global = true)]
  shell: Option<String>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Add missing buckets and apps, then verify the result
  Apply {
    /// Path to the task file
    #[arg(default_value = DEFAULT_CONFIG)]
    config: String,
  },

  /// Show which buckets and apps would be added
  Plan {
    /// Path to the task file
    #[arg(default_value = DEFAULT_CONFIG)]
    config: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,
  },

  /// Show installed buckets and apps
  Status {
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let mut config = ManagerConfig::from_env();
  if let Some(program) = cli.scoop {
    config.program = program;
  }
  if cli.shell.is_some() {
    config.shell = cli.shell;
  }
  let manager = ScoopCli::new(config);

  match cli.command {
    Commands::Apply { config } => cmd_apply(&config, manager),
    Commands::Plan { config, json } => cmd_plan(&config, &manager, json),
    Commands::Status { json } => cmd_status(&manager, json),
  }
}
