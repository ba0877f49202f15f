//! Implementation of the `scoop-sync apply` command.
//!
//! Loads a task file and runs every directive through the plugin host. Buckets
//! and apps declared under `scoop` are added when missing and then verified
//! against a fresh export.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

use scoop_sync_lib::manager::ScoopCli;

use crate::host::{Dispatcher, load_tasks};
use crate::output::{count, print_info, print_success};
use crate::plugin::ScoopPlugin;

pub fn cmd_apply(file: &str, manager: ScoopCli) -> Result<()> {
  let path = Path::new(file);

  let tasks = load_tasks(path).with_context(|| format!("Failed to load tasks: {}", file))?;
  if tasks.is_empty() {
    print_info(&format!("No tasks in {}", file));
    return Ok(());
  }

  info!(config = %path.display(), tasks = tasks.len(), "starting apply");
  let dispatcher = Dispatcher::new().register(ScoopPlugin::new(manager));

  let summary = dispatcher.run(&tasks);
  if !summary.is_success() {
    bail!("{} of {} failed", summary.failed, count(summary.total, "task"));
  }

  print_success(&format!("Applied {}", count(tasks.len(), "task")));
  Ok(())
}
