//! Implementation of the `scoop-sync plan` command.
//!
//! Shows which buckets and apps each `scoop` directive would add, without
//! running any install command.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use scoop_sync_lib::config::parse_directive;
use scoop_sync_lib::consts::DIRECTIVE;
use scoop_sync_lib::diff::StateDiff;
use scoop_sync_lib::manager::PackageManager;
use scoop_sync_lib::reconcile::plan;
use scoop_sync_lib::types::{App, Bucket, sorted};

use crate::host::load_tasks;
use crate::output::{count, print_added, print_info, print_json, print_success};

#[derive(Debug, Serialize)]
struct PlanOutput {
  buckets: Option<Vec<Bucket>>,
  apps: Option<Vec<App>>,
}

impl From<&StateDiff> for PlanOutput {
  fn from(diff: &StateDiff) -> Self {
    Self {
      buckets: diff.buckets.as_ref().map(|b| sorted(b).into_iter().cloned().collect()),
      apps: diff.apps.as_ref().map(|a| sorted(a).into_iter().cloned().collect()),
    }
  }
}

pub fn cmd_plan<M: PackageManager>(file: &str, manager: &M, json: bool) -> Result<()> {
  let path = Path::new(file);
  let tasks = load_tasks(path).with_context(|| format!("Failed to load tasks: {}", file))?;

  let mut diffs = Vec::new();
  for (index, task) in tasks.iter().filter(|t| t.directive == DIRECTIVE).enumerate() {
    let desired = parse_directive(&task.data)
      .with_context(|| format!("Invalid {} directive #{}", DIRECTIVE, index + 1))?;
    let diff = plan(manager, &desired).context("Failed to read installed packages")?;
    diffs.push(diff);
  }

  if json {
    let output: Vec<PlanOutput> = diffs.iter().map(PlanOutput::from).collect();
    return print_json(&output);
  }

  if diffs.is_empty() {
    print_info(&format!("No {} directives in {}", DIRECTIVE, file));
    return Ok(());
  }

  for diff in &diffs {
    print_human_plan(diff);
  }
  Ok(())
}

fn print_human_plan(diff: &StateDiff) {
  if diff.is_empty() {
    print_success("Nothing to add");
    return;
  }

  let buckets = diff.buckets.as_ref().map(sorted).unwrap_or_default();
  let apps = diff.apps.as_ref().map(sorted).unwrap_or_default();

  if !buckets.is_empty() {
    println!("Buckets:");
    for bucket in &buckets {
      print_added(&bucket.to_string());
    }
  }
  if !apps.is_empty() {
    println!("Apps:");
    for app in &apps {
      print_added(&app.to_string());
    }
  }

  print_info(&format!(
    "Would add {} and {}",
    count(buckets.len(), "bucket"),
    count(apps.len(), "app")
  ));
}
