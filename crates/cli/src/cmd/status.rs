//! Status command implementation.
//!
//! Displays the buckets and apps the package manager reports as installed.

use anyhow::{Context, Result};
use serde::Serialize;

use scoop_sync_lib::manager::PackageManager;
use scoop_sync_lib::types::{App, Bucket, sorted};

use crate::output::{self, print_json, print_stat, print_success};

#[derive(Debug, Serialize)]
struct StatusOutput<'a> {
  buckets: Vec<&'a Bucket>,
  apps: Vec<&'a App>,
}

pub fn cmd_status<M: PackageManager>(manager: &M, json: bool) -> Result<()> {
  let installed = manager.export().context("Failed to read installed packages")?;
  let buckets = sorted(&installed.buckets);
  let apps = sorted(&installed.apps);

  if json {
    return print_json(&StatusOutput { buckets, apps });
  }

  print_success("Installed packages");
  print_stat("Buckets", &buckets.len().to_string());
  print_stat("Apps", &apps.len().to_string());

  if !buckets.is_empty() {
    println!();
    println!("Buckets:");
    for bucket in &buckets {
      println!("  {} {}", output::symbols::INFO, bucket);
    }
  }

  if !apps.is_empty() {
    println!();
    println!("Apps:");
    for app in &apps {
      println!("  {} {}", output::symbols::INFO, app);
    }
  }

  Ok(())
}
