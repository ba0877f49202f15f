//! Best-effort installation of missing buckets and apps.
//!
//! Every missing item gets its own command. A failure is recorded and the
//! remaining items are still attempted; nothing is rolled back.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, error};

use crate::manager::{InstallError, PackageManager};
use crate::types::{App, Bucket, render_list, sorted};

/// Per-item outcome of one install pass.
#[derive(Debug)]
pub struct InstallReport<T> {
  pub outcomes: Vec<(T, Result<(), InstallError>)>,
}

impl<T> Default for InstallReport<T> {
  fn default() -> Self {
    Self { outcomes: Vec::new() }
  }
}

impl<T> InstallReport<T> {
  /// Returns true if every command succeeded (vacuously true when nothing ran).
  pub fn is_success(&self) -> bool {
    self.outcomes.iter().all(|(_, result)| result.is_ok())
  }

  /// Items whose command succeeded.
  pub fn succeeded(&self) -> impl Iterator<Item = &T> {
    self.outcomes.iter().filter(|(_, r)| r.is_ok()).map(|(item, _)| item)
  }

  /// Items whose command failed, with the reason.
  pub fn failed(&self) -> impl Iterator<Item = (&T, &InstallError)> {
    self
      .outcomes
      .iter()
      .filter_map(|(item, r)| r.as_ref().err().map(|e| (item, e)))
  }

  pub fn attempted(&self) -> usize {
    self.outcomes.len()
  }
}

/// Add every missing bucket.
pub fn install_buckets<M: PackageManager + ?Sized>(
  manager: &M,
  missing: &HashSet<Bucket>,
) -> InstallReport<Bucket> {
  debug!("Adding buckets {}", render_list(missing));
  install_each(missing, "bucket", |bucket| manager.add_bucket(bucket))
}

/// Install every missing app.
pub fn install_apps<M: PackageManager + ?Sized>(
  manager: &M,
  missing: &HashSet<App>,
) -> InstallReport<App> {
  debug!("Adding apps {}", render_list(missing));
  install_each(missing, "app", |app| manager.install_app(app))
}

fn install_each<T, F>(missing: &HashSet<T>, kind: &str, mut install: F) -> InstallReport<T>
where
  T: Ord + Clone + fmt::Display,
  F: FnMut(&T) -> Result<(), InstallError>,
{
  let outcomes = sorted(missing)
    .into_iter()
    .map(|item| {
      let result = install(item);
      if let Err(err) = &result {
        error!("Failed to add {} {}: {}", kind, item, err);
      }
      (item.clone(), result)
    })
    .collect();

  InstallReport { outcomes }
}
