//! Diff computation between desired and installed state.

use std::collections::HashSet;
use std::hash::Hash;

use crate::types::{App, Bucket, DesiredState, PackageSet};

/// Items that have to be added to reach the desired state.
///
/// Categories the desired state leaves unmanaged stay `None`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StateDiff {
  pub buckets: Option<HashSet<Bucket>>,
  pub apps: Option<HashSet<App>>,
}

impl StateDiff {
  /// Returns true if nothing needs to be added.
  pub fn is_empty(&self) -> bool {
    self.change_count() == 0
  }

  /// Total number of buckets and apps to add.
  pub fn change_count(&self) -> usize {
    self.buckets.as_ref().map_or(0, HashSet::len) + self.apps.as_ref().map_or(0, HashSet::len)
  }
}

/// Desired items absent from the installed set, compared by identity.
pub fn missing<T: Eq + Hash + Clone>(desired: &HashSet<T>, installed: &HashSet<T>) -> HashSet<T> {
  desired.difference(installed).cloned().collect()
}

/// Compute what has to be added for every managed category.
///
/// Missing items keep the desired side's metadata, so a bucket declared with
/// a repository is added from that repository.
pub fn compute_diff(desired: &DesiredState, installed: &PackageSet) -> StateDiff {
  StateDiff {
    buckets: desired.buckets.as_ref().map(|d| missing(d, &installed.buckets)),
    apps: desired.apps.as_ref().map(|d| missing(d, &installed.apps)),
  }
}
