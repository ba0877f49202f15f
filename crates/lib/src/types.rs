//! Identity model for buckets and apps.
//!
//! Both types compare, hash and order by name alone. A bucket's repository is
//! metadata: `extras` pointing at two different URLs is still one bucket.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// A named package source registered with the package manager.
#[derive(Debug, Clone, Serialize)]
pub struct Bucket {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub repo: Option<String>,
}

impl Bucket {
  pub fn new(name: impl Into<String>, repo: Option<String>) -> Self {
    Self {
      name: name.into(),
      repo,
    }
  }

  /// A bucket known only by name; the package manager resolves its source.
  pub fn named(name: impl Into<String>) -> Self {
    Self::new(name, None)
  }
}

impl PartialEq for Bucket {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl Eq for Bucket {}

impl Hash for Bucket {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.name.hash(state);
  }
}

impl PartialOrd for Bucket {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Bucket {
  fn cmp(&self, other: &Self) -> Ordering {
    self.name.cmp(&other.name)
  }
}

impl fmt::Display for Bucket {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.repo {
      Some(repo) => write!(f, "{} ({})", self.name, repo),
      None => write!(f, "{}", self.name),
    }
  }
}

/// An installable package tracked by the package manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct App {
  pub name: String,
}

impl App {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl fmt::Display for App {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

/// Snapshot of what the package manager reports as installed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageSet {
  pub buckets: HashSet<Bucket>,
  pub apps: HashSet<App>,
}

impl PackageSet {
  pub fn new(
    buckets: impl IntoIterator<Item = Bucket>,
    apps: impl IntoIterator<Item = App>,
  ) -> Self {
    Self {
      buckets: buckets.into_iter().collect(),
      apps: apps.into_iter().collect(),
    }
  }
}

/// What a `scoop` directive asks for.
///
/// `None` means the category was not mentioned: nothing is installed for it
/// and it is not verified. `Some` of an empty set asks to verify that nothing
/// needs to change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredState {
  pub buckets: Option<HashSet<Bucket>>,
  pub apps: Option<HashSet<App>>,
}

impl DesiredState {
  /// Returns true if neither category is managed.
  pub fn is_unmanaged(&self) -> bool {
    self.buckets.is_none() && self.apps.is_none()
  }
}

/// Returns the set's members in name order, for stable logs and command order.
pub fn sorted<T: Ord>(set: &HashSet<T>) -> Vec<&T> {
  let mut items: Vec<&T> = set.iter().collect();
  items.sort();
  items
}

/// Renders a set as `[a, b (repo), c]` in name order.
pub fn render_list<T: Ord + fmt::Display>(set: &HashSet<T>) -> String {
  let items: Vec<String> = sorted(set).into_iter().map(ToString::to_string).collect();
  format!("[{}]", items.join(", "))
}
