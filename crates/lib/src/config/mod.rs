//! Parsing of `scoop` directive payloads.
//!
//! A payload looks like:
//!
//! ```yaml
//! buckets:
//!   - extras
//!   - name: versions
//!     repo: https://github.com/ScoopInstaller/Versions
//! apps:
//!   - git
//! ```
//!
//! Either key may be omitted to leave that category alone. A key that is
//! present but `null` manages an empty set, like `[]`.

mod types;

pub use types::*;

use std::collections::HashSet;

use serde_yaml::Value;
use tracing::debug;

use crate::types::{App, Bucket, DesiredState};

/// Normalize a directive payload into the desired buckets and apps.
///
/// Duplicate names collapse into one entry; for buckets the later entry's
/// repository wins.
pub fn parse_directive(payload: &Value) -> Result<DesiredState, ConfigError> {
  if payload.is_null() {
    return Err(ConfigError::Empty);
  }

  let raw: RawDirective =
    serde_yaml::from_value(payload.clone()).map_err(|e| ConfigError::Malformed(e.to_string()))?;

  let buckets = raw
    .buckets
    .map(|entries| parse_buckets(&entries.unwrap_or_default()))
    .transpose()?;
  let apps = raw
    .apps
    .map(|entries| parse_apps(&entries.unwrap_or_default()))
    .transpose()?;

  debug!(
    buckets = buckets.as_ref().map(HashSet::len),
    apps = apps.as_ref().map(HashSet::len),
    "parsed scoop directive"
  );

  Ok(DesiredState { buckets, apps })
}

fn parse_buckets(entries: &[Value]) -> Result<HashSet<Bucket>, ConfigError> {
  let mut buckets = HashSet::with_capacity(entries.len());
  for (index, entry) in entries.iter().enumerate() {
    let entry: BucketEntry =
      serde_yaml::from_value(entry.clone()).map_err(|_| ConfigError::InvalidBucket { index })?;
    buckets.replace(entry.into_bucket());
  }
  Ok(buckets)
}

fn parse_apps(entries: &[Value]) -> Result<HashSet<App>, ConfigError> {
  entries
    .iter()
    .enumerate()
    .map(|(index, entry)| match entry {
      Value::String(name) => Ok(App::new(name.as_str())),
      _ => Err(ConfigError::InvalidApp { index }),
    })
    .collect()
}
