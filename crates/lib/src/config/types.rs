//! Raw payload shapes and config errors.

use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use thiserror::Error;

use crate::types::Bucket;

/// Errors produced while normalizing a directive payload.
///
/// All variants describe malformed configuration; none of them allow a run
/// to continue.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The directive had no payload at all.
  #[error("no buckets nor apps configured for the scoop directive (have you indented them correctly?)")]
  Empty,

  /// The payload is not a map of `buckets`/`apps` lists.
  #[error("malformed scoop directive: {0}")]
  Malformed(String),

  /// A bucket entry is neither a name nor a `{name, repo}` record.
  #[error("bucket entry {index} must be a name or a record with `name` and `repo`")]
  InvalidBucket { index: usize },

  /// An app entry is not a name.
  #[error("app entry {index} must be a name")]
  InvalidApp { index: usize },
}

/// Top-level payload before entries are validated one by one.
///
/// The outer `Option` is whether the key is present at all; the inner one is
/// `None` for an explicit `null`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawDirective {
  #[serde(default, deserialize_with = "present")]
  pub buckets: Option<Option<Vec<Value>>>,
  #[serde(default, deserialize_with = "present")]
  pub apps: Option<Option<Vec<Value>>>,
}

/// Only called for keys that exist, so `null` stays distinguishable from absent.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

/// A bucket as written in configuration.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BucketEntry {
  Name(String),
  Record(BucketRecord),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BucketRecord {
  pub name: String,
  pub repo: String,
}

impl BucketEntry {
  pub fn into_bucket(self) -> Bucket {
    match self {
      BucketEntry::Name(name) => Bucket::named(name),
      BucketEntry::Record(BucketRecord { name, repo }) => Bucket::new(name, Some(repo)),
    }
  }
}
