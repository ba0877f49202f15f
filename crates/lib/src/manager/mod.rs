//! Access to the package manager.
//!
//! The reconciliation core only talks to the package manager through the
//! [`PackageManager`] trait, so it can run against [`ScoopCli`] in production
//! and against an in-memory fake in tests.

mod export;
mod scoop;

pub use export::{ExportManifest, parse_export};
pub use scoop::{ManagerConfig, ScoopCli};

use thiserror::Error;

use crate::types::{App, Bucket, PackageSet};

/// The three package manager operations reconciliation relies on.
///
/// Every call blocks until the underlying command has finished.
pub trait PackageManager {
  /// Read the installed buckets and apps.
  fn export(&self) -> Result<PackageSet, ManifestError>;

  /// Register a bucket, passing its repository only when one is set.
  fn add_bucket(&self, bucket: &Bucket) -> Result<(), InstallError>;

  /// Install an app by name.
  fn install_app(&self, app: &App) -> Result<(), InstallError>;
}

/// The installed state could not be determined.
#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to run `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("`{command}` failed with exit code {code:?}")]
  CommandFailed { command: String, code: Option<i32> },

  #[error("unable to parse manifest: {0}")]
  Parse(#[from] serde_json::Error),
}

/// A single bucket add or app install did not succeed.
#[derive(Debug, Error)]
pub enum InstallError {
  #[error("failed to run `{command}`: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("`{command}` failed with exit code {code:?}")]
  CommandFailed { command: String, code: Option<i32> },
}
