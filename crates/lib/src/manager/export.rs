//! Parsing of `scoop export` output.

use serde::Deserialize;

use super::ManifestError;
use crate::types::{App, Bucket, PackageSet};

/// The parts of the export document reconciliation needs.
///
/// Scoop writes more fields per entry (versions, timestamps, manifests);
/// they are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ExportManifest {
  #[serde(default)]
  pub buckets: Vec<ExportBucket>,
  #[serde(default)]
  pub apps: Vec<ExportApp>,
}

#[derive(Debug, Deserialize)]
pub struct ExportBucket {
  #[serde(rename = "Name")]
  pub name: String,
  #[serde(rename = "Source")]
  pub source: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportApp {
  #[serde(rename = "Name")]
  pub name: String,
}

impl From<ExportManifest> for PackageSet {
  fn from(manifest: ExportManifest) -> Self {
    PackageSet::new(
      manifest
        .buckets
        .into_iter()
        .map(|b| Bucket::new(b.name, Some(b.source))),
      manifest.apps.into_iter().map(|a| App::new(a.name)),
    )
  }
}

/// Parse the JSON document printed by `scoop export`.
pub fn parse_export(output: &str) -> Result<PackageSet, ManifestError> {
  // PowerShell may prefix redirected output with a byte order mark.
  let output = output.trim_start_matches('\u{feff}');
  let manifest: ExportManifest = serde_json::from_str(output)?;
  Ok(manifest.into())
}
