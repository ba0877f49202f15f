//! Reconciliation orchestration.
//!
//! This module sequences a full run:
//!
//! 1. Read the baseline manifest
//! 2. Compute what is missing
//! 3. Add missing buckets, then install missing apps
//! 4. Read the manifest again
//! 5. Verify every desired item is now present
//!
//! Only an unreadable manifest aborts a run. Install failures are recorded
//! and the run continues to verification so the final state is always known.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use serde_yaml::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{ConfigError, parse_directive};
use crate::diff::{StateDiff, compute_diff};
use crate::install::{InstallReport, install_apps, install_buckets};
use crate::manager::{ManifestError, PackageManager};
use crate::types::{App, Bucket, DesiredState, render_list, sorted};
use crate::verify::{unverified, verify};

/// Errors that abort a run before any verification could happen.
#[derive(Debug, Error)]
pub enum ReconcileError {
  #[error("invalid configuration: {0}")]
  Config(#[from] ConfigError),

  #[error("unable to read installed packages: {0}")]
  Manifest(#[from] ManifestError),
}

/// Outcome for one category (buckets or apps).
#[derive(Debug)]
pub struct CategoryReport<T> {
  /// Items that were missing before installation.
  pub missing: HashSet<T>,
  /// Per-item command results.
  pub install: InstallReport<T>,
  /// Desired items absent from the post-install manifest.
  pub unverified: Vec<T>,
}

impl<T> CategoryReport<T> {
  /// True when the post-install manifest contains every desired item.
  pub fn is_verified(&self) -> bool {
    self.unverified.is_empty()
  }

  /// True when every command succeeded and verification passed.
  pub fn is_success(&self) -> bool {
    self.install.is_success() && self.is_verified()
  }
}

/// Result of a completed run. Unmanaged categories have no report.
#[derive(Debug, Default)]
pub struct ReconcileReport {
  pub buckets: Option<CategoryReport<Bucket>>,
  pub apps: Option<CategoryReport<App>>,
}

impl ReconcileReport {
  /// True when every managed category installed and verified successfully.
  pub fn is_success(&self) -> bool {
    self.buckets.as_ref().is_none_or(CategoryReport::is_success)
      && self.apps.as_ref().is_none_or(CategoryReport::is_success)
  }
}

/// Bring the installed state up to `desired`.
pub fn reconcile<M: PackageManager + ?Sized>(
  manager: &M,
  desired: &DesiredState,
) -> Result<ReconcileReport, ReconcileError> {
  let installed = manager.export()?;
  debug!(
    "Found buckets {} already configured and apps {} already installed",
    render_list(&installed.buckets),
    render_list(&installed.apps)
  );
  debug!(
    "Aiming for buckets {} to be configured and apps {} to be installed",
    describe(desired.buckets.as_ref()),
    describe(desired.apps.as_ref())
  );

  let diff = compute_diff(desired, &installed);
  info!(missing = diff.change_count(), "computed diff");

  let bucket_install = diff.buckets.as_ref().map(|missing| install_buckets(manager, missing));
  let app_install = diff.apps.as_ref().map(|missing| install_apps(manager, missing));

  // Exit codes are not trustworthy, so check the real state.
  let new_installed = manager.export()?;
  debug!(
    "New installed set of buckets {} and apps {}",
    render_list(&new_installed.buckets),
    render_list(&new_installed.apps)
  );

  let buckets = match (&desired.buckets, diff.buckets, bucket_install) {
    (Some(wanted), Some(missing), Some(install)) => {
      Some(category_report("buckets", wanted, &new_installed.buckets, missing, install))
    }
    _ => None,
  };
  let apps = match (&desired.apps, diff.apps, app_install) {
    (Some(wanted), Some(missing), Some(install)) => {
      Some(category_report("apps", wanted, &new_installed.apps, missing, install))
    }
    _ => None,
  };

  Ok(ReconcileReport { buckets, apps })
}

fn category_report<T>(
  kind: &str,
  desired: &HashSet<T>,
  installed: &HashSet<T>,
  missing: HashSet<T>,
  install: InstallReport<T>,
) -> CategoryReport<T>
where
  T: Eq + Hash + Ord + Clone + fmt::Display,
{
  let verified = verify(desired, installed);
  let mut absent: Vec<T> = unverified(desired, installed).into_iter().cloned().collect();
  absent.sort();

  if verified && install.is_success() {
    info!("All {} have been added", kind);
  } else {
    if !absent.is_empty() {
      let names: Vec<String> = absent.iter().map(ToString::to_string).collect();
      debug!("Still missing {} [{}]", kind, names.join(", "));
    }
    error!("Some {} were not successfully added", kind);
  }

  CategoryReport {
    missing,
    install,
    unverified: absent,
  }
}

fn describe<T: Ord + fmt::Display>(set: Option<&HashSet<T>>) -> String {
  match set {
    Some(set) => render_list(set),
    None => "(unmanaged)".to_string(),
  }
}

/// Report what a run would add without issuing any install command.
pub fn plan<M: PackageManager + ?Sized>(
  manager: &M,
  desired: &DesiredState,
) -> Result<StateDiff, ManifestError> {
  let installed = manager.export()?;
  let diff = compute_diff(desired, &installed);

  if let Some(missing) = &diff.buckets {
    for bucket in sorted(missing) {
      debug!(bucket = %bucket, "bucket would be added");
    }
  }
  if let Some(missing) = &diff.apps {
    for app in sorted(missing) {
      debug!(app = %app, "app would be installed");
    }
  }

  Ok(diff)
}

/// Reconcile a raw `scoop` directive payload, reporting only overall success.
///
/// Errors that abort the run are logged here; nothing is raised to the caller.
pub fn reconcile_packages<M: PackageManager + ?Sized>(manager: &M, payload: &Value) -> bool {
  let desired = match parse_directive(payload) {
    Ok(desired) => desired,
    Err(err) => {
      error!("{}", err);
      return false;
    }
  };

  match reconcile(manager, &desired) {
    Ok(report) => report.is_success(),
    Err(err) => {
      error!("{}", err);
      false
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::PackageSet;
  use crate::util::testutil::FakeScoop;
  use tracing_test::traced_test;

  fn yaml(src: &str) -> Value {
    serde_yaml::from_str(src).unwrap()
  }

  #[test]
  #[traced_test]
  fn installs_and_verifies_missing_items() {
    let scoop = FakeScoop::new();

    let ok = reconcile_packages(&scoop, &yaml("buckets: [extras]\napps: [git]"));

    assert!(ok);
    assert_eq!(scoop.commands(), vec!["bucket add extras", "install git"]);
    assert_eq!(scoop.export_calls(), 2);
    assert!(logs_contain("All buckets have been added"));
    assert!(logs_contain("All apps have been added"));
  }

  #[test]
  #[traced_test]
  fn failed_install_fails_run_without_touching_buckets() {
    let scoop = FakeScoop::new().failing_install("vscode");

    let ok = reconcile_packages(&scoop, &yaml("apps: [vscode]"));

    assert!(!ok);
    assert_eq!(scoop.commands(), vec!["install vscode"]);
    assert_eq!(scoop.export_calls(), 2);
    assert!(logs_contain("Some apps were not successfully added"));
    assert!(!logs_contain("buckets were not successfully added"));
    assert!(!logs_contain("All buckets have been added"));
  }

  #[test]
  fn failed_baseline_export_issues_no_commands() {
    let scoop = FakeScoop::new().failing_export(1);

    let ok = reconcile_packages(&scoop, &yaml("buckets: [extras]\napps: [git]"));

    assert!(!ok);
    assert!(scoop.commands().is_empty());
    assert_eq!(scoop.export_calls(), 1);
  }

  #[test]
  fn failed_post_export_aborts() {
    let scoop = FakeScoop::new().failing_export(2);
    let desired = parse_directive(&yaml("apps: [git]")).unwrap();

    let result = reconcile(&scoop, &desired);

    assert!(matches!(result, Err(ReconcileError::Manifest(_))));
    assert_eq!(scoop.commands(), vec!["install git"]);
  }

  #[test]
  fn malformed_config_issues_no_commands() {
    let scoop = FakeScoop::new();

    let ok = reconcile_packages(&scoop, &yaml("buckets:\n  - name: versions\n"));

    assert!(!ok);
    assert!(scoop.commands().is_empty());
    assert_eq!(scoop.export_calls(), 0);
  }

  #[test]
  fn null_payload_fails() {
    let scoop = FakeScoop::new();
    assert!(!reconcile_packages(&scoop, &Value::Null));
    assert_eq!(scoop.export_calls(), 0);
  }

  #[test]
  fn bucket_repo_is_passed_only_when_declared() {
    let scoop = FakeScoop::new();
    let payload = yaml(
      r#"
buckets:
  - extras
  - name: versions
    repo: https://example/versions
"#,
    );

    assert!(reconcile_packages(&scoop, &payload));
    assert_eq!(
      scoop.commands(),
      vec!["bucket add extras", "bucket add versions https://example/versions"]
    );
  }

  #[test]
  #[traced_test]
  fn silent_failure_is_caught_by_verification() {
    let scoop = FakeScoop::new().silently_failing("extras");
    let desired = parse_directive(&yaml("buckets: [extras]")).unwrap();

    let report = reconcile(&scoop, &desired).unwrap();
    let buckets = report.buckets.as_ref().unwrap();

    assert!(buckets.install.is_success());
    assert!(!buckets.is_verified());
    assert_eq!(buckets.unverified, vec![Bucket::named("extras")]);
    assert!(!report.is_success());
    assert!(logs_contain("Some buckets were not successfully added"));
  }

  #[test]
  fn second_run_is_a_no_op() {
    let scoop = FakeScoop::new();
    let desired = parse_directive(&yaml("buckets: [extras]\napps: [git, 7zip]")).unwrap();

    assert!(reconcile(&scoop, &desired).unwrap().is_success());
    let first_run = scoop.commands().len();

    let report = reconcile(&scoop, &desired).unwrap();
    assert!(report.is_success());
    assert_eq!(scoop.commands().len(), first_run);
    assert!(report.buckets.unwrap().missing.is_empty());
    assert!(report.apps.unwrap().missing.is_empty());
  }

  #[test]
  fn extra_installed_items_are_not_an_error() {
    let installed = PackageSet::new(
      [Bucket::new("main", Some("https://github.com/ScoopInstaller/Main".to_string()))],
      [App::new("git"), App::new("curl")],
    );
    let scoop = FakeScoop::new().with_installed(installed);
    let desired = parse_directive(&yaml("buckets: [main]\napps: [git]")).unwrap();

    let report = reconcile(&scoop, &desired).unwrap();

    assert!(report.is_success());
    assert!(scoop.commands().is_empty());
    assert_eq!(scoop.export_calls(), 2);
  }

  #[test]
  fn install_failure_still_installs_other_categories() {
    let scoop = FakeScoop::new().failing_install("extras");
    let desired = parse_directive(&yaml("buckets: [extras]\napps: [git]")).unwrap();

    let report = reconcile(&scoop, &desired).unwrap();

    assert!(!report.is_success());
    assert!(!report.buckets.as_ref().unwrap().is_success());
    assert!(report.apps.as_ref().unwrap().is_success());
    assert!(scoop.installed().apps.contains(&App::new("git")));
  }

  #[test]
  fn unmanaged_run_only_reads_manifest() {
    let scoop = FakeScoop::new();
    let desired = parse_directive(&yaml("{}")).unwrap();

    let report = reconcile(&scoop, &desired).unwrap();

    assert!(report.buckets.is_none());
    assert!(report.apps.is_none());
    assert!(report.is_success());
    assert!(scoop.commands().is_empty());
  }

  #[test]
  #[traced_test]
  fn null_category_is_managed_and_verifies_vacuously() {
    let scoop = FakeScoop::new();
    let desired = parse_directive(&yaml("buckets: ~\napps: [git]")).unwrap();

    let report = reconcile(&scoop, &desired).unwrap();

    let buckets = report.buckets.as_ref().unwrap();
    assert!(buckets.missing.is_empty());
    assert!(buckets.is_success());
    assert!(report.is_success());
    assert_eq!(scoop.commands(), vec!["install git"]);
    assert!(logs_contain("All buckets have been added"));
    assert!(logs_contain("All apps have been added"));
  }

  #[test]
  fn plan_reports_without_installing() {
    let installed = PackageSet::new(Vec::<Bucket>::new(), [App::new("git")]);
    let scoop = FakeScoop::new().with_installed(installed);
    let desired = parse_directive(&yaml("buckets: [extras]\napps: [git, vscode]")).unwrap();

    let diff = plan(&scoop, &desired).unwrap();

    assert_eq!(diff.change_count(), 2);
    assert!(diff.apps.unwrap().contains(&App::new("vscode")));
    assert!(scoop.commands().is_empty());
    assert_eq!(scoop.export_calls(), 1);
  }
}
