//! Test utilities for scoop-sync-lib.
//!
//! [`FakeScoop`] is an in-memory package manager that records every command
//! it receives and can be told to fail in the ways the real one does.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use crate::manager::{InstallError, ManifestError, PackageManager};
use crate::types::{App, Bucket, PackageSet};

#[derive(Debug, Default)]
pub struct FakeScoop {
  installed: RefCell<PackageSet>,
  commands: RefCell<Vec<String>>,
  export_calls: Cell<usize>,
  failing_exports: HashSet<usize>,
  failing: HashSet<String>,
  silently_failing: HashSet<String>,
}

impl FakeScoop {
  pub fn new() -> Self {
    Self::default()
  }

  /// Start with the given buckets and apps already installed.
  pub fn with_installed(self, installed: PackageSet) -> Self {
    *self.installed.borrow_mut() = installed;
    self
  }

  /// Make the n-th export call (1-based) exit non-zero.
  pub fn failing_export(mut self, call: usize) -> Self {
    self.failing_exports.insert(call);
    self
  }

  /// Make the bucket add or app install for `name` exit non-zero.
  pub fn failing_install(mut self, name: &str) -> Self {
    self.failing.insert(name.to_string());
    self
  }

  /// Make the command for `name` exit zero without installing anything.
  pub fn silently_failing(mut self, name: &str) -> Self {
    self.silently_failing.insert(name.to_string());
    self
  }

  pub fn commands(&self) -> Vec<String> {
    self.commands.borrow().clone()
  }

  pub fn export_calls(&self) -> usize {
    self.export_calls.get()
  }

  pub fn installed(&self) -> PackageSet {
    self.installed.borrow().clone()
  }

  fn record(&self, args: &[&str]) -> String {
    let command = args.join(" ");
    self.commands.borrow_mut().push(command.clone());
    command
  }

  fn outcome(&self, name: &str, command: String) -> Result<bool, InstallError> {
    if self.failing.contains(name) {
      return Err(InstallError::CommandFailed {
        command: format!("scoop {}", command),
        code: Some(1),
      });
    }
    Ok(!self.silently_failing.contains(name))
  }
}

impl PackageManager for FakeScoop {
  fn export(&self) -> Result<PackageSet, ManifestError> {
    let call = self.export_calls.get() + 1;
    self.export_calls.set(call);

    if self.failing_exports.contains(&call) {
      return Err(ManifestError::CommandFailed {
        command: "scoop export".to_string(),
        code: Some(1),
      });
    }
    Ok(self.installed())
  }

  fn add_bucket(&self, bucket: &Bucket) -> Result<(), InstallError> {
    let command = match &bucket.repo {
      Some(repo) => self.record(&["bucket", "add", &bucket.name, repo]),
      None => self.record(&["bucket", "add", &bucket.name]),
    };

    if self.outcome(&bucket.name, command)? {
      let source = bucket
        .repo
        .clone()
        .unwrap_or_else(|| format!("https://github.com/ScoopInstaller/{}", bucket.name));
      self
        .installed
        .borrow_mut()
        .buckets
        .insert(Bucket::new(bucket.name.as_str(), Some(source)));
    }
    Ok(())
  }

  fn install_app(&self, app: &App) -> Result<(), InstallError> {
    let command = self.record(&["install", &app.name]);

    if self.outcome(&app.name, command)? {
      self.installed.borrow_mut().apps.insert(app.clone());
    }
    Ok(())
  }
}
