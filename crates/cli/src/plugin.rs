//! The `scoop` directive, wired into the host.

use serde_yaml::Value;

use scoop_sync_lib::consts::DIRECTIVE;
use scoop_sync_lib::manager::PackageManager;
use scoop_sync_lib::reconcile::reconcile_packages;

use crate::host::{HostError, Plugin};

/// Claims the `scoop` directive and reconciles its payload.
pub struct ScoopPlugin<M> {
  manager: M,
}

impl<M: PackageManager> ScoopPlugin<M> {
  pub fn new(manager: M) -> Self {
    Self { manager }
  }
}

impl<M: PackageManager> Plugin for ScoopPlugin<M> {
  fn can_handle(&self, directive: &str) -> bool {
    directive == DIRECTIVE
  }

  fn handle(&self, directive: &str, data: &Value) -> Result<bool, HostError> {
    if !self.can_handle(directive) {
      return Err(HostError::UnsupportedDirective {
        plugin: DIRECTIVE,
        directive: directive.to_string(),
      });
    }
    Ok(reconcile_packages(&self.manager, data))
  }
}
