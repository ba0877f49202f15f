//! Post-install verification.
//!
//! Scoop does not report partial failures through its exit code (a bucket add
//! can fail midway and still exit zero), so success is re-derived from a fresh
//! export instead of trusting the installer.

use std::collections::HashSet;
use std::hash::Hash;

/// Returns true if every desired item is installed. Extra installed items are fine.
pub fn verify<T: Eq + Hash>(desired: &HashSet<T>, installed: &HashSet<T>) -> bool {
  desired.is_subset(installed)
}

/// Desired items still absent after installation.
pub fn unverified<'a, T: Eq + Hash>(desired: &'a HashSet<T>, installed: &HashSet<T>) -> Vec<&'a T> {
  desired.iter().filter(|item| !installed.contains(item)).collect()
}
