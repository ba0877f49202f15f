//! scoop-sync-lib: Core types and logic for scoop-sync
//!
//! This crate reconciles a declared set of Scoop buckets and apps against what
//! the package manager reports as installed:
//! - `types`: `Bucket` and `App` identities (name-only equality)
//! - `config`: normalizes a `scoop` directive payload into a `DesiredState`
//! - `manager`: the `PackageManager` capability and its Scoop CLI implementation
//! - `diff`, `install`, `verify`: the steps of a reconciliation run
//! - `reconcile`: sequences the steps and reports overall success

pub mod config;
pub mod consts;
pub mod diff;
pub mod install;
pub mod manager;
pub mod reconcile;
pub mod types;
pub mod verify;

#[cfg(test)]
pub(crate) mod util;
