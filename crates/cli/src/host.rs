//! Minimal plugin host.
//!
//! Reads a dotbot-style task file and hands each directive to the first
//! registered plugin that claims it. A task file is a YAML list of maps:
//!
//! ```yaml
//! - scoop:
//!     buckets: [extras]
//!     apps: [git]
//! ```

use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors raised by the host or by a plugin refusing a task.
#[derive(Debug, Error)]
pub enum HostError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("task {index} is invalid: {reason}")]
  InvalidTask { index: usize, reason: String },

  #[error("{plugin} cannot handle directive {directive}")]
  UnsupportedDirective { plugin: &'static str, directive: String },
}

/// A single directive with its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
  pub directive: String,
  pub data: Value,
}

/// Something that can carry out directives.
pub trait Plugin {
  /// Returns true if this plugin handles `directive`.
  fn can_handle(&self, directive: &str) -> bool;

  /// Run a directive. `Ok(false)` means the plugin ran and did not succeed.
  fn handle(&self, directive: &str, data: &Value) -> Result<bool, HostError>;
}

/// Read and flatten a task file into directives, in file order.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, HostError> {
  let content = std::fs::read_to_string(path).map_err(|source| HostError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  parse_tasks(path, &content)
}

fn parse_tasks(path: &Path, content: &str) -> Result<Vec<Task>, HostError> {
  if content.trim().is_empty() {
    return Ok(Vec::new());
  }

  let root: Value = serde_yaml::from_str(content).map_err(|source| HostError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  let entries = match root {
    Value::Null => return Ok(Vec::new()),
    Value::Sequence(entries) => entries,
    _ => {
      return Err(HostError::InvalidTask {
        index: 0,
        reason: "the task file must be a list".to_string(),
      });
    }
  };

  let mut tasks = Vec::new();
  for (index, entry) in entries.into_iter().enumerate() {
    let Value::Mapping(map) = entry else {
      return Err(HostError::InvalidTask {
        index,
        reason: "expected a map of directives".to_string(),
      });
    };
    for (key, data) in map {
      let Value::String(directive) = key else {
        return Err(HostError::InvalidTask {
          index,
          reason: "directive names must be strings".to_string(),
        });
      };
      tasks.push(Task { directive, data });
    }
  }
  Ok(tasks)
}

/// Outcome of running a task list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
  pub total: usize,
  pub failed: usize,
}

impl DispatchSummary {
  pub fn is_success(&self) -> bool {
    self.failed == 0
  }
}

/// Runs tasks against a fixed set of plugins, one at a time.
#[derive(Default)]
pub struct Dispatcher {
  plugins: Vec<Box<dyn Plugin>>,
}

impl Dispatcher {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(mut self, plugin: impl Plugin + 'static) -> Self {
    self.plugins.push(Box::new(plugin));
    self
  }

  /// Run every task, counting the ones that were unhandled or failed.
  pub fn run(&self, tasks: &[Task]) -> DispatchSummary {
    let mut failed = 0;

    for task in tasks {
      let Some(plugin) = self.plugins.iter().find(|p| p.can_handle(&task.directive)) else {
        error!("Action {} not handled", task.directive);
        failed += 1;
        continue;
      };

      debug!(directive = %task.directive, "dispatching task");
      match plugin.handle(&task.directive, &task.data) {
        Ok(true) => {}
        Ok(false) => failed += 1,
        Err(err) => {
          error!("An error was encountered while executing action {}: {}", task.directive, err);
          failed += 1;
        }
      }
    }

    let summary = DispatchSummary {
      total: tasks.len(),
      failed,
    };
    if summary.is_success() {
      info!("All tasks executed successfully");
    } else {
      error!("Some tasks were not executed successfully");
    }
    summary
  }
}
