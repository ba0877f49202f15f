//! Scoop command-line implementation of [`PackageManager`].
//!
//! Each operation spawns one blocking process. Success is decided by the exit
//! status alone; output is captured and only surfaced in debug logs.

use std::process::{Command, Output};

use tracing::{debug, info};

use super::{InstallError, ManifestError, PackageManager, parse_export};
use crate::consts::{DEFAULT_PROGRAM, PROGRAM_ENV, SHELL_ENV};
use crate::types::{App, Bucket, PackageSet};

/// Where to find the package manager and how to launch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
  /// Executable (or shim) name or path.
  pub program: String,
  /// Shell to run commands through. `None` picks the platform default.
  pub shell: Option<String>,
}

impl Default for ManagerConfig {
  fn default() -> Self {
    Self {
      program: DEFAULT_PROGRAM.to_string(),
      shell: None,
    }
  }
}

impl ManagerConfig {
  /// Build a config from `SCOOP_SYNC_PROGRAM` and `SCOOP_SYNC_SHELL`.
  ///
  /// Unset or empty variables fall back to the defaults.
  pub fn from_env() -> Self {
    let non_empty = |var: &str| std::env::var(var).ok().filter(|v| !v.trim().is_empty());
    Self {
      program: non_empty(PROGRAM_ENV).unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
      shell: non_empty(SHELL_ENV),
    }
  }
}

/// Drives the `scoop` executable.
#[derive(Debug, Clone, Default)]
pub struct ScoopCli {
  config: ManagerConfig,
}

impl ScoopCli {
  pub fn new(config: ManagerConfig) -> Self {
    Self { config }
  }

  /// The shell family that will parse the command line, if any.
  fn shell_kind(&self) -> ShellKind {
    match &self.config.shell {
      Some(shell) => ShellKind::detect(shell),
      None if cfg!(windows) => ShellKind::Cmd,
      None => ShellKind::Posix,
    }
  }

  /// Render the command line that `args` turns into, for logs and errors.
  fn describe(&self, args: &[&str]) -> String {
    self.shell_kind().command_line(&self.config.program, args)
  }

  fn command(&self, args: &[&str]) -> Command {
    if let Some(shell) = &self.config.shell {
      return shell_command(shell, &self.describe(args));
    }

    // Scoop installs `.cmd`/`.ps1` shims that only a shell can resolve.
    #[cfg(windows)]
    {
      shell_command("cmd.exe", &self.describe(args))
    }

    #[cfg(not(windows))]
    {
      let mut command = Command::new(&self.config.program);
      command.args(args);
      command
    }
  }

  fn run(&self, args: &[&str]) -> std::io::Result<Output> {
    debug!(command = %self.describe(args), "spawning process");
    let output = self.command(args).output()?;

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
      debug!(stderr = %stderr.trim(), "command stderr");
    }
    if !output.status.success() {
      let stdout = String::from_utf8_lossy(&output.stdout);
      if !stdout.trim().is_empty() {
        debug!(stdout = %stdout.trim(), "command stdout");
      }
    }

    Ok(output)
  }

  fn run_install(&self, args: &[&str]) -> Result<(), InstallError> {
    let command = self.describe(args);
    let output = self.run(args).map_err(|source| InstallError::Spawn {
      command: command.clone(),
      source,
    })?;

    if !output.status.success() {
      return Err(InstallError::CommandFailed {
        command,
        code: output.status.code(),
      });
    }
    Ok(())
  }
}

impl PackageManager for ScoopCli {
  fn export(&self) -> Result<PackageSet, ManifestError> {
    let args = ["export"];
    let command = self.describe(&args);
    let output = self.run(&args).map_err(|source| ManifestError::Spawn {
      command: command.clone(),
      source,
    })?;

    if !output.status.success() {
      return Err(ManifestError::CommandFailed {
        command,
        code: output.status.code(),
      });
    }

    parse_export(&String::from_utf8_lossy(&output.stdout))
  }

  fn add_bucket(&self, bucket: &Bucket) -> Result<(), InstallError> {
    info!(bucket = %bucket, "adding bucket");
    match &bucket.repo {
      Some(repo) => self.run_install(&["bucket", "add", &bucket.name, repo]),
      None => self.run_install(&["bucket", "add", &bucket.name]),
    }
  }

  fn install_app(&self, app: &App) -> Result<(), InstallError> {
    info!(app = %app, "installing app");
    self.run_install(&["install", &app.name])
  }
}

/// Shell families that re-parse a command line, each with its own quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellKind {
  Posix,
  PowerShell,
  Cmd,
}

impl ShellKind {
  fn detect(shell: &str) -> Self {
    let shell = shell.to_ascii_lowercase();
    if shell.contains("powershell") || shell.contains("pwsh") {
      ShellKind::PowerShell
    } else if shell.contains("cmd") {
      ShellKind::Cmd
    } else {
      ShellKind::Posix
    }
  }

  fn flags(self) -> Vec<String> {
    match self {
      ShellKind::PowerShell => vec!["-NoProfile".to_string(), "-Command".to_string()],
      ShellKind::Cmd => vec!["/S".to_string(), "/C".to_string()],
      ShellKind::Posix => vec!["-c".to_string()],
    }
  }

  /// Join a program and its arguments into one line this shell reads back
  /// as exactly those words.
  fn command_line(self, program: &str, args: &[&str]) -> String {
    let words: Vec<String> = std::iter::once(program)
      .chain(args.iter().copied())
      .map(|word| self.quote(word))
      .collect();
    let line = words.join(" ");
    match self {
      // A quoted program name is only a string to PowerShell until invoked.
      ShellKind::PowerShell => format!("& {}", line),
      _ => line,
    }
  }

  /// Characters this shell gives no meaning to outside quotes.
  fn is_plain(self, c: char) -> bool {
    c.is_ascii_alphanumeric()
      || matches!(c, '-' | '_' | '.' | '/' | ':' | '=' | '@' | '+' | ',')
      || (c == '\\' && self != ShellKind::Posix)
  }

  fn quote(self, word: &str) -> String {
    if !word.is_empty() && word.chars().all(|c| self.is_plain(c)) {
      return word.to_string();
    }
    match self {
      ShellKind::Posix => format!("'{}'", word.replace('\'', r"'\''")),
      ShellKind::PowerShell => {
        let mut quoted = String::with_capacity(word.len() + 2);
        quoted.push('\'');
        for c in word.chars() {
          if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201a}' | '\u{201b}') {
            quoted.push(c);
          }
          quoted.push(c);
        }
        quoted.push('\'');
        quoted
      }
      ShellKind::Cmd => {
        // Inside double quotes cmd takes `&`, `|`, `<`, `>` literally.
        if word.is_empty() || word.contains(char::is_whitespace) {
          return format!("\"{}\"", word.replace('"', "\"\""));
        }
        let mut escaped = String::with_capacity(word.len() * 2);
        for c in word.chars() {
          if matches!(c, '^' | '&' | '|' | '<' | '>' | '(' | ')' | '%' | '!' | '"') {
            escaped.push('^');
          }
          escaped.push(c);
        }
        escaped
      }
    }
  }
}

/// Get the shell command and arguments for an explicitly configured shell.
fn get_shell(shell: &str) -> (String, Vec<String>) {
  (shell.to_string(), ShellKind::detect(shell).flags())
}

/// Run an already quoted command line through `shell`.
fn shell_command(shell: &str, line: &str) -> Command {
  let (shell_cmd, shell_args) = get_shell(shell);
  let mut command = Command::new(shell_cmd);
  command.args(&shell_args);
  push_line(&mut command, ShellKind::detect(shell), line);
  command
}

/// cmd.exe does not follow the usual argument quoting rules, so the line is
/// handed over verbatim and wrapped in the outer quotes `/S` strips.
#[cfg(windows)]
fn push_line(command: &mut Command, kind: ShellKind, line: &str) {
  use std::os::windows::process::CommandExt;

  match kind {
    ShellKind::Cmd => {
      command.raw_arg(format!("\"{}\"", line));
    }
    _ => {
      command.arg(line);
    }
  }
}

#[cfg(not(windows))]
fn push_line(command: &mut Command, _kind: ShellKind, line: &str) {
  command.arg(line);
}
