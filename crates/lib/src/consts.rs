/// Directive claimed by the scoop plugin in a host configuration file.
pub const DIRECTIVE: &str = "scoop";

/// Package manager executable invoked when no override is configured.
pub const DEFAULT_PROGRAM: &str = "scoop";

/// Environment variable overriding the package manager executable.
pub const PROGRAM_ENV: &str = "SCOOP_SYNC_PROGRAM";

/// Environment variable selecting a shell to run package manager commands through.
pub const SHELL_ENV: &str = "SCOOP_SYNC_SHELL";

/// Configuration file read when none is given on the command line.
pub const DEFAULT_CONFIG: &str = "install.conf.yaml";
