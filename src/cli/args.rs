//! CLI argument definitions for `explan`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use exchange_planner::config::ConfigOverrides;
use exchange_planner::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to
/// lowercase strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog_file`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Resolve a curriculum template from the configured catalog.
    ///
    /// Falls back from the exact (track, specialization) entry to the track
    /// default and then the program default. An empty result is the
    /// "add your own subjects" state, not an error.
    Resolve {
        /// Study program (e.g., "Datateknologi")
        #[arg(long, value_name = "PROGRAM")]
        program: String,

        /// Technical track (omit for "no track")
        #[arg(long, value_name = "TRACK")]
        track: Option<String>,

        /// Specialization (omit for "no specialization")
        #[arg(long, value_name = "SPECIALIZATION")]
        specialization: Option<String>,

        /// Study year (1-5)
        #[arg(long, value_name = "YEAR")]
        year: u8,

        /// Term: host/autumn or var/spring
        #[arg(long, value_name = "TERM")]
        term: String,
    },
    /// Show a saved plan's coverage and credit status.
    ///
    /// Reconciles the saved plan against the current catalog template and
    /// prints completeness, totals, ECTS shortfall, and recovered subjects.
    Status {
        /// Path to a stored plan JSON document
        #[arg(value_name = "FILE")]
        plan_file: PathBuf,
    },
    /// Export a saved plan as a document.
    Export {
        /// Path to a stored plan JSON document
        #[arg(value_name = "FILE")]
        plan_file: PathBuf,

        /// Output file path (optional; defaults to the exports directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document format: markdown (md) or text (txt)
        #[arg(short, long, value_name = "FORMAT", default_value = "markdown")]
        format: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "explan",
    about = "Exchange plan builder command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the curriculum catalog file
    #[arg(long = "catalog-file", value_name = "PATH")]
    pub catalog_file: Option<PathBuf>,

    /// Override the code-equivalence table file
    #[arg(long = "equivalences-file", value_name = "PATH")]
    pub equivalences_file: Option<PathBuf>,

    /// Override the plans directory
    #[arg(long = "plans-dir", value_name = "DIR")]
    pub plans_dir: Option<PathBuf>,

    /// Override the exports directory
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides.
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None`
    /// means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            catalog_file: self
                .catalog_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            equivalences_file: self
                .equivalences_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            plans_dir: self
                .plans_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            exports_dir: self
                .exports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            catalog_file: None,
            equivalences_file: None,
            plans_dir: None,
            exports_dir: None,
            command: Command::Config { subcommand: None },
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = bare_cli().to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.catalog_file.is_none());
        assert!(overrides.equivalences_file.is_none());
        assert!(overrides.plans_dir.is_none());
        assert!(overrides.exports_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut cli = bare_cli();
        cli.config_level = Some(LogLevelArg::Debug);
        cli.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        cli.config_verbose = Some(true);
        cli.catalog_file = Some(PathBuf::from("/data/catalog.toml"));
        cli.plans_dir = Some(PathBuf::from("/data/plans"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.catalog_file, Some("/data/catalog.toml".to_string()));
        assert_eq!(overrides.plans_dir, Some("/data/plans".to_string()));
    }
}
