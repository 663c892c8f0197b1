//! Configuration module for `exchange-planner`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Curriculum catalog TOML file
    #[serde(default)]
    pub catalog_file: String,
    /// Code-equivalence table TOML file (optional; built-in pairs otherwise)
    #[serde(default)]
    pub equivalences_file: String,
    /// Directory holding persisted plan documents
    #[serde(default)]
    pub plans_dir: String,
    /// Directory for exported plan documents
    #[serde(default)]
    pub exports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override curriculum catalog file
    pub catalog_file: Option<String>,
    /// Override equivalence table file
    pub equivalences_file: Option<String>,
    /// Override plans directory
    pub plans_dir: Option<String>,
    /// Override exports directory
    pub exports_dir: Option<String>,
}

impl Config {
    /// Get the `$EXPLAN` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/explan`
    /// - macOS: `~/Library/Application Support/explan`
    /// - Windows: `%APPDATA%\explan`
    #[must_use]
    pub fn get_explan_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("explan")
    }

    /// Merge missing fields from defaults into this config.
    ///
    /// Used on load so newly added configuration fields pick up their
    /// defaults while existing user settings are preserved.
    ///
    /// # Returns
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.paths.catalog_file.is_empty() && !defaults.paths.catalog_file.is_empty() {
            self.paths
                .catalog_file
                .clone_from(&defaults.paths.catalog_file);
            changed = true;
        }
        if self.paths.equivalences_file.is_empty() && !defaults.paths.equivalences_file.is_empty() {
            self.paths
                .equivalences_file
                .clone_from(&defaults.paths.equivalences_file);
            changed = true;
        }
        if self.paths.plans_dir.is_empty() && !defaults.paths.plans_dir.is_empty() {
            self.paths.plans_dir.clone_from(&defaults.paths.plans_dir);
            changed = true;
        }
        if self.paths.exports_dir.is_empty() && !defaults.paths.exports_dir.is_empty() {
            self.paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration.
    ///
    /// Only non-`None` values replace config values; the persistent file
    /// is untouched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(catalog_file) = &overrides.catalog_file {
            self.paths.catalog_file.clone_from(catalog_file);
        }
        if let Some(equivalences_file) = &overrides.equivalences_file {
            self.paths.equivalences_file.clone_from(equivalences_file);
        }
        if let Some(plans_dir) = &overrides.plans_dir {
            self.paths.plans_dir.clone_from(plans_dir);
        }
        if let Some(exports_dir) = &overrides.exports_dir {
            self.paths.exports_dir.clone_from(exports_dir);
        }
    }

    /// Get the user config file path: `config.toml` for release builds,
    /// `dconfig.toml` for debug builds, inside [`get_explan_dir`].
    ///
    /// [`get_explan_dir`]: Self::get_explan_dir
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_explan_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$EXPLAN` in a string to the actual config directory path
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains("$EXPLAN") {
            let explan_dir = Self::get_explan_dir();
            value.replace("$EXPLAN", explan_dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string, expanding `$EXPLAN` variables
    ///
    /// # Errors
    /// Returns an error if the TOML cannot be parsed or doesn't match the
    /// expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.catalog_file = Self::expand_variables(&config.paths.catalog_file);
        config.paths.equivalences_file = Self::expand_variables(&config.paths.equivalences_file);
        config.paths.plans_dir = Self::expand_variables(&config.paths.plans_dir);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults.
    ///
    /// The defaults differ between debug and release builds.
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. This
    /// should never happen since the defaults are compiled into the binary.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found.
    ///
    /// On first run the config directory and file are created from the
    /// defaults. On upgrade, missing fields are merged in from the defaults
    /// and the updated file saved back. Falls back to defaults on any load
    /// error.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
        } else {
            // First run: create directory and config file from defaults
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the platform-specific config file
    ///
    /// # Errors
    /// Returns an error if serialization fails, the config directory cannot
    /// be created, or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key.
    ///
    /// Supported keys: `level`, `file`, `verbose`, `catalog_file`,
    /// `equivalences_file`, `plans_dir`, `exports_dir`.
    ///
    /// # Returns
    /// The value as a string, or `None` for unrecognized keys
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "catalog_file" | "catalog-file" => Some(self.paths.catalog_file.clone()),
            "equivalences_file" | "equivalences-file" => {
                Some(self.paths.equivalences_file.clone())
            }
            "plans_dir" | "plans-dir" => Some(self.paths.plans_dir.clone()),
            "exports_dir" | "exports-dir" => Some(self.paths.exports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key (in memory; call
    /// [`save()`](Config::save) to persist).
    ///
    /// # Errors
    /// Returns an error for unrecognized keys or unparseable values
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "catalog_file" | "catalog-file" => self.paths.catalog_file = value.to_string(),
            "equivalences_file" | "equivalences-file" => {
                self.paths.equivalences_file = value.to_string();
            }
            "plans_dir" | "plans-dir" => self.paths.plans_dir = value.to_string(),
            "exports_dir" | "exports-dir" => self.paths.exports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default (in memory; call
    /// [`save()`](Config::save) to persist).
    ///
    /// # Errors
    /// Returns an error for unrecognized keys
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "catalog_file" | "catalog-file" => self
                .paths
                .catalog_file
                .clone_from(&defaults.paths.catalog_file),
            "equivalences_file" | "equivalences-file" => self
                .paths
                .equivalences_file
                .clone_from(&defaults.paths.equivalences_file),
            "plans_dir" | "plans-dir" => {
                self.paths.plans_dir.clone_from(&defaults.paths.plans_dir);
            }
            "exports_dir" | "exports-dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file.
    /// The next [`load()`](Config::load) recreates it from defaults.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  catalog_file = \"{}\"", self.paths.catalog_file)?;
        writeln!(
            f,
            "  equivalences_file = \"{}\"",
            self.paths.equivalences_file
        )?;
        writeln!(f, "  plans_dir = \"{}\"", self.paths.plans_dir)?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;

        Ok(())
    }
}
