//! Library configuration module.
//!
//! Handles loading and validating an optional `config.toml` at the library
//! root. Every option has a default; the file only needs to exist when a
//! library deviates from stock behavior.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [scan]
//! archive_extensions = ["cbz"]  # File extensions treated as comic archives
//! follow_symlinks = false       # Whether the scanner descends into symlinks
//! ```
//!
//! The library root itself is never configured here — it is an explicit
//! argument on every command, so tests and tooling can point the scanner
//! at any directory without touching global state.
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file within the library root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Library configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShelfConfig {
    /// Scanner settings.
    pub scan: ScanSection,
}

/// Settings controlling which files the scanner treats as archives and how
/// it walks the tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSection {
    /// Extensions (without the leading dot) treated as comic archives,
    /// matched case-insensitively.
    pub archive_extensions: Vec<String>,
    /// Whether the walk follows symbolic links.
    pub follow_symlinks: bool,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            archive_extensions: vec!["cbz".to_string()],
            follow_symlinks: false,
        }
    }
}

impl ShelfConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.archive_extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.archive_extensions must not be empty".into(),
            ));
        }
        for ext in &self.scan.archive_extensions {
            if ext.is_empty() {
                return Err(ConfigError::Validation(
                    "scan.archive_extensions entries must not be empty".into(),
                ));
            }
            if ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "scan.archive_extensions entries are written without the leading dot (got '{ext}')"
                )));
            }
        }
        Ok(())
    }
}

/// Load `config.toml` from the library root, falling back to defaults when
/// the file doesn't exist. The result is always validated.
pub fn load_config(root: &Path) -> Result<ShelfConfig, ConfigError> {
    let path = root.join(CONFIG_FILENAME);
    let config = if path.exists() {
        let content = fs::read_to_string(&path)?;
        toml::from_str(&content)?
    } else {
        ShelfConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A stock `config.toml` with every option documented, printed by the
/// `gen-config` subcommand.
pub fn stock_config_toml() -> &'static str {
    r#"# comic-shelf configuration
# Place this file in the library root. All options are optional;
# the values below are the defaults.

[scan]
# File extensions (without the leading dot) treated as comic archives.
# Matched case-insensitively, so "cbz" also picks up "CBZ".
archive_extensions = ["cbz"]

# Whether the scanner follows symbolic links while walking the library.
follow_symlinks = false
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scan.archive_extensions, vec!["cbz"]);
        assert!(!config.scan.follow_symlinks);
    }

    #[test]
    fn sparse_override() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[scan]\narchive_extensions = [\"cbz\", \"zip\"]\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.scan.archive_extensions, vec!["cbz", "zip"]);
        // Untouched option keeps its default.
        assert!(!config.scan.follow_symlinks);
    }

    #[test]
    fn unknown_keys_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[scan]\narchive_extension = [\"cbz\"]\n",
        )
        .unwrap();

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn leading_dot_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[scan]\narchive_extensions = [\".cbz\"]\n",
        )
        .unwrap();

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_extension_list_rejected() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[scan]\narchive_extensions = []\n",
        )
        .unwrap();

        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed: ShelfConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(
            parsed.scan.archive_extensions,
            ShelfConfig::default().scan.archive_extensions
        );
    }
}
