//! Configuration loading and management.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Global settings.
    #[serde(default)]
    pub settings: Settings,
}

/// Global settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Directory holding one entry per USB device.
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,

    /// usbfs device nodes, opened for the active configuration query.
    #[serde(default = "default_devfs_root")]
    pub devfs_root: PathBuf,

    /// Open devices to read their active configuration value.
    #[serde(default = "default_query_active_configuration")]
    pub query_active_configuration: bool,

    /// Log level when RUST_LOG is not set: "error", "warn", "info", "debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            devfs_root: default_devfs_root(),
            query_active_configuration: default_query_active_configuration(),
            log_level: default_log_level(),
        }
    }
}

fn default_sysfs_root() -> PathBuf {
    PathBuf::from("/sys/bus/usb/devices")
}

fn default_devfs_root() -> PathBuf {
    PathBuf::from("/dev/bus/usb")
}

fn default_query_active_configuration() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from default locations.
    /// Search order:
    /// 1. ./usbdevlist.toml
    /// 2. ~/.config/usbdevlist/config.toml
    /// 3. /etc/usbdevlist.toml
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::config_paths().into_iter().flatten() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // No config file found - use defaults
        Ok(Config::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Get list of possible config paths.
    fn config_paths() -> Vec<Option<PathBuf>> {
        vec![
            std::env::current_dir()
                .ok()
                .map(|p| p.join("usbdevlist.toml")),
            dirs::config_dir().map(|p| p.join("usbdevlist").join("config.toml")),
            Some(PathBuf::from("/etc/usbdevlist.toml")),
        ]
    }
}

/// Generate example configuration content.
pub fn example_config() -> &'static str {
    r#"# usbdevlist configuration file
# Place in ./usbdevlist.toml, ~/.config/usbdevlist/config.toml, or /etc/usbdevlist.toml

[settings]
# Directory with one entry per USB device
sysfs_root = "/sys/bus/usb/devices"

# usbfs device nodes, opened read-write to query the active configuration
devfs_root = "/dev/bus/usb"

# Set to false to never open devices (the active configuration line is skipped)
query_active_configuration = true

# Diagnostics on stderr when RUST_LOG is not set
log_level = "warn"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(
            config.settings.sysfs_root,
            PathBuf::from("/sys/bus/usb/devices")
        );
        assert_eq!(config.settings.devfs_root, PathBuf::from("/dev/bus/usb"));
        assert!(config.settings.query_active_configuration);
        assert_eq!(config.settings.log_level, "warn");
    }

    #[test]
    fn test_partial_settings() {
        let config = Config::from_toml(
            r#"
[settings]
sysfs_root = "/tmp/sys"
query_active_configuration = false
"#,
        )
        .unwrap();
        assert_eq!(config.settings.sysfs_root, PathBuf::from("/tmp/sys"));
        assert_eq!(config.settings.devfs_root, PathBuf::from("/dev/bus/usb"));
        assert!(!config.settings.query_active_configuration);
    }

    #[test]
    fn test_example_config_parses() {
        let config = Config::from_toml(example_config()).unwrap();
        assert!(config.settings.query_active_configuration);
    }

    #[test]
    fn test_unknown_setting_rejected() {
        assert!(matches!(
            Config::from_toml("[settings]\nrefresh_ms = 10\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("usbdevlist.toml");
        std::fs::write(&path, "[settings]\nlog_level = \"debug\"\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.settings.log_level, "debug");

        assert!(matches!(
            Config::load_from_path(&dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
