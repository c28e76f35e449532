//! Configuration loading and management.

mod loader;

pub use loader::{Config, ConfigError, Settings, example_config};
