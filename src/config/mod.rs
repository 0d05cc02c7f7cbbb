//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    Config, ConfigError, load_config, load_config_or_default, parse_config,
    DEFAULT_CONFIG_PATH, ZENROWS_API_KEY_VAR,
};
