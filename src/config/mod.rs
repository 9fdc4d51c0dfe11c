//! Configuration module for indent-detective
//!
//! This module handles:
//! - The whitelist of admissible indentation widths
//! - The debug-message flag
//! - User- and project-level config files

mod indent_config;

pub use indent_config::{
    ConfigError, ConfigResult, IndentConfig, WidthEntry, PROJECT_CONFIG_FILES,
};
