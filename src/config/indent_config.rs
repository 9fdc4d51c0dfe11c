//! Indentation detection settings
//!
//! Loaded from, lowest priority first:
//! - built-in defaults
//! - `~/.config/indent-detective/config.toml`
//! - `indent-detective.toml` or `.indent-detective.json` in the scanned root
//!
//! # Configuration Format
//!
//! ```toml
//! # indent-detective.toml
//! possible_indentations = ["2", "3", "4", "6", "8"]
//! enable_debug_messages = false
//! ```

use crate::inference::InferenceConfig;
use crate::models::Whitelist;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Project config file names, in lookup order
pub const PROJECT_CONFIG_FILES: &[&str] = &["indent-detective.toml", ".indent-detective.json"];

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A whitelist entry as written in a config file.
///
/// Entries are string-encoded by convention; bare integers are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum WidthEntry {
    Number(i64),
    Text(String),
}

impl WidthEntry {
    fn as_text(&self) -> String {
        match self {
            WidthEntry::Number(n) => n.to_string(),
            WidthEntry::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for WidthEntry {
    fn from(s: &str) -> Self {
        WidthEntry::Text(s.to_string())
    }
}

/// Settings as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IndentConfig {
    /// Widths the detector may decide for
    #[serde(default = "default_indentations", alias = "possibleIndentations_str")]
    pub possible_indentations: Vec<WidthEntry>,

    /// Log per-line votes and the final decision
    #[serde(default, alias = "enableDebugMessages")]
    pub enable_debug_messages: bool,
}

/// Same fields, all optional, for layering one source over another
#[derive(Debug, Default, Deserialize)]
struct PartialIndentConfig {
    #[serde(default, alias = "possibleIndentations_str")]
    possible_indentations: Option<Vec<WidthEntry>>,
    #[serde(default, alias = "enableDebugMessages")]
    enable_debug_messages: Option<bool>,
}

fn default_indentations() -> Vec<WidthEntry> {
    Whitelist::DEFAULT
        .iter()
        .map(|w| WidthEntry::Text(w.to_string()))
        .collect()
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            possible_indentations: default_indentations(),
            enable_debug_messages: false,
        }
    }
}

impl IndentConfig {
    /// Load user config, then the project config in `root` on top of it.
    ///
    /// Unreadable or invalid files are logged and skipped.
    pub fn load(root: &Path) -> Self {
        let mut config = IndentConfig::default();

        if let Some(user_path) = Self::user_config_path().filter(|p| p.exists()) {
            match read_partial(&user_path) {
                Ok(partial) => {
                    debug!("Loaded user config from {}", user_path.display());
                    config.merge(partial);
                }
                Err(e) => warn!("{}", e),
            }
        }

        for name in PROJECT_CONFIG_FILES {
            let path = root.join(name);
            if !path.exists() {
                continue;
            }
            match read_partial(&path) {
                Ok(partial) => {
                    debug!("Loaded project config from {}", path.display());
                    config.merge(partial);
                    break;
                }
                Err(e) => warn!("{}", e),
            }
        }

        config
    }

    /// Load a single config file, TOML or JSON by extension
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let mut config = IndentConfig::default();
        config.merge(read_partial(path)?);
        Ok(config)
    }

    /// Get the user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("indent-detective").join("config.toml"))
    }

    fn merge(&mut self, other: PartialIndentConfig) {
        if let Some(widths) = other.possible_indentations {
            self.possible_indentations = widths;
        }
        if let Some(debug) = other.enable_debug_messages {
            self.enable_debug_messages = debug;
        }
    }

    /// Parsed whitelist; invalid entries are dropped
    pub fn whitelist(&self) -> Whitelist {
        Whitelist::parse_entries(self.possible_indentations.iter().map(WidthEntry::as_text))
    }

    /// Settings for an inference engine
    pub fn inference_config(&self) -> InferenceConfig {
        let whitelist = self.whitelist();
        if whitelist.is_empty() {
            warn!("No valid indentation widths configured; detection will stay undetermined");
        }
        InferenceConfig {
            whitelist,
            debug: self.enable_debug_messages,
        }
    }

    /// Example config file contents
    pub fn example() -> &'static str {
        r#"# indent-detective configuration

# Indentation widths the detector may decide for.
# Changing these also changes the choices offered for manual overrides.
possible_indentations = ["2", "3", "4", "6", "8"]

# Log per-line votes and the final decision (at debug level)
enable_debug_messages = false
"#
    }
}

fn read_partial(path: &Path) -> ConfigResult<PartialIndentConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
