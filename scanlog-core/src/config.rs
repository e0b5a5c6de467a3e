// TOML configuration for scanlog (~/.scanlog/config.toml)

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shell: ShellSection,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub loader: LoaderSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShellSection {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_true")]
    pub history: bool,
    #[serde(default = "default_true")]
    pub show_help_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplaySection {
    /// Longest endpoint path list `summary` shows before truncating.
    #[serde(default = "default_max_endpoint_width")]
    pub max_endpoint_width: usize,
    #[serde(default = "default_truncated_endpoint_width")]
    pub truncated_endpoint_width: usize,
    #[serde(default = "default_max_column_width")]
    pub max_column_width: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoaderSection {
    #[serde(default = "default_max_entry_bytes")]
    pub max_entry_bytes: u64,
}

fn default_prompt() -> String {
    "(log-analyzer) ".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_endpoint_width() -> usize {
    50
}

fn default_truncated_endpoint_width() -> usize {
    47
}

fn default_max_column_width() -> usize {
    60
}

fn default_max_entry_bytes() -> u64 {
    64 * 1024 * 1024
}

impl Default for ShellSection {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            history: default_true(),
            show_help_on_start: default_true(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            max_endpoint_width: default_max_endpoint_width(),
            truncated_endpoint_width: default_truncated_endpoint_width(),
            max_column_width: default_max_column_width(),
        }
    }
}

impl Default for LoaderSection {
    fn default() -> Self {
        Self {
            max_entry_bytes: default_max_entry_bytes(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(crate::paths::get_config_path);

        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
