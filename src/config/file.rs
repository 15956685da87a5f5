//! Loading resolver configuration from TOML

use std::io;
use std::path::Path;

use thiserror::Error;

use super::toml_schema::Config;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the file
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    /// TOML parsing error
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Parse configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Load and parse resolver configuration from the given path.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs_err::read_to_string(path)?;
    Config::from_toml_str(&content)
}
