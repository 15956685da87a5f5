//! TOML schema for resolver configuration

use serde::{Deserialize, Serialize};

use crate::DEFAULT_CONFIG_NAME;

/// How a [`Resolver`](crate::Resolver) looks up and interprets config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File name searched for in every ancestor directory.
    pub name: String,

    /// EditorConfig version to resolve for (e.g. `"0.12.0"`).
    pub version: Option<String>,

    /// Keep parsed config files and compiled selectors between resolutions.
    pub cache: bool,

    /// Most config files, and most compiled selectors, each cache keeps.
    /// Absent or `0` means unbounded.
    pub cache_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: DEFAULT_CONFIG_NAME.to_string(),
            version: None,
            cache: false,
            cache_capacity: None,
        }
    }
}
