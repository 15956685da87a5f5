//! Resolver configuration.
//!
//! This module provides:
//! - The [`Config`] schema (config file name, version, caching)
//! - Loading it from a TOML file
//! - Validating the requested EditorConfig version

mod file;
mod toml_schema;
mod version;

pub use file::{load_config, ConfigError};
pub use toml_schema::Config;
pub use version::parse_version;
