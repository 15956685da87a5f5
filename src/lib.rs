//! Per-file EditorConfig resolution.
//!
//! ```no_run
//! use editorconfig_resolver::Resolver;
//!
//! let resolution = Resolver::new().resolve("src/main.rs")?;
//! for (name, value) in resolution.definition.properties() {
//!     println!("{name}={value}");
//! }
//! # Ok::<(), editorconfig_resolver::Error>(())
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod pattern;
mod resolve;
pub mod selector;
pub mod source;

pub use config::{load_config, Config, ConfigError};
pub use definition::{Definition, Setting};
pub use error::{Error, FieldWarning, SourceError, SyntaxError, Warnings};
pub use pattern::Pattern;
pub use resolve::{resolve, resolve_with_name, Resolution, Resolver};
pub use selector::{CachedMatcher, SelectorMatcher, UncachedMatcher};
pub use source::{CachedSource, ConfigFile, FileSource, Section, SectionSource};

/// Name of the config file looked up in every ancestor directory.
pub const DEFAULT_CONFIG_NAME: &str = ".editorconfig";
