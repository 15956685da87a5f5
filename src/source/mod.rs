//! Config file snapshots and where they come from.
//!
//! A [`SectionSource`] turns the path of a candidate config file into a
//! [`ConfigFile`]: its `root` marker plus its sections in declaration order.
//!
//! - [`FileSource`] reads and parses files from disk
//! - [`CachedSource`] remembers snapshots produced by another source

mod cached;
mod ini;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use cached::CachedSource;

use crate::error::{SourceError, SyntaxError};

/// One `[selector]` block of a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub selector: String,
    /// Lower-cased property name to literal value.
    pub properties: BTreeMap<String, String>,
}

impl Section {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property; names are lower-cased.
    pub fn with_property(mut self, name: &str, value: impl Into<String>) -> Self {
        self.properties.insert(name.to_lowercase(), value.into());
        self
    }
}

/// A parsed config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    /// `root = true` was declared: no farther config file applies.
    pub root: bool,
    /// Where the file was read from; empty when parsed from a string.
    pub path: PathBuf,
    pub sections: Vec<Section>,
}

impl ConfigFile {
    /// Parse config file text.
    pub fn parse_str(content: &str) -> Result<Self, SyntaxError> {
        ini::parse(content)
    }
}

/// Produces config file snapshots for the resolver.
pub trait SectionSource: Send + Sync {
    /// Parse the config file at `path`.
    ///
    /// A missing file must be reported as [`SourceError::NotFound`].
    fn parse(&self, path: &Path) -> Result<Arc<ConfigFile>, SourceError>;
}

impl<S: SectionSource + ?Sized> SectionSource for Arc<S> {
    fn parse(&self, path: &Path) -> Result<Arc<ConfigFile>, SourceError> {
        (**self).parse(path)
    }
}

/// Reads config files from the filesystem on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSource;

impl SectionSource for FileSource {
    fn parse(&self, path: &Path) -> Result<Arc<ConfigFile>, SourceError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(SourceError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut file = ConfigFile::parse_str(&content).map_err(|source| SourceError::Syntax {
            path: path.to_path_buf(),
            source,
        })?;
        file.path = path.to_path_buf();

        tracing::debug!(
            "parsed {} ({} sections, root = {})",
            path.display(),
            file.sections.len(),
            file.root
        );
        Ok(Arc::new(file))
    }
}
