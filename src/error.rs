//! Error types for resolution.
//!
//! Missing config files are not errors at all (the resolver skips them),
//! unreadable or malformed ones abort resolution, and property values that
//! fail to parse only produce a [`FieldWarning`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error returned by a [`SectionSource`](crate::source::SectionSource).
#[derive(Debug, Error)]
pub enum SourceError {
    /// No config file exists at the path.
    #[error("{} does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read config file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but is not a valid config file.
    #[error("invalid config file {}", .path.display())]
    Syntax {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }

    /// Path of the config file the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            SourceError::NotFound { path }
            | SourceError::Io { path, .. }
            | SourceError::Syntax { path, .. } => path,
        }
    }
}

/// A line of a config file that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// A property value that could not be converted to its typed form.
///
/// The property resolves as if it had not been declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{property}={value} is not an acceptable value: {reason}")]
pub struct FieldWarning {
    pub property: String,
    pub value: String,
    pub reason: String,
}

impl FieldWarning {
    pub(crate) fn new(property: &str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            property: property.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Every [`FieldWarning`] collected while resolving one file, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<FieldWarning>);

impl Warnings {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldWarning> {
        self.0.iter()
    }

    pub fn push(&mut self, warning: FieldWarning) {
        self.0.push(warning);
    }

    pub fn into_vec(self) -> Vec<FieldWarning> {
        self.0
    }
}

impl Extend<FieldWarning> for Warnings {
    fn extend<T: IntoIterator<Item = FieldWarning>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Warnings {
    type Item = FieldWarning;
    type IntoIter = std::vec::IntoIter<FieldWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a FieldWarning;
    type IntoIter = std::slice::Iter<'a, FieldWarning>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Warnings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, warning) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{warning}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Warnings {}

/// Error returned by the [`Resolver`](crate::Resolver).
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot get absolute path for {}", .path.display())]
    AbsolutePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("version {version} error: invalid semantic version")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("cannot parse the config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    /// Field warnings promoted to an error by
    /// [`Resolution::into_strict`](crate::Resolution::into_strict).
    #[error(transparent)]
    Warnings(#[from] Warnings),
}
