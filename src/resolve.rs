//! Resolving the definition of a file from its ancestors' config files.
//!
//! Starting in the file's directory, every ancestor up to the filesystem root
//! is asked for a config file. Within one file the last matching section
//! wins; across files the nearest one wins. The walk ends after a file
//! declaring `root = true`.

use std::io;
use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::config::{parse_version, Config};
use crate::definition::Definition;
use crate::error::{Error, FieldWarning, Warnings};
use crate::selector::{CachedMatcher, SelectorMatcher, UncachedMatcher};
use crate::source::{CachedSource, ConfigFile, FileSource, SectionSource};
use crate::DEFAULT_CONFIG_NAME;

/// The outcome of resolving one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub definition: Definition,
    /// Property values that could not be parsed; their fields stay absent.
    pub warnings: Warnings,
}

impl Resolution {
    /// The definition, or the collected warnings as an error.
    pub fn into_strict(self) -> Result<Definition, Error> {
        if self.warnings.is_empty() {
            Ok(self.definition)
        } else {
            Err(Error::Warnings(self.warnings))
        }
    }
}

/// Walks ancestor directories and merges their config files.
///
/// Collaborators are shared: clone the resolver, or pass the same cached
/// source or matcher to several resolvers, to reuse one cache.
#[derive(Clone)]
pub struct Resolver {
    name: String,
    version: Option<String>,
    source: Arc<dyn SectionSource>,
    matcher: Arc<dyn SelectorMatcher>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("name", &self.name)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Resolver for `.editorconfig` files read from disk, without caching.
    pub fn new() -> Self {
        Self {
            name: DEFAULT_CONFIG_NAME.to_string(),
            version: None,
            source: Arc::new(FileSource),
            matcher: Arc::new(UncachedMatcher),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let resolver = Self::new().with_name(&config.name);
        let resolver = match &config.version {
            Some(version) => resolver.with_version(version),
            None => resolver,
        };

        if !config.cache {
            return resolver;
        }

        match config.cache_capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => resolver
                .with_source(Arc::new(CachedSource::bounded(FileSource, capacity)))
                .with_matcher(Arc::new(CachedMatcher::bounded(capacity))),
            None => resolver
                .with_source(Arc::new(CachedSource::new(FileSource)))
                .with_matcher(Arc::new(CachedMatcher::new())),
        }
    }

    /// Look for config files with this name instead of `.editorconfig`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resolve for an EditorConfig version; validated on each resolution.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_source(mut self, source: Arc<dyn SectionSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn SelectorMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the definition of the file at `path`.
    ///
    /// The file itself does not need to exist. Missing config files are
    /// skipped; a config file that cannot be read or parsed aborts the walk.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<Resolution, Error> {
        let path = path.as_ref();
        let target = absolute_path(path).map_err(|source| Error::AbsolutePath {
            path: path.to_path_buf(),
            source,
        })?;
        let version = self.version.as_deref().map(parse_version).transpose()?;

        let mut definition = Definition::default();
        let mut warnings = Warnings::default();

        for dir in target.ancestors().skip(1) {
            let config_path = dir.join(&self.name);
            let file = match self.source.parse(&config_path) {
                Ok(file) => file,
                Err(err) if err.is_not_found() => {
                    tracing::debug!("no config file at {}", config_path.display());
                    continue;
                }
                Err(source) => {
                    return Err(Error::Parse {
                        path: config_path,
                        source,
                    })
                }
            };

            let relative = relative_path(&target, dir);
            let (found, found_warnings) = file.definition_for(&relative, self.matcher.as_ref());
            for warning in &found_warnings {
                tracing::warn!("{}: {warning}", config_path.display());
            }
            warnings.extend(found_warnings);
            definition.merge(&found);

            if file.root {
                tracing::debug!("stopping at root config file {}", config_path.display());
                break;
            }
        }

        definition.version = version;
        Ok(Resolution {
            definition,
            warnings,
        })
    }
}

impl ConfigFile {
    /// Merge the sections matching `path`, relative to this file's directory.
    ///
    /// Later sections take precedence over earlier ones.
    pub fn definition_for(
        &self,
        path: &str,
        matcher: &dyn SelectorMatcher,
    ) -> (Definition, Vec<FieldWarning>) {
        let mut definition = Definition::default();
        let mut warnings = Vec::new();

        for section in self.sections.iter().rev() {
            if !matcher.matches(&section.selector, path) {
                continue;
            }
            tracing::trace!("[{}] matches {path}", section.selector);

            let (found, found_warnings) = Definition::from_properties(&section.properties);
            warnings.extend(found_warnings);
            definition.merge(&found);
        }

        (definition, warnings)
    }
}

/// Resolve `path` against `.editorconfig` files.
pub fn resolve(path: impl AsRef<Path>) -> Result<Resolution, Error> {
    Resolver::new().resolve(path)
}

/// Resolve `path` against config files called `name`.
pub fn resolve_with_name(path: impl AsRef<Path>, name: &str) -> Result<Resolution, Error> {
    Resolver::new().with_name(name).resolve(path)
}

/// Make `path` absolute and fold `.` and `..` without touching the filesystem.
fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// `target` relative to `dir`, as a `/`-separated path with a leading `/`.
fn relative_path(target: &Path, dir: &Path) -> String {
    let relative = target.strip_prefix(dir).unwrap_or(target);
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            out.push('/');
            out.push_str(&part.to_string_lossy());
        }
    }
    out
}
