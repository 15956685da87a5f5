//! Memoizing decorator for section sources.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use super::{ConfigFile, FileSource, SectionSource};
use crate::error::SourceError;

/// Caches the snapshots of another [`SectionSource`] by path.
///
/// Only successful parses are kept, so a missing or broken file is looked up
/// again on the next request. A bounded cache evicts the least recently used
/// snapshot once full.
#[derive(Debug)]
pub struct CachedSource<S = FileSource> {
    inner: S,
    files: Mutex<LruCache<PathBuf, Arc<ConfigFile>>>,
}

impl<S: Default> Default for CachedSource<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> CachedSource<S> {
    /// Cache without a size limit.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            files: Mutex::new(LruCache::unbounded()),
        }
    }

    /// Cache holding at most `capacity` snapshots.
    pub fn bounded(inner: S, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            files: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of cached snapshots.
    pub fn len(&self) -> usize {
        self.files.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.lock().is_empty()
    }

    /// Drop the snapshot of one file, e.g. after it changed on disk.
    pub fn invalidate(&self, path: &Path) {
        self.files.lock().pop(path);
    }

    pub fn clear(&self) {
        self.files.lock().clear();
    }
}

impl<S: SectionSource> SectionSource for CachedSource<S> {
    fn parse(&self, path: &Path) -> Result<Arc<ConfigFile>, SourceError> {
        if let Some(file) = self.files.lock().get(path) {
            return Ok(Arc::clone(file));
        }

        // The lock is not held while the inner source does I/O.
        let file = self.inner.parse(path)?;
        self.files.lock().put(path.to_path_buf(), Arc::clone(&file));
        Ok(file)
    }
}
