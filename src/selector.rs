//! Matching section selectors against paths.
//!
//! Selectors are anchored before they are compiled: a selector without `/`
//! matches a basename at any depth, any other selector is relative to the
//! directory holding the config file. Paths are matched in their slash-rooted
//! form relative to that same directory.

use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::pattern::Pattern;

/// Rewrite a raw selector into its slash-rooted glob.
pub fn anchor_selector(selector: &str) -> Cow<'_, str> {
    if !selector.contains('/') {
        Cow::Owned(format!("/**/{selector}"))
    } else if !selector.starts_with('/') {
        Cow::Owned(format!("/{selector}"))
    } else {
        Cow::Borrowed(selector)
    }
}

/// Prefix `path` with `/` unless it already starts with one.
pub fn anchor_path(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Compile a raw selector, anchoring it first.
pub fn compile_selector(selector: &str) -> Pattern {
    Pattern::new(&anchor_selector(selector))
}

/// Decides whether a section selector applies to a path.
///
/// Implementations may cache compiled patterns, but must behave exactly like
/// [`UncachedMatcher`].
pub trait SelectorMatcher: Send + Sync {
    /// The compiled pattern for a raw (not yet anchored) selector.
    fn pattern(&self, selector: &str) -> Arc<Pattern>;

    /// Whether `selector` matches `path`, a path relative to the directory of
    /// the config file declaring the selector.
    fn matches(&self, selector: &str, path: &str) -> bool {
        self.pattern(selector).is_match(&anchor_path(path))
    }
}

/// Compiles every selector on each use.
#[derive(Debug, Default, Clone, Copy)]
pub struct UncachedMatcher;

impl SelectorMatcher for UncachedMatcher {
    fn pattern(&self, selector: &str) -> Arc<Pattern> {
        Arc::new(compile_selector(selector))
    }
}

/// Keeps compiled patterns keyed by raw selector.
///
/// Share one instance between resolvers (and threads) through an [`Arc`].
#[derive(Debug)]
pub struct CachedMatcher {
    patterns: Mutex<LruCache<String, Arc<Pattern>>>,
}

impl Default for CachedMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CachedMatcher {
    /// Cache without a size limit.
    pub fn new() -> Self {
        Self {
            patterns: Mutex::new(LruCache::unbounded()),
        }
    }

    /// Cache holding at most `capacity` compiled selectors, dropping the least
    /// recently used one first.
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self {
            patterns: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of compiled selectors held.
    pub fn len(&self) -> usize {
        self.patterns.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.lock().is_empty()
    }

    pub fn clear(&self) {
        self.patterns.lock().clear();
    }
}

impl SelectorMatcher for CachedMatcher {
    fn pattern(&self, selector: &str) -> Arc<Pattern> {
        let mut patterns = self.patterns.lock();
        if let Some(pattern) = patterns.get(selector) {
            return Arc::clone(pattern);
        }

        let pattern = Arc::new(compile_selector(selector));
        patterns.put(selector.to_string(), Arc::clone(&pattern));
        pattern
    }
}
