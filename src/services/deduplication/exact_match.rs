//! Exact match deduplication checker.
//!
//! Detects duplicates whose normalized URL string equals one already kept.

use std::collections::HashMap;

/// Checker for identical normalized URLs.
///
/// # How it works
///
/// 1. Each kept record registers its normalized URL
/// 2. A candidate is a duplicate if its normalized URL is already registered
/// 3. The first registration wins; later ones never overwrite it
#[derive(Debug)]
pub struct ExactMatchChecker<I> {
    /// Normalized URL to the record that first claimed it.
    seen: HashMap<String, I>,
}

impl<I> ExactMatchChecker<I> {
    /// Creates an empty checker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }

    /// Returns the kept record with this normalized URL, if any.
    #[must_use]
    pub fn check(&self, normalized: &str) -> Option<&I> {
        self.seen.get(normalized)
    }

    /// Registers a kept record. An existing entry is left untouched.
    pub fn record(&mut self, normalized: &str, id: I) {
        self.seen.entry(normalized.to_string()).or_insert(id);
    }

    /// Number of registered normalized URLs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl<I> Default for ExactMatchChecker<I> {
    fn default() -> Self {
        Self::new()
    }
}
