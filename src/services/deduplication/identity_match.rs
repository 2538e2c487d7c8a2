//! Platform identity deduplication checker.
//!
//! Detects duplicates that point at the same platform content through a
//! different URL shape, such as `youtu.be/X` after `youtube.com/watch?v=X`.

use crate::models::Identity;
use std::collections::HashMap;

/// Checker keyed on `(platform, content_id)`.
#[derive(Debug)]
pub struct IdentityMatchChecker<I> {
    /// Identity to the record that first claimed it.
    seen: HashMap<Identity, I>,
}

impl<I> IdentityMatchChecker<I> {
    /// Creates an empty checker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }

    /// Returns the kept record with this identity, if any.
    #[must_use]
    pub fn check(&self, identity: &Identity) -> Option<&I> {
        self.seen.get(identity)
    }

    /// Registers a kept record. An existing entry is left untouched.
    pub fn record(&mut self, identity: &Identity, id: I) {
        self.seen.entry(identity.clone()).or_insert(id);
    }

    /// Number of registered identities.
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

impl<I> Default for IdentityMatchChecker<I> {
    fn default() -> Self {
        Self::new()
    }
}
