//! Platform content identity.

use super::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(platform, content_id)` pair extracted from a recognizable social URL.
///
/// Both halves are always present together: a URL either yields a full
/// identity or none at all, which callers express as `Option<Identity>`.
/// The content id keeps its original case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    /// Platform the content lives on. Never `Platform::Unknown`.
    pub platform: Platform,
    /// Platform-specific content id (post shortcode, video id, numeric id).
    pub content_id: String,
}

impl Identity {
    /// Creates an identity for a known platform.
    ///
    /// Returns `None` for `Platform::Unknown` or an empty content id so the
    /// both-or-neither invariant cannot be broken by construction.
    #[must_use]
    pub fn new(platform: Platform, content_id: impl Into<String>) -> Option<Self> {
        let content_id = content_id.into();
        if !platform.is_known() || content_id.is_empty() {
            return None;
        }
        Some(Self {
            platform,
            content_id,
        })
    }

    /// Returns the platform of an optional identity, `Unknown` when absent.
    #[must_use]
    pub fn platform_of(identity: Option<&Self>) -> Platform {
        identity.map_or(Platform::Unknown, |id| id.platform)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.platform, self.content_id)
    }
}
