//! Input records.

use serde::{Deserialize, Serialize};

/// One URL-bearing record from the caller's collection.
///
/// `id` is an opaque handle back into the caller's data (a row index for CSV
/// input). A record whose `url` is `None` can never be judged a duplicate and
/// is always kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord<I> {
    /// Caller-owned record identifier.
    pub id: I,
    /// The URL to deduplicate, if the record has one.
    pub url: Option<String>,
}

impl<I> RawRecord<I> {
    /// Creates a record with a URL.
    #[must_use]
    pub fn new(id: I, url: impl Into<String>) -> Self {
        Self {
            id,
            url: Some(url.into()),
        }
    }

    /// Creates a record without a URL.
    #[must_use]
    pub const fn missing(id: I) -> Self {
        Self { id, url: None }
    }
}

impl RawRecord<usize> {
    /// Builds records from an ordered list of optional URLs, using each
    /// position as the record id.
    #[must_use]
    pub fn from_urls<S: AsRef<str>>(urls: &[Option<S>]) -> Vec<Self> {
        urls.iter()
            .enumerate()
            .map(|(idx, url)| Self {
                id: idx,
                url: url.as_ref().map(|u| u.as_ref().to_string()),
            })
            .collect()
    }
}
