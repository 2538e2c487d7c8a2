//! Deduplication result types.
//!
//! This module defines the per-record verdicts produced by a deduplication run.

use crate::models::Platform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of checking one record against everything kept so far.
///
/// # Example
///
/// ```rust
/// use urldedup::services::deduplication::{DuplicateCheckResult, DuplicateReason};
///
/// let result = DuplicateCheckResult::similarity_match(3_usize, 0.94);
/// assert!(result.is_duplicate);
/// assert_eq!(result.reason, Some(DuplicateReason::Similarity));
/// assert_eq!(result.matched_record, Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateCheckResult<I> {
    /// Whether the record is a duplicate.
    pub is_duplicate: bool,

    /// Which tier identified the duplicate.
    pub reason: Option<DuplicateReason>,

    /// Similarity ratio for similarity matches (0.0 to 1.0).
    pub similarity_score: Option<f64>,

    /// The kept record this one collapsed into.
    pub matched_record: Option<I>,
}

impl<I> DuplicateCheckResult<I> {
    /// Creates a result indicating no duplicate was found.
    #[must_use]
    pub const fn not_duplicate() -> Self {
        Self {
            is_duplicate: false,
            reason: None,
            similarity_score: None,
            matched_record: None,
        }
    }

    /// Creates a result for an identical normalized URL.
    #[must_use]
    pub const fn exact_match(matched: I) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::ExactMatch),
            similarity_score: None,
            matched_record: Some(matched),
        }
    }

    /// Creates a result for a shared platform content identity.
    #[must_use]
    pub const fn id_match(matched: I) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::IdMatch),
            similarity_score: None,
            matched_record: Some(matched),
        }
    }

    /// Creates a result for a near-identical normalized URL.
    #[must_use]
    pub const fn similarity_match(matched: I, score: f64) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(DuplicateReason::Similarity),
            similarity_score: Some(score),
            matched_record: Some(matched),
        }
    }
}

impl<I> Default for DuplicateCheckResult<I> {
    fn default() -> Self {
        Self::not_duplicate()
    }
}

/// The tier that identified a record as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateReason {
    /// Normalized URL equals a kept one.
    ExactMatch,

    /// Platform and content id equal a kept record's.
    IdMatch,

    /// Normalized URL similarity reached the threshold.
    Similarity,
}

impl DuplicateReason {
    /// Returns the reason as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExactMatch => "exact_match",
            Self::IdMatch => "id_match",
            Self::Similarity => "similarity",
        }
    }
}

impl fmt::Display for DuplicateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcome<I> {
    /// The caller's record identifier.
    pub id: I,

    /// Platform of the record's identity (`Unknown` without one).
    pub platform: Platform,

    /// Normalized URL, `None` for records without a URL.
    pub normalized_url: Option<String>,

    /// Duplicate verdict.
    pub check: DuplicateCheckResult<I>,
}

impl<I> RecordOutcome<I> {
    /// Returns true if the record survives deduplication.
    #[must_use]
    pub const fn is_kept(&self) -> bool {
        !self.check.is_duplicate
    }

    /// Returns true if the record had no URL to judge.
    #[must_use]
    pub const fn is_unjudgeable(&self) -> bool {
        self.normalized_url.is_none()
    }
}
