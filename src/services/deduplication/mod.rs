//! Batch URL deduplication.
//!
//! This module provides three-tier duplicate checking:
//! 1. **Exact match**: identical normalized URL
//! 2. **Identity match**: same platform content identifier
//! 3. **Similarity**: character-level similarity ratio at or above a threshold
//!
//! Checks short-circuit on the first tier that matches. A record that matches
//! nothing is kept and registered in every tier; a removed record is never
//! registered, so later records can only collapse into kept ones.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    DeduplicationService                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌────────────────────────┐ │
//! │  │ ExactMatch   │  │ IdentityMatch│  │ Similarity             │ │
//! │  │ Checker      │  │ Checker      │  │ Checker                │ │
//! │  │              │  │              │  │                        │ │
//! │  │ normalized   │  │ (platform,   │  │ 2M/T ratio with        │ │
//! │  │ URL set      │  │  content_id) │  │ length pre-filter      │ │
//! │  └──────────────┘  └──────────────┘  └────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use urldedup::models::RawRecord;
//! use urldedup::services::deduplication::{DeduplicationConfig, DeduplicationService, DuplicateReason};
//!
//! let service = DeduplicationService::new(DeduplicationConfig::default())?;
//! let report = service.run(RawRecord::from_urls(&[
//!     Some("https://facebook.com/brand/posts/123456"),
//!     Some("https://www.facebook.com/brand/posts/123456?fbclid=abc"),
//! ]));
//!
//! for outcome in report.removed() {
//!     assert_eq!(outcome.check.reason, Some(DuplicateReason::ExactMatch));
//! }
//! # Ok::<(), urldedup::Error>(())
//! ```

mod config;
mod exact_match;
mod identity_match;
mod service;
mod similarity;
mod state;
mod stats;
mod types;

pub use config::{
    DEFAULT_MAX_LENGTH_RATIO, DEFAULT_MIN_LENGTH_RATIO, DEFAULT_SIMILARITY_THRESHOLD,
    DeduplicationConfig,
};
pub use exact_match::ExactMatchChecker;
pub use identity_match::IdentityMatchChecker;
pub use service::{DedupReport, DeduplicationService, deduplicate};
pub use similarity::{SimilarityChecker, similarity_ratio};
pub use state::DedupState;
pub use stats::DedupStats;
pub use types::{DuplicateCheckResult, DuplicateReason, RecordOutcome};
