//! # urldedup
//!
//! Deduplication of social-media post URLs.
//!
//! Marketing datasets collect the same post many times over: with tracking
//! parameters attached, through short links, with `www.` or without. This
//! crate collapses those copies so only the first occurrence of each post is
//! kept.
//!
//! ## Features
//!
//! - Platform identity extraction for Instagram, YouTube, `TikTok`, and Facebook
//! - URL normalization (scheme, host case, `www.`, trailing slash, tracking parameters)
//! - Three-tier duplicate detection: exact, identity, and similarity
//! - CSV pipeline with kept/removed outputs and a run summary
//!
//! ## Example
//!
//! ```rust
//! use urldedup::models::RawRecord;
//! use urldedup::services::deduplicate;
//!
//! let records = RawRecord::from_urls(&[
//!     Some("https://www.youtube.com/watch?v=XYZ&utm_source=x"),
//!     Some("https://youtu.be/XYZ"),
//!     None,
//! ]);
//!
//! let (kept, stats) = deduplicate(records, 0.90, true)?;
//! assert_eq!(kept, vec![0, 2]);
//! assert_eq!(stats.id_based_duplicates, 1);
//! # Ok::<(), urldedup::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod cli;
pub mod config;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use config::UrlDedupConfig;
pub use models::{Identity, Platform, RawRecord};
pub use services::deduplication::{
    DedupReport, DedupStats, DeduplicationConfig, DeduplicationService, DuplicateReason,
};
pub use services::{deduplicate, extract_identity, normalize};

/// Error type for urldedup operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Threshold outside `[0, 1]`, unknown URL column, bad config values |
/// | `OperationFailed` | File I/O errors, CSV parse or write errors, logging setup failures |
///
/// Malformed URLs are never an error: the normalizer passes them through.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - `similarity_threshold` is outside `[0, 1]` or NaN
    /// - The configured URL column is not in the CSV header
    /// - No URL column can be detected
    /// - A config file value cannot be parsed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Input or output files cannot be opened or written
    /// - CSV records cannot be parsed
    /// - The tracing subscriber cannot be installed
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Result type alias for urldedup operations.
pub type Result<T> = std::result::Result<T, Error>;
