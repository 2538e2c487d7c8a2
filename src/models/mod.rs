//! Data models for urldedup.
//!
//! This module contains the core data structures shared by the extractor,
//! the normalizer, and the deduplication engine.

mod identity;
mod platform;
mod record;

pub use identity::Identity;
pub use platform::Platform;
pub use record::RawRecord;
