//! URL deduplication services.
//!
//! Identity extraction and normalization are pure functions over a single
//! URL; [`deduplication`] folds them over an ordered batch.

pub mod deduplication;
mod identity;
mod normalize;

pub use deduplication::{DedupReport, DedupStats, DeduplicationService, deduplicate};
pub use identity::{IDENTITY_RULES, IdentityRule, extract_identity, matching_rule};
pub use normalize::{
    CANONICAL_SCHEME, Normalization, NormalizedUrl, TRACKING_PARAMS, is_tracking_param, normalize,
};
