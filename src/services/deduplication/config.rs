//! Deduplication configuration.
//!
//! This module defines the engine tunables: the similarity threshold, whether
//! the similarity tier runs at all, and the length-ratio pre-filter bounds.

use crate::{Error, Result};
use serde::Serialize;

/// Default similarity threshold for near-duplicate detection.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.90;

/// Default lower bound of `len(candidate) / len(kept)` for a similarity comparison.
pub const DEFAULT_MIN_LENGTH_RATIO: f64 = 0.7;

/// Default upper bound of `len(candidate) / len(kept)` for a similarity comparison.
pub const DEFAULT_MAX_LENGTH_RATIO: f64 = 1.3;

/// Configuration for the deduplication engine.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `URLDEDUP_SIMILARITY_THRESHOLD` | f64 | `0.90` | Minimum ratio for a similarity duplicate |
/// | `URLDEDUP_USE_SIMILARITY` | bool | `true` | Enable the similarity tier |
///
/// # Example
///
/// ```rust
/// use urldedup::services::deduplication::DeduplicationConfig;
///
/// let config = DeduplicationConfig::default();
/// assert!(config.use_similarity);
/// assert!((config.similarity_threshold - 0.90).abs() < f64::EPSILON);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeduplicationConfig {
    /// Minimum similarity ratio (0.0 to 1.0) for a similarity duplicate.
    pub similarity_threshold: f64,

    /// Whether the similarity tier runs.
    pub use_similarity: bool,

    /// Lower bound of the length-ratio pre-filter.
    pub min_length_ratio: f64,

    /// Upper bound of the length-ratio pre-filter.
    pub max_length_ratio: f64,
}

impl DeduplicationConfig {
    /// Creates a new configuration from environment variables.
    ///
    /// Falls back to defaults for any unset or unparseable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Overrides fields from `URLDEDUP_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|key| std::env::var(key).ok());
    }

    /// Overrides fields from an arbitrary variable source.
    ///
    /// Unparseable values are ignored.
    pub fn apply_overrides_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(threshold) =
            lookup("URLDEDUP_SIMILARITY_THRESHOLD").and_then(|v| v.trim().parse().ok())
        {
            self.similarity_threshold = threshold;
        }

        if let Some(v) = lookup("URLDEDUP_USE_SIMILARITY") {
            self.use_similarity = parse_bool(&v).unwrap_or(self.use_similarity);
        }
    }

    /// Checks the preconditions the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the threshold is outside `[0, 1]`
    /// (or NaN), or if the length-ratio bounds are not `0 <= min <= max`.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::InvalidInput(format!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }

        let ratios_ok = self.min_length_ratio.is_finite()
            && self.max_length_ratio.is_finite()
            && self.min_length_ratio >= 0.0
            && self.min_length_ratio <= self.max_length_ratio;
        if !ratios_ok {
            return Err(Error::InvalidInput(format!(
                "length ratio bounds must satisfy 0 <= min <= max, got [{}, {}]",
                self.min_length_ratio, self.max_length_ratio
            )));
        }

        Ok(())
    }

    /// Builder method to set the similarity threshold.
    #[must_use]
    pub const fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Builder method to enable or disable the similarity tier.
    #[must_use]
    pub const fn with_similarity(mut self, enabled: bool) -> Self {
        self.use_similarity = enabled;
        self
    }

    /// Builder method to set the length-ratio pre-filter bounds.
    #[must_use]
    pub const fn with_length_ratio_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_length_ratio = min;
        self.max_length_ratio = max;
        self
    }
}

/// Parses the boolean spellings accepted in environment variables.
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            use_similarity: true,
            min_length_ratio: DEFAULT_MIN_LENGTH_RATIO,
            max_length_ratio: DEFAULT_MAX_LENGTH_RATIO,
        }
    }
}
