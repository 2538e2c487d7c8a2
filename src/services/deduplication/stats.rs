//! Deduplication accounting.

use crate::models::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::DuplicateReason;

/// Counts produced by one deduplication run.
///
/// Built once at the end of a run and never mutated afterwards. The totals
/// always satisfy `removed_total == exact + id_based + similarity` and
/// `final_count + removed_total == total_urls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupStats {
    /// Number of input records.
    pub total_urls: usize,
    /// Records removed by the exact normalized-URL tier.
    pub exact_duplicates: usize,
    /// Records removed by the platform identity tier.
    pub id_based_duplicates: usize,
    /// Records removed by the similarity tier.
    pub similarity_duplicates: usize,
    /// Sum of the three duplicate counters.
    pub removed_total: usize,
    /// Number of records kept.
    pub final_count: usize,
    /// Input records per platform, `unknown` included, regardless of verdict.
    pub platforms: BTreeMap<Platform, usize>,
}

impl DedupStats {
    /// Fraction of input records removed, `0.0` for an empty run.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn dedup_rate(&self) -> f64 {
        if self.total_urls == 0 {
            return 0.0;
        }
        self.removed_total as f64 / self.total_urls as f64
    }

    /// Count for one platform, zero when absent.
    #[must_use]
    pub fn platform_count(&self, platform: Platform) -> usize {
        self.platforms.get(&platform).copied().unwrap_or(0)
    }
}

/// Mutable counters accumulated during a run.
#[derive(Debug, Default)]
pub(crate) struct StatsAccumulator {
    total: usize,
    exact: usize,
    id_based: usize,
    similarity: usize,
    platforms: BTreeMap<Platform, usize>,
}

impl StatsAccumulator {
    /// Counts one input record and its platform.
    pub(crate) fn observe(&mut self, platform: Platform) {
        self.total += 1;
        *self.platforms.entry(platform).or_insert(0) += 1;
    }

    /// Counts one removed record under its tier.
    pub(crate) fn removed(&mut self, reason: DuplicateReason) {
        match reason {
            DuplicateReason::ExactMatch => self.exact += 1,
            DuplicateReason::IdMatch => self.id_based += 1,
            DuplicateReason::Similarity => self.similarity += 1,
        }
    }

    /// Freezes the counters.
    pub(crate) fn finish(self) -> DedupStats {
        let removed_total = self.exact + self.id_based + self.similarity;
        DedupStats {
            total_urls: self.total,
            exact_duplicates: self.exact,
            id_based_duplicates: self.id_based,
            similarity_duplicates: self.similarity,
            removed_total,
            final_count: self.total - removed_total,
            platforms: self.platforms,
        }
    }
}
