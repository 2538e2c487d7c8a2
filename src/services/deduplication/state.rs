//! Per-run deduplication state.

use crate::models::Identity;

use super::config::DeduplicationConfig;
use super::exact_match::ExactMatchChecker;
use super::identity_match::IdentityMatchChecker;
use super::similarity::SimilarityChecker;
use super::stats::StatsAccumulator;
use super::types::DuplicateCheckResult;

/// Everything one run has seen so far.
///
/// Owned by a single run and dropped with it. Kept records are registered in
/// all checkers at the same step, so every identity entry has a matching
/// normalized-URL entry and insertion order mirrors input order.
#[derive(Debug)]
pub struct DedupState<I> {
    exact: ExactMatchChecker<I>,
    identity: IdentityMatchChecker<I>,
    similarity: SimilarityChecker<I>,
    use_similarity: bool,
    pub(crate) stats: StatsAccumulator,
}

impl<I: Clone> DedupState<I> {
    /// Creates empty state for one run.
    #[must_use]
    pub fn new(config: &DeduplicationConfig) -> Self {
        Self {
            exact: ExactMatchChecker::new(),
            identity: IdentityMatchChecker::new(),
            similarity: SimilarityChecker::new(config),
            use_similarity: config.use_similarity,
            stats: StatsAccumulator::default(),
        }
    }

    /// Runs the three tiers in order and stops at the first match.
    #[must_use]
    pub fn check(&self, normalized: &str, identity: Option<&Identity>) -> DuplicateCheckResult<I> {
        if let Some(matched) = self.exact.check(normalized) {
            return DuplicateCheckResult::exact_match(matched.clone());
        }

        if let Some(matched) = identity.and_then(|id| self.identity.check(id)) {
            return DuplicateCheckResult::id_match(matched.clone());
        }

        if self.use_similarity && !self.similarity.is_empty() {
            if let Some((matched, score)) = self.similarity.check(normalized) {
                return DuplicateCheckResult::similarity_match(matched.clone(), score);
            }
        }

        DuplicateCheckResult::not_duplicate()
    }

    /// Registers a kept record in every checker.
    pub fn record_kept(&mut self, normalized: &str, identity: Option<&Identity>, id: &I) {
        self.exact.record(normalized, id.clone());
        if let Some(identity) = identity {
            self.identity.record(identity, id.clone());
        }
        self.similarity.record(normalized, id.clone());
    }

    /// Number of distinct normalized URLs kept.
    #[must_use]
    pub fn kept_normalized(&self) -> usize {
        self.exact.len()
    }

    /// Number of distinct identities kept.
    #[must_use]
    pub fn kept_identities(&self) -> usize {
        self.identity.len()
    }
}
