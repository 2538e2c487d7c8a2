//! Deduplication service orchestrator.
//!
//! Coordinates the three-tier duplicate check over an ordered batch:
//! 1. **Exact match**: identical normalized URL
//! 2. **Identity match**: same `(platform, content_id)`
//! 3. **Similarity**: normalized URL similarity at or above the threshold
//!
//! Uses short-circuit evaluation, returning on first duplicate match. Records
//! are processed strictly in input order, so the first record of each
//! equivalence class is always the one kept.

use crate::models::{Identity, RawRecord};
use crate::services::normalize::{Normalization, normalize};
use crate::Result;
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::instrument;

use super::config::DeduplicationConfig;
use super::state::DedupState;
use super::stats::DedupStats;
use super::types::{DuplicateCheckResult, DuplicateReason, RecordOutcome};

/// Everything a deduplication run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DedupReport<I> {
    /// Identifiers of kept records, in input order.
    pub kept: Vec<I>,
    /// One outcome per input record, in input order.
    pub outcomes: Vec<RecordOutcome<I>>,
    /// Run totals.
    pub stats: DedupStats,
}

impl<I> DedupReport<I> {
    /// Iterates the outcomes of removed records.
    pub fn removed(&self) -> impl Iterator<Item = &RecordOutcome<I>> {
        self.outcomes.iter().filter(|o| !o.is_kept())
    }
}

/// Service for batch URL deduplication.
///
/// # Example
///
/// ```rust
/// use urldedup::models::RawRecord;
/// use urldedup::services::deduplication::{DeduplicationConfig, DeduplicationService};
///
/// let service = DeduplicationService::new(DeduplicationConfig::default())?;
/// let records = RawRecord::from_urls(&[
///     Some("https://youtu.be/XYZ"),
///     Some("https://youtube.com/watch?v=XYZ&feature=share"),
/// ]);
///
/// let report = service.run(records);
/// assert_eq!(report.kept, vec![0]);
/// assert_eq!(report.stats.id_based_duplicates, 1);
/// # Ok::<(), urldedup::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeduplicationService {
    /// Configuration.
    config: DeduplicationConfig,
}

impl DeduplicationService {
    /// Creates a service after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if the configuration is out of range.
    pub fn new(config: DeduplicationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &DeduplicationConfig {
        &self.config
    }

    /// Deduplicates an ordered batch of records.
    ///
    /// The batch is folded through one [`DedupState`] owned by this call.
    #[allow(clippy::cast_possible_truncation)] // Duration in ms won't exceed u64::MAX
    #[instrument(
        skip(self, records),
        fields(
            operation = "dedup_run",
            threshold = self.config.similarity_threshold,
            use_similarity = self.config.use_similarity
        )
    )]
    pub fn run<I, R>(&self, records: R) -> DedupReport<I>
    where
        I: Clone + fmt::Debug,
        R: IntoIterator<Item = RawRecord<I>>,
    {
        let start = Instant::now();

        let (state, outcomes) = records.into_iter().fold(
            (DedupState::new(&self.config), Vec::new()),
            |(mut state, mut outcomes), record| {
                outcomes.push(Self::process(&mut state, record));
                (state, outcomes)
            },
        );

        let stats = state.stats.finish();
        let kept = outcomes
            .iter()
            .filter(|o| o.is_kept())
            .map(|o| o.id.clone())
            .collect();

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            total = stats.total_urls,
            exact = stats.exact_duplicates,
            id_based = stats.id_based_duplicates,
            similarity = stats.similarity_duplicates,
            kept = stats.final_count,
            duration_ms = duration_ms,
            "Deduplication complete"
        );
        record_run_metrics(&stats, duration_ms);

        DedupReport {
            kept,
            outcomes,
            stats,
        }
    }

    /// Judges one record and updates the state.
    fn process<I>(state: &mut DedupState<I>, record: RawRecord<I>) -> RecordOutcome<I>
    where
        I: Clone + fmt::Debug,
    {
        let Normalization { url, identity } = normalize(record.url.as_deref());
        let platform = Identity::platform_of(identity.as_ref());
        state.stats.observe(platform);

        let Some(url) = url else {
            tracing::debug!(id = ?record.id, "No URL, keeping record unjudged");
            return RecordOutcome {
                id: record.id,
                platform,
                normalized_url: None,
                check: DuplicateCheckResult::not_duplicate(),
            };
        };

        let normalized = url.into_string();
        let check = state.check(&normalized, identity.as_ref());

        match check.reason {
            Some(reason) => {
                state.stats.removed(reason);
                tracing::debug!(
                    id = ?record.id,
                    matched = ?check.matched_record,
                    reason = %reason,
                    score = check.similarity_score,
                    "Duplicate found"
                );
            },
            None => state.record_kept(&normalized, identity.as_ref(), &record.id),
        }

        RecordOutcome {
            id: record.id,
            platform,
            normalized_url: Some(normalized),
            check,
        }
    }
}

/// Records run totals as metrics.
#[allow(clippy::cast_precision_loss)]
fn record_run_metrics(stats: &DedupStats, duration_ms: u64) {
    metrics::counter!("url_dedup_records_total").increment(stats.total_urls as u64);
    for (reason, count) in [
        (DuplicateReason::ExactMatch, stats.exact_duplicates),
        (DuplicateReason::IdMatch, stats.id_based_duplicates),
        (DuplicateReason::Similarity, stats.similarity_duplicates),
    ] {
        metrics::counter!("url_dedup_duplicates_total", "reason" => reason.as_str())
            .increment(count as u64);
    }
    metrics::histogram!("url_dedup_run_duration_ms").record(duration_ms as f64);
}

/// Deduplicates `records` and returns the kept identifiers with run totals.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if `similarity_threshold` is outside `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use urldedup::models::RawRecord;
/// use urldedup::services::deduplicate;
///
/// let records = RawRecord::from_urls(&[
///     Some("https://tiktok.com/@brand/video/1111111111"),
///     Some("https://TikTok.com/@brand/video/1111111111/"),
/// ]);
/// let (kept, stats) = deduplicate(records, 0.90, true)?;
/// assert_eq!(kept, vec![0]);
/// assert_eq!(stats.exact_duplicates, 1);
/// # Ok::<(), urldedup::Error>(())
/// ```
pub fn deduplicate<I, R>(
    records: R,
    similarity_threshold: f64,
    use_similarity: bool,
) -> Result<(Vec<I>, DedupStats)>
where
    I: Clone + fmt::Debug,
    R: IntoIterator<Item = RawRecord<I>>,
{
    let config = DeduplicationConfig::default()
        .with_similarity_threshold(similarity_threshold)
        .with_similarity(use_similarity);
    let report = DeduplicationService::new(config)?.run(records);
    Ok((report.kept, report.stats))
}
