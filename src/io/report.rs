//! Run summaries for humans and machines.

use crate::services::deduplication::{DedupStats, DeduplicationConfig};
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Output format for summaries and command output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    /// Plain-text report.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Settings a run was made with, echoed in the summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryConfiguration {
    /// Column the URLs were read from.
    pub url_column: String,
    /// Similarity threshold in `[0, 1]`.
    pub similarity_threshold: f64,
    /// Whether the similarity tier ran.
    pub use_similarity: bool,
}

/// Summary of one deduplication run.
///
/// Serializes with the stats fields at the top level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DedupSummary {
    /// Run totals.
    #[serde(flatten)]
    pub stats: DedupStats,
    /// Fraction of rows removed.
    pub dedup_rate: f64,
    /// Run settings.
    pub configuration: SummaryConfiguration,
}

impl DedupSummary {
    /// Creates a summary.
    #[must_use]
    pub fn new(url_column: impl Into<String>, config: &DeduplicationConfig, stats: DedupStats) -> Self {
        Self {
            dedup_rate: stats.dedup_rate(),
            stats,
            configuration: SummaryConfiguration {
                url_column: url_column.into(),
                similarity_threshold: config.similarity_threshold,
                use_similarity: config.use_similarity,
            },
        }
    }

    /// Renders the summary in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| Error::OperationFailed {
                    operation: "serialize_summary".to_string(),
                    cause: e.to_string(),
                })
            },
        }
    }
}

impl fmt::Display for DedupSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        let config = &self.configuration;

        writeln!(f, "Deduplication Report")?;
        writeln!(f, "====================")?;
        writeln!(f, "Total Rows: {}", stats.total_urls)?;
        writeln!(f, "Duplicate Rows Removed: {}", stats.removed_total)?;
        writeln!(f, "Clean Rows Remaining: {}", stats.final_count)?;
        writeln!(f, "Deduplication Rate: {:.1}%", self.dedup_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Breakdown:")?;
        writeln!(f, "- Exact Duplicates: {}", stats.exact_duplicates)?;
        writeln!(f, "- ID-Based Duplicates: {}", stats.id_based_duplicates)?;
        writeln!(f, "- Similarity Duplicates: {}", stats.similarity_duplicates)?;
        writeln!(f)?;
        writeln!(f, "Platforms Detected:")?;
        if stats.platforms.is_empty() {
            writeln!(f, "- none")?;
        }
        for (platform, count) in &stats.platforms {
            writeln!(f, "- {platform}: {count}")?;
        }
        writeln!(f)?;
        writeln!(f, "Configuration:")?;
        writeln!(f, "- URL Column: {}", config.url_column)?;
        writeln!(
            f,
            "- Similarity Threshold: {:.1}%",
            config.similarity_threshold * 100.0
        )?;
        writeln!(
            f,
            "- Similarity Check: {}",
            if config.use_similarity { "Enabled" } else { "Disabled" }
        )
    }
}
