//! Clean CLI command.

use crate::config::UrlDedupConfig;
use crate::io::{CsvTable, DedupSummary, ReportFormat, create_output, default_output_path};
use crate::services::DeduplicationService;
use crate::Result;
use std::io::Write;
use std::path::PathBuf;
use tracing::instrument;

use super::emit;

/// Clean command handler.
#[derive(Debug, Clone)]
pub struct CleanCommand {
    /// Input CSV file.
    pub input: PathBuf,
    /// Kept rows destination, `<stem>_deduplicated.csv` when unset.
    pub output: Option<PathBuf>,
    /// Removed rows destination, not written when unset.
    pub removed: Option<PathBuf>,
    /// Summary format.
    pub format: ReportFormat,
}

impl CleanCommand {
    /// Creates a clean command for `input` with default outputs.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            removed: None,
            format: ReportFormat::default(),
        }
    }

    /// Sets the kept rows destination.
    #[must_use]
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Sets the removed rows destination.
    #[must_use]
    pub fn with_removed(mut self, path: impl Into<PathBuf>) -> Self {
        self.removed = Some(path.into());
        self
    }

    /// Sets the summary format.
    #[must_use]
    pub const fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Path the kept rows are written to.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }

    /// Runs the pipeline and writes the summary to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the input cannot be
    /// read, the URL column cannot be resolved, the input exceeds
    /// `max_records`, or an output cannot be written.
    #[instrument(skip_all, fields(input = %self.input.display()))]
    pub fn execute<W: Write>(&self, config: &UrlDedupConfig, out: &mut W) -> Result<DedupSummary> {
        let service = DeduplicationService::new(config.dedup.clone())?;

        let table = CsvTable::read_path(&self.input)?;
        config.check_record_count(table.len())?;

        let column = table.resolve_url_column(config.input.url_column.as_deref())?;
        tracing::info!(rows = table.len(), column = %column, "Removing duplicates");

        let report = service.run(table.records(&column)?);

        let output = self.output_path();
        let kept_rows = table.write_kept(create_output(&output)?, &report.kept)?;
        tracing::info!(path = %output.display(), rows = kept_rows, "Wrote kept rows");

        if let Some(removed) = &self.removed {
            let removed_rows = table.write_removed(create_output(removed)?, &report.outcomes)?;
            tracing::info!(path = %removed.display(), rows = removed_rows, "Wrote removed rows");
        }

        let summary = DedupSummary::new(column, &config.dedup, report.stats);
        let mut rendered = summary.render(self.format)?;
        if self.format == ReportFormat::Text {
            rendered.push_str(&format!("\nCleaned data saved to {}\n", output.display()));
        } else {
            rendered.push('\n');
        }
        emit(out, &rendered)?;

        Ok(summary)
    }
}
