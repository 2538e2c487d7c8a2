//! Normalize CLI command.

use crate::io::ReportFormat;
use crate::models::Platform;
use crate::services::normalize;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

use super::emit;

/// Normalization of one command-line URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedEntry {
    /// The URL as given.
    pub input: String,
    /// Normalized form, `None` for blank input.
    pub normalized: Option<String>,
    /// Detected platform.
    pub platform: Platform,
    /// Platform content id, if recognized.
    pub content_id: Option<String>,
}

impl NormalizedEntry {
    /// Normalizes one URL.
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        let normalization = normalize(Some(input));
        Self {
            input: input.to_string(),
            platform: normalization.platform(),
            content_id: normalization.identity.map(|id| id.content_id),
            normalized: normalization.url.map(|url| url.into_string()),
        }
    }
}

/// Normalize command handler.
#[derive(Debug, Clone, Default)]
pub struct NormalizeCommand {
    /// URLs to normalize.
    pub urls: Vec<String>,
    /// Output format.
    pub format: ReportFormat,
}

impl NormalizeCommand {
    /// Creates a normalize command.
    #[must_use]
    pub const fn new(urls: Vec<String>, format: ReportFormat) -> Self {
        Self { urls, format }
    }

    /// Normalizes every URL and writes one result per URL to `out`.
    ///
    /// Text output is tab-separated: normalized URL, platform, content id
    /// (`-` when absent).
    ///
    /// # Errors
    ///
    /// Returns an error if output cannot be written.
    pub fn execute<W: Write>(&self, out: &mut W) -> Result<Vec<NormalizedEntry>> {
        let entries: Vec<_> = self
            .urls
            .iter()
            .map(|url| NormalizedEntry::from_input(url))
            .collect();

        let rendered = match self.format {
            ReportFormat::Text => entries.iter().fold(String::new(), |mut acc, entry| {
                let _ = writeln!(
                    acc,
                    "{}\t{}\t{}",
                    entry.normalized.as_deref().unwrap_or("-"),
                    entry.platform,
                    entry.content_id.as_deref().unwrap_or("-"),
                );
                acc
            }),
            ReportFormat::Json => {
                let mut json =
                    serde_json::to_string_pretty(&entries).map_err(|e| Error::OperationFailed {
                        operation: "serialize_normalized".to_string(),
                        cause: e.to_string(),
                    })?;
                json.push('\n');
                json
            },
        };

        emit(out, &rendered)?;
        Ok(entries)
    }
}
