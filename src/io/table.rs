//! CSV table adapter.
//!
//! Loads a whole CSV file into memory, hands one column to the engine as
//! [`RawRecord`]s keyed by data-row index, and writes kept or removed rows
//! back out with every original column.

use crate::models::RawRecord;
use crate::services::deduplication::RecordOutcome;
use crate::{Error, Result};
use regex::Regex;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::sync::LazyLock;

/// Header names that look like a URL column.
pub const URL_COLUMN_PATTERN: &str = r"(?i)url|link|post.*url|social.*url";

static URL_COLUMN_RE: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(URL_COLUMN_PATTERN) {
    Ok(re) => Some(re),
    Err(e) => {
        tracing::error!(error = %e, "Failed to compile URL column pattern");
        None
    },
});

/// Name of the column added to removed rows holding the duplicate reason.
pub const DUPLICATE_TYPE_COLUMN: &str = "_duplicate_type";

/// Name of the column added to removed rows holding the kept row index.
pub const DUPLICATE_OF_COLUMN: &str = "_duplicate_of";

/// Returns the first header that looks like a URL column.
///
/// # Example
///
/// ```rust
/// use urldedup::io::detect_url_column;
///
/// assert_eq!(detect_url_column(["id", "Post URL", "link"]), Some("Post URL"));
/// assert_eq!(detect_url_column(["id", "caption"]), None);
/// ```
pub fn detect_url_column<'a>(headers: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let re = URL_COLUMN_RE.as_ref()?;
    headers.into_iter().find(|h| re.is_match(h))
}

/// An in-memory CSV file.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: csv::StringRecord,
    rows: Vec<csv::StringRecord>,
}

impl CsvTable {
    /// Reads a CSV document with a header row.
    ///
    /// Rows may have fewer or more cells than the header. Cells are kept
    /// verbatim, surrounding whitespace included, so written rows match the input.
    ///
    /// # Errors
    ///
    /// Returns an error if the header or any row cannot be parsed.
    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::OperationFailed {
                operation: "read_csv_headers".to_string(),
                cause: e.to_string(),
            })?
            .clone();

        let rows = csv_reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::OperationFailed {
                operation: "read_csv".to_string(),
                cause: e.to_string(),
            })?;

        tracing::debug!(columns = headers.len(), rows = rows.len(), "Loaded CSV");
        Ok(Self { headers, rows })
    }

    /// Reads a CSV file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn read_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::OperationFailed {
            operation: "open_input".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;
        Self::read(file)
    }

    /// Column names in file order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the file has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Picks the URL column: the configured name if given, otherwise the
    /// first header matching [`URL_COLUMN_PATTERN`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if nothing is configured and no header matches.
    pub fn resolve_url_column(&self, configured: Option<&str>) -> Result<String> {
        if let Some(column) = configured {
            return Ok(column.to_string());
        }
        detect_url_column(self.headers())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "no URL column detected; available columns: {}",
                    self.available_columns()
                ))
            })
    }

    /// Builds one record per data row from `column`, using the row index as id.
    ///
    /// Blank cells and cells missing from short rows become records without a URL.
    /// Header names are compared with surrounding whitespace ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `column` is not in the header.
    pub fn records(&self, column: &str) -> Result<Vec<RawRecord<usize>>> {
        let index = self
            .headers
            .iter()
            .position(|h| h.trim() == column.trim())
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "column '{column}' not found; available columns: {}",
                    self.available_columns()
                ))
            })?;

        Ok(self
            .rows
            .iter()
            .enumerate()
            .map(|(row, record)| match record.get(index).filter(|c| !c.trim().is_empty()) {
                Some(url) => RawRecord::new(row, url),
                None => RawRecord::missing(row),
            })
            .collect())
    }

    /// Writes the header and the rows listed in `kept`, in the given order.
    ///
    /// Returns the number of rows written. Unknown row indices are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_kept<W: Write>(&self, writer: W, kept: &[usize]) -> Result<usize> {
        let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        write_row(&mut csv_writer, self.headers.iter())?;

        let mut written = 0;
        for row in kept.iter().filter_map(|&i| self.rows.get(i)) {
            write_row(&mut csv_writer, self.padded(row))?;
            written += 1;
        }

        flush(&mut csv_writer)?;
        Ok(written)
    }

    /// Writes the removed rows with [`DUPLICATE_TYPE_COLUMN`] and
    /// [`DUPLICATE_OF_COLUMN`] appended.
    ///
    /// Cells beyond the header width are not written. Returns the number of
    /// rows written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_removed<W: Write>(
        &self,
        writer: W,
        outcomes: &[RecordOutcome<usize>],
    ) -> Result<usize> {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
        write_row(
            &mut csv_writer,
            self.headers
                .iter()
                .chain([DUPLICATE_TYPE_COLUMN, DUPLICATE_OF_COLUMN]),
        )?;

        let width = self.headers.len();
        let mut written = 0;
        for outcome in outcomes {
            let (Some(reason), Some(row)) = (outcome.check.reason, self.rows.get(outcome.id))
            else {
                continue;
            };
            let matched = outcome
                .check
                .matched_record
                .map(|i| i.to_string())
                .unwrap_or_default();

            let cells = self
                .padded(row)
                .take(width)
                .chain([reason.as_str(), matched.as_str()]);
            write_row(&mut csv_writer, cells)?;
            written += 1;
        }

        flush(&mut csv_writer)?;
        Ok(written)
    }

    /// Row cells, padded with empty cells up to the header width.
    fn padded<'a>(&'a self, row: &'a csv::StringRecord) -> impl Iterator<Item = &'a str> {
        let missing = self.headers.len().saturating_sub(row.len());
        row.iter().chain(std::iter::repeat_n("", missing))
    }

    fn available_columns(&self) -> String {
        self.headers.iter().collect::<Vec<_>>().join(", ")
    }
}

fn write_row<'a, W: Write>(
    writer: &mut csv::Writer<W>,
    cells: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    writer
        .write_record(cells)
        .map_err(|e| Error::OperationFailed {
            operation: "write_csv".to_string(),
            cause: e.to_string(),
        })
}

fn flush<W: Write>(writer: &mut csv::Writer<W>) -> Result<()> {
    writer.flush().map_err(|e| Error::OperationFailed {
        operation: "flush_csv".to_string(),
        cause: e.to_string(),
    })
}
