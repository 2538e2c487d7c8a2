//! Tabular input and report output.
//!
//! The engine itself never touches files. This module moves data between CSV
//! files and [`RawRecord`](crate::models::RawRecord)s and renders run summaries.
//!
//! # Outputs
//!
//! | Output | Contents |
//! |--------|----------|
//! | Kept rows | Original header and the rows that survived, in input order |
//! | Removed rows | Original header plus `_duplicate_type` and `_duplicate_of` |
//! | Summary | Totals, breakdown, platforms, and settings as text or JSON |

mod report;
mod table;

pub use report::{DedupSummary, ReportFormat, SummaryConfiguration};
pub use table::{
    CsvTable, DUPLICATE_OF_COLUMN, DUPLICATE_TYPE_COLUMN, URL_COLUMN_PATTERN, detect_url_column,
};

use crate::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Creates (or truncates) an output file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
pub fn create_output(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
            operation: "create_output_dir".to_string(),
            cause: format!("{}: {e}", parent.display()),
        })?;
    }

    File::create(path).map_err(|e| Error::OperationFailed {
        operation: "create_output".to_string(),
        cause: format!("{}: {e}", path.display()),
    })
}

/// Default path for the kept rows: `<stem>_deduplicated.csv` next to `input`.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use urldedup::io::default_output_path;
///
/// assert_eq!(
///     default_output_path(Path::new("data/posts.csv")),
///     Path::new("data/posts_deduplicated.csv"),
/// );
/// ```
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_deduplicated.csv"))
}
