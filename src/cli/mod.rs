//! CLI command implementations.
//!
//! Each submodule implements one subcommand of the `urldedup` binary. Commands
//! write their results to a caller-supplied writer so they can be exercised
//! without a terminal.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `clean` | Deduplicate the URL column of a CSV file |
//! | `normalize` | Show the normalized form and identity of URLs |
//! | `config` | Print the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Deduplicate posts.csv into posts_deduplicated.csv
//! urldedup clean posts.csv
//!
//! # Stricter similarity, keep a record of what was dropped
//! urldedup clean posts.csv --threshold 0.95 --removed dropped.csv
//!
//! # Inspect a single URL
//! urldedup normalize "https://www.youtube.com/watch?v=XYZ&utm_source=x"
//! ```

mod clean;
mod config;
mod normalize;

pub use clean::CleanCommand;
pub use config::ConfigCommand;
pub use normalize::{NormalizeCommand, NormalizedEntry};

use crate::{Error, Result};
use std::io::Write;

/// Writes command output, mapping I/O failures.
fn emit<W: Write>(out: &mut W, text: &str) -> Result<()> {
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| Error::OperationFailed {
            operation: "write_output".to_string(),
            cause: e.to_string(),
        })
}
