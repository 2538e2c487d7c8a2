//! Config CLI command.

use crate::Result;
use crate::config::UrlDedupConfig;
use std::io::Write;

use super::emit;

/// Config command handler.
pub struct ConfigCommand;

impl ConfigCommand {
    /// Creates a new config command.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Writes the effective configuration to `out` as TOML.
    ///
    /// The output is a valid config file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn execute<W: Write>(&self, config: &UrlDedupConfig, out: &mut W) -> Result<()> {
        emit(out, &config.to_toml()?)
    }
}

impl Default for ConfigCommand {
    fn default() -> Self {
        Self::new()
    }
}
