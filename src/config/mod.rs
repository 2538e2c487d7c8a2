//! Configuration management.
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `URLDEDUP_*` environment variables. Command-line flags are applied last by
//! the binary.

use crate::observability::LogFormat;
use crate::services::deduplication::DeduplicationConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for urldedup.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UrlDedupConfig {
    /// Engine tunables.
    pub dedup: DeduplicationConfig,
    /// Input settings.
    pub input: InputSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

/// Input section, shared by the config file and the effective config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// CSV column holding the URLs. Detected from the header when unset.
    pub url_column: Option<String>,
    /// Maximum number of input rows accepted. Unlimited when unset.
    pub max_records: Option<usize>,
}

/// Logging section, shared by the config file and the effective config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// `EnvFilter` directive used when neither `URLDEDUP_LOG` nor `RUST_LOG` is set.
    pub filter: Option<String>,
    /// Log file. Logs go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Deduplication section.
    pub dedup: Option<ConfigFileDedup>,
    /// Input section.
    pub input: Option<InputSettings>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Deduplication section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileDedup {
    /// Similarity threshold.
    pub similarity_threshold: Option<f64>,
    /// Similarity tier toggle.
    pub use_similarity: Option<bool>,
    /// Length-ratio lower bound.
    pub min_length_ratio: Option<f64>,
    /// Length-ratio upper bound.
    pub max_length_ratio: Option<f64>,
}

impl UrlDedupConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the effective configuration.
    ///
    /// An explicit `path` must exist and parse. Without one, the default
    /// locations are searched. Environment overrides are applied in both cases.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: format!("{}: {e}", path.display()),
        })?;

        Self::parse_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config file.
    pub fn parse_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents).map_err(|e| Error::OperationFailed {
            operation: "parse_config_file".to_string(),
            cause: e.to_string(),
        })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/urldedup/` on macOS)
    /// 2. XDG config dir (`~/.config/urldedup/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("urldedup").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("urldedup")
                .join("config.toml"),
        ];

        for candidate in candidates.iter().filter(|p| p.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %candidate.display(), error = %e, "Ignoring config file");
                },
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `UrlDedupConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(dedup) = file.dedup {
            if let Some(v) = dedup.similarity_threshold {
                config.dedup.similarity_threshold = v;
            }
            if let Some(v) = dedup.use_similarity {
                config.dedup.use_similarity = v;
            }
            if let Some(v) = dedup.min_length_ratio {
                config.dedup.min_length_ratio = v;
            }
            if let Some(v) = dedup.max_length_ratio {
                config.dedup.max_length_ratio = v;
            }
        }
        if let Some(input) = file.input {
            config.input = input;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Overrides fields from `URLDEDUP_*` environment variables.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `URLDEDUP_SIMILARITY_THRESHOLD` | `dedup.similarity_threshold` |
    /// | `URLDEDUP_USE_SIMILARITY` | `dedup.use_similarity` |
    /// | `URLDEDUP_URL_COLUMN` | `input.url_column` |
    /// | `URLDEDUP_MAX_RECORDS` | `input.max_records` |
    /// | `URLDEDUP_LOG_FORMAT` | `logging.format` |
    /// | `URLDEDUP_LOG_FILE` | `logging.file` |
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_with(|key| std::env::var(key).ok());
    }

    /// Overrides fields from an arbitrary variable source.
    pub fn apply_overrides_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.dedup.apply_overrides_with(&lookup);

        if let Some(column) = lookup("URLDEDUP_URL_COLUMN").filter(|v| !v.trim().is_empty()) {
            self.input.url_column = Some(column);
        }
        if let Some(max) = lookup("URLDEDUP_MAX_RECORDS").and_then(|v| v.trim().parse().ok()) {
            self.input.max_records = Some(max);
        }
        if let Some(format) = lookup("URLDEDUP_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&format);
        }
        if let Some(file) = lookup("URLDEDUP_LOG_FILE").filter(|v| !v.trim().is_empty()) {
            self.logging.file = Some(PathBuf::from(file));
        }
    }

    /// Rejects a batch larger than `max_records`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `count` exceeds the cap.
    pub fn check_record_count(&self, count: usize) -> Result<()> {
        match self.input.max_records {
            Some(max) if count > max => Err(Error::InvalidInput(format!(
                "input has {count} records, more than max_records = {max}"
            ))),
            _ => Ok(()),
        }
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::OperationFailed {
            operation: "serialize_config".to_string(),
            cause: e.to_string(),
        })
    }

    /// Sets the URL column.
    #[must_use]
    pub fn with_url_column(mut self, column: impl Into<String>) -> Self {
        self.input.url_column = Some(column.into());
        self
    }

    /// Sets the row cap.
    #[must_use]
    pub const fn with_max_records(mut self, max: usize) -> Self {
        self.input.max_records = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_file() {
        let config = UrlDedupConfig::parse_toml(
            r#"
            [dedup]
            similarity_threshold = 0.8
            use_similarity = false

            [input]
            url_column = "Post URL"
            max_records = 5000

            [logging]
            format = "json"
            filter = "urldedup=debug"
            "#,
        )
        .unwrap();

        assert!((config.dedup.similarity_threshold - 0.8).abs() < f64::EPSILON);
        assert!(!config.dedup.use_similarity);
        assert_eq!(config.input.url_column.as_deref(), Some("Post URL"));
        assert_eq!(config.input.max_records, Some(5000));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.filter.as_deref(), Some("urldedup=debug"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = UrlDedupConfig::parse_toml("").unwrap();
        assert_eq!(config, UrlDedupConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        let err = UrlDedupConfig::parse_toml("[dedup\nsimilarity_threshold = ").unwrap_err();
        assert!(matches!(err, Error::OperationFailed { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[input]\nurl_column = \"link\"").unwrap();

        let config = UrlDedupConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.input.url_column.as_deref(), Some("link"));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = UrlDedupConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = UrlDedupConfig::default();
        config.apply_overrides_with(|key| match key {
            "URLDEDUP_URL_COLUMN" => Some("social_url".to_string()),
            "URLDEDUP_MAX_RECORDS" => Some("10".to_string()),
            "URLDEDUP_LOG_FORMAT" => Some("JSON".to_string()),
            "URLDEDUP_SIMILARITY_THRESHOLD" => Some("0.95".to_string()),
            _ => None,
        });

        assert_eq!(config.input.url_column.as_deref(), Some("social_url"));
        assert_eq!(config.input.max_records, Some(10));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!((config.dedup.similarity_threshold - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_check_record_count() {
        let config = UrlDedupConfig::default().with_max_records(2);
        assert!(config.check_record_count(2).is_ok());
        assert!(matches!(
            config.check_record_count(3),
            Err(Error::InvalidInput(_))
        ));
        assert!(UrlDedupConfig::default().check_record_count(usize::MAX).is_ok());
    }

    #[test]
    fn test_rendered_config_parses_back() {
        let config = UrlDedupConfig::default()
            .with_url_column("url")
            .with_max_records(100);
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("similarity_threshold = 0.9"));

        let reparsed = UrlDedupConfig::parse_toml(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }
}
