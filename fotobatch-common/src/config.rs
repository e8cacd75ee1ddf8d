//! Run configuration loading
//!
//! A run is configured by a TOML file plus optional command-line
//! overrides. Resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. TOML config file value
//! 3. Compiled default (fallback)
//!
//! The batch label, collection label and file-extension label are opaque
//! strings substituted verbatim into rendered output; no validation is
//! performed on them beyond presence.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one preparation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Batch identifier, e.g. "2018-03". Appended to every published
    /// document as part of the batch maintenance category.
    pub batch_label: String,
    /// Stem for maintenance categories, e.g. "Media contributed by SMVK".
    pub batch_category_stem: String,
    /// Collection label used in generated filenames.
    pub collection: String,
    /// File-extension label for generated filenames (without dot).
    pub file_extension: String,
    /// Cell delimiter in the source tabular files. Multi-byte characters
    /// are allowed (the source data uses `¤`).
    pub delimiter: char,
    /// Delimiter for list values inside a single cell.
    pub list_delimiter: char,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_label: "2018-03".to_string(),
            batch_category_stem: "Media contributed by SMVK".to_string(),
            collection: "SMVK".to_string(),
            file_extension: "tif".to_string(),
            delimiter: '¤',
            list_delimiter: '|',
        }
    }
}

impl RunConfig {
    /// Load configuration from a TOML file, or defaults when no file is
    /// given. Missing keys fall back to their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                toml::from_str(&contents)
                    .map_err(|e| Error::Config(format!("bad config {}: {}", path.display(), e)))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply a command-line batch label override, if present.
    pub fn with_batch_label(mut self, batch_label: Option<String>) -> Self {
        if let Some(label) = batch_label {
            self.batch_label = label;
        }
        self
    }

    /// The batch maintenance category added to every published document.
    pub fn batch_category(&self) -> String {
        format!("{}: {}", self.batch_category_stem, self.batch_label)
    }

    /// Maintenance category for records whose photo date failed the
    /// shape check. A soft flag: the record still publishes.
    pub fn bad_dates_category(&self) -> String {
        format!("{} (bad dates)", self.batch_category())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file() {
        let config = RunConfig::load(None).unwrap();
        assert_eq!(config.delimiter, '¤');
        assert_eq!(config.list_delimiter, '|');
        assert_eq!(config.batch_category(), "Media contributed by SMVK: 2018-03");
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "batch_label = \"2026-01\"").unwrap();
        writeln!(file, "collection = \"EM\"").unwrap();

        let config = RunConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.batch_label, "2026-01");
        assert_eq!(config.collection, "EM");
        assert_eq!(config.file_extension, "tif");
    }

    #[test]
    fn cli_override_takes_precedence() {
        let config = RunConfig::default().with_batch_label(Some("2026-02".to_string()));
        assert_eq!(config.batch_label, "2026-02");
        assert_eq!(config.bad_dates_category(), "Media contributed by SMVK: 2026-02 (bad dates)");
    }

    #[test]
    fn unreadable_file_is_a_config_error() {
        let err = RunConfig::load(Some(Path::new("/no/such/file.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
