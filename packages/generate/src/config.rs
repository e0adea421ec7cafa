//! Run configuration.
//!
//! Values come from, in increasing priority: built-in defaults, an
//! optional TOML file, and command-line overrides applied by the binary.
//!
//! ```toml
//! input_path = "../cities_france.json"
//! output_path = "../trips_france.json"
//! batch_count = 10
//! pairs_per_batch = 3
//!
//! [extractor]
//! webdriver_url = "http://localhost:9515"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use trip_dataset_extractor::ExtractorSettings;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`GenerateConfig`].
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Everything the batch driver needs to know about a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// City catalog to sample from.
    pub input_path: PathBuf,
    /// Dataset file to append trips to.
    pub output_path: PathBuf,
    /// Number of batches to run.
    pub batch_count: usize,
    /// City pairs extracted per batch.
    pub pairs_per_batch: usize,
    /// Maximum extractions in flight at once. Defaults to
    /// `pairs_per_batch`.
    pub concurrency: Option<usize>,
    /// Seed for city pair sampling. A fresh OS seed is used when unset.
    pub seed: Option<u64>,
    /// Browser and routing page settings.
    pub extractor: ExtractorSettings,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("cities_france.json"),
            output_path: PathBuf::from("trips_france.json"),
            batch_count: 10,
            pairs_per_batch: 3,
            concurrency: None,
            seed: None,
            extractor: ExtractorSettings::default(),
        }
    }
}

impl GenerateConfig {
    /// Parses a TOML document. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed or has
    /// values of the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses the TOML config file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Effective number of concurrent extractions.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(self.pairs_per_batch)
    }

    /// Number of extractions the run will attempt.
    #[must_use]
    pub const fn total_attempts(&self) -> usize {
        self.batch_count.saturating_mul(self.pairs_per_batch)
    }

    /// Checks that the run can make progress.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `pairs_per_batch` or
    /// `concurrency` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pairs_per_batch == 0 {
            return Err(ConfigError::Invalid {
                field: "pairs_per_batch",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.concurrency() == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_run_ten_batches_of_three() {
        let config = GenerateConfig::default();
        assert_eq!(config.batch_count, 10);
        assert_eq!(config.pairs_per_batch, 3);
        assert_eq!(config.concurrency(), 3);
        assert_eq!(config.total_attempts(), 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_partial_toml() {
        let config = GenerateConfig::from_toml_str(
            r#"
            input_path = "../cities_france.json"
            batch_count = 4
            concurrency = 2
            seed = 99

            [extractor]
            webdriver_url = "http://localhost:4444"
            "#,
        )
        .unwrap();

        assert_eq!(config.input_path, PathBuf::from("../cities_france.json"));
        assert_eq!(config.output_path, PathBuf::from("trips_france.json"));
        assert_eq!(config.batch_count, 4);
        assert_eq!(config.pairs_per_batch, 3);
        assert_eq!(config.concurrency(), 2);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.extractor.webdriver_url, "http://localhost:4444");
        assert_eq!(config.extractor.minutes_token, "min");
    }

    #[test]
    fn rejects_wrongly_typed_value() {
        let err = GenerateConfig::from_toml_str("batch_count = \"ten\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn rejects_zero_pairs_per_batch() {
        let config = GenerateConfig {
            pairs_per_batch: 0,
            ..GenerateConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "pairs_per_batch",
                ..
            })
        ));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let config = GenerateConfig {
            concurrency: Some(0),
            ..GenerateConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "concurrency",
                ..
            })
        ));
    }
}
