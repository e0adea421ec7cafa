#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trip dataset generation.
//!
//! Ties the pieces together: load the city catalog, connect the
//! WebDriver-backed extractor, and run the [`driver::BatchDriver`] that
//! appends successful trips to the output dataset.

pub mod config;
pub mod driver;
pub mod progress;

use std::sync::Arc;

use trip_dataset_catalog::{CatalogError, load_catalog};
use trip_dataset_extractor::ExtractorError;
use trip_dataset_extractor::webdriver::WebDriverExtractor;
use trip_dataset_store::StoreError;

use crate::config::{ConfigError, GenerateConfig};
use crate::driver::{BatchDriver, RunSummary};
use crate::progress::ProgressCallback;

/// Errors that abort a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The city catalog could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The browser could not be set up.
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// The dataset writer failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Runs a full generation against a live WebDriver endpoint.
///
/// # Errors
///
/// Returns [`GenerateError`] if the configuration is invalid, the catalog
/// cannot be loaded, no browser session can be opened, or the dataset
/// writer fails.
pub async fn run(
    config: GenerateConfig,
    progress: Arc<dyn ProgressCallback>,
) -> Result<RunSummary, GenerateError> {
    config.validate()?;

    let catalog = load_catalog(&config.input_path)?;
    let extractor = WebDriverExtractor::connect(config.extractor.clone()).await?;

    BatchDriver::new(config, catalog, Arc::new(extractor), progress)
        .run()
        .await
}
