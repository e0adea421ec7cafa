#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City catalog loading and random pair sampling.
//!
//! The catalog is read once at startup from a JSON array of
//! [`CityRecord`]s and never mutated afterwards. [`sampler`] draws city
//! pairs from it.

pub mod sampler;

use std::path::Path;

use trip_dataset_models::CityRecord;

/// Errors that can occur while loading the city catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path of the catalog file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog file is not a JSON array of city records.
    #[error("JSON parse error in {path}: {source}")]
    Json {
        /// Path of the catalog file.
        path: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// The catalog parsed but contains no cities.
    #[error("Catalog {path} contains no cities")]
    Empty {
        /// Path of the catalog file.
        path: String,
    },
}

/// The in-memory list of candidate cities. Always non-empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    cities: Vec<CityRecord>,
}

impl Catalog {
    /// Wraps an already-loaded list of cities.
    ///
    /// Returns `None` if `cities` is empty, since no pair can be sampled
    /// from an empty catalog.
    #[must_use]
    pub fn new(cities: Vec<CityRecord>) -> Option<Self> {
        if cities.is_empty() {
            return None;
        }
        Some(Self { cities })
    }

    /// Number of cities in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// All cities in catalog order.
    #[must_use]
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }
}

/// Reads and parses the city catalog at `path`.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be read, is not a JSON
/// array of city records, or is empty.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let display = path.display().to_string();

    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: display.clone(),
        source,
    })?;

    let cities: Vec<CityRecord> =
        serde_json::from_str(&content).map_err(|source| CatalogError::Json {
            path: display.clone(),
            source,
        })?;

    let catalog = Catalog::new(cities).ok_or(CatalogError::Empty { path: display })?;

    log::info!("Loaded {} cities from {}", catalog.len(), path.display());

    Ok(catalog)
}
