#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City, trip, and extraction outcome types.
//!
//! [`CityRecord`] mirrors one entry of the input city catalog. Sampled
//! cities are projected down to [`City`] and paired into a [`CityPair`].
//! Each extraction attempt produces a [`TripResult`], and successful ones
//! are flattened into a [`TripRecord`] for the output dataset.

use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;

/// A single city as it appears in the input catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    /// Numeric identifier of the city within the catalog.
    pub id: u64,
    /// Administrative department code (e.g., `"01"`, `"2A"`).
    pub department_code: String,
    /// INSEE municipality code.
    pub insee_code: String,
    /// Postal code.
    pub zip_code: String,
    /// Display name, used to build routing URLs.
    pub name: String,
    /// URL-friendly name, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Latitude in degrees (WGS84).
    pub gps_lat: f64,
    /// Longitude in degrees (WGS84).
    pub gps_lng: f64,
}

impl CityRecord {
    /// Projects this record down to the fields carried by a trip.
    #[must_use]
    pub fn to_city(&self) -> City {
        City {
            name: self.name.clone(),
            lat: self.gps_lat,
            lng: self.gps_lng,
        }
    }
}

/// The display name and coordinates of one trip endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

/// Two independently sampled cities. `start` and `end` may be the same city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityPair {
    /// Departure city.
    pub start: City,
    /// Arrival city.
    pub end: City,
}

/// Why an extraction did not produce a duration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum ExtractionFailure {
    /// A browser page could not be opened.
    #[error("could not open browser page: {0}")]
    Session(String),

    /// Navigating to the routing URL failed.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// A required element never appeared on the page.
    #[error("element not found: {selector}")]
    SelectorMissing {
        /// The CSS selector that matched nothing.
        selector: String,
    },

    /// An element was found but clicking it or reading it failed.
    #[error("element interaction failed: {0}")]
    Interaction(String),

    /// The duration text did not follow any known pattern.
    #[error("could not parse duration from {text:?}")]
    Parse {
        /// The raw text read from the page.
        text: String,
    },
}

impl ExtractionFailure {
    /// Short, stable identifier of the failure category, suitable for
    /// tallying (e.g., `"selector_missing"`).
    #[must_use]
    pub fn kind(&self) -> &str {
        self.as_ref()
    }
}

/// The outcome of one extraction attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TripResult {
    /// The city pair that was routed.
    pub pair: CityPair,
    /// Duration in minutes, or the reason it could not be determined.
    pub outcome: Result<u32, ExtractionFailure>,
}

impl TripResult {
    /// Creates a successful result.
    #[must_use]
    pub const fn success(pair: CityPair, minutes: u32) -> Self {
        Self {
            pair,
            outcome: Ok(minutes),
        }
    }

    /// Creates a failed result.
    #[must_use]
    pub const fn failure(pair: CityPair, failure: ExtractionFailure) -> Self {
        Self {
            pair,
            outcome: Err(failure),
        }
    }

    /// Duration in minutes, if the extraction succeeded.
    #[must_use]
    pub fn duration(&self) -> Option<u32> {
        self.outcome.as_ref().ok().copied()
    }

    /// Flattens a successful result into an output row.
    ///
    /// Returns `None` for failed extractions, which are never persisted.
    #[must_use]
    pub fn to_record(&self) -> Option<TripRecord> {
        let duration = self.duration()?;

        Some(TripRecord {
            start_city_name: self.pair.start.name.clone(),
            start_city_lat: self.pair.start.lat,
            start_city_lng: self.pair.start.lng,
            end_city_name: self.pair.end.name.clone(),
            end_city_lat: self.pair.end.lat,
            end_city_lng: self.pair.end.lng,
            duration,
        })
    }
}

/// One element of the output dataset. Field order is the on-disk order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub start_city_name: String,
    pub start_city_lat: f64,
    pub start_city_lng: f64,
    pub end_city_name: String,
    pub end_city_lat: f64,
    pub end_city_lng: f64,
    /// Driving time in whole minutes.
    pub duration: u32,
}
