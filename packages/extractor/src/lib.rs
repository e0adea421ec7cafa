#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trip duration extraction.
//!
//! A [`TripExtractor`] turns a [`CityPair`] into a [`TripResult`]. The
//! production implementation, [`webdriver::WebDriverExtractor`], opens a
//! routing page in a WebDriver-controlled browser, switches to the driving
//! mode and reads the duration of the first suggested route.
//!
//! Extraction never fails outright: every problem along the way is folded
//! into the result as an [`ExtractionFailure`](trip_dataset_models::ExtractionFailure).

pub mod duration;
pub mod page;
pub mod route;
pub mod webdriver;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trip_dataset_models::{CityPair, TripResult};

/// Errors raised while setting up an extractor.
///
/// These are startup failures. Per-trip problems are reported through
/// [`TripResult`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    /// The routing base URL cannot have city names appended to it.
    #[error("Invalid routing base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The configured base URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The WebDriver endpoint could not start a browser session.
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),
}

/// Anything that can compute the driving duration for a city pair.
#[async_trait]
pub trait TripExtractor: Send + Sync {
    /// Computes the driving duration between `pair.start` and `pair.end`.
    ///
    /// Implementations must not panic or propagate errors; failures are
    /// returned as a failed [`TripResult`].
    async fn extract(&self, pair: &CityPair) -> TripResult;

    /// Releases the browser once no more extractions will be issued.
    async fn close(&self) {}
}

/// Browser and routing page settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorSettings {
    /// WebDriver endpoint (e.g., a local `chromedriver --port=9515`).
    pub webdriver_url: String,
    /// Run the browser without a window.
    pub headless: bool,
    /// Extra command-line arguments passed to the browser.
    pub browser_args: Vec<String>,
    /// Routing page prefix; start and end city names are appended as path
    /// segments.
    pub routing_base_url: String,
    /// CSS selector of the "drive" travel-mode control.
    pub drive_mode_selector: String,
    /// CSS selector of the first route's duration text.
    pub duration_selector: String,
    /// Unit token that marks a minutes-only duration (e.g., `"45 min"`).
    pub minutes_token: String,
    /// How long to wait for an element to appear, in milliseconds.
    pub wait_timeout_ms: u64,
    /// How often to poll for an element while waiting, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            browser_args: vec![
                "--disable-gpu".to_string(),
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-blink-features=AutomationControlled".to_string(),
            ],
            routing_base_url: "https://www.google.com/maps/dir".to_string(),
            drive_mode_selector: r#"button [aria-label="Voiture"]"#.to_string(),
            duration_selector: r#"[data-trip-index="0"] [jstcache="193"]"#.to_string(),
            minutes_token: "min".to_string(),
            wait_timeout_ms: 30_000,
            poll_interval_ms: 250,
        }
    }
}

impl ExtractorSettings {
    /// Element wait timeout as a [`Duration`].
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    /// Element poll interval as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_french_routing_page() {
        let settings = ExtractorSettings::default();
        assert_eq!(settings.minutes_token, "min");
        assert!(settings.drive_mode_selector.contains("Voiture"));
        assert_eq!(settings.wait_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let settings: ExtractorSettings = toml::from_str(
            r#"
            webdriver_url = "http://localhost:4444"
            headless = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.webdriver_url, "http://localhost:4444");
        assert!(!settings.headless);
        assert_eq!(
            settings.routing_base_url,
            ExtractorSettings::default().routing_base_url
        );
    }
}
