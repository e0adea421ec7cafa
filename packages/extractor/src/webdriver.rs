//! WebDriver-backed [`TripExtractor`].
//!
//! Each extraction runs in its own browser session against the shared
//! WebDriver endpoint, so concurrent extractions never share a window.
//! The session is always quit before the result is returned.

use async_trait::async_trait;
use thirtyfour::ChromeCapabilities;
use thirtyfour::prelude::*;
use trip_dataset_models::{CityPair, ExtractionFailure, TripResult};

use crate::duration::parse_duration;
use crate::page::{PageElement as _, RoutePage};
use crate::route::route_url;
use crate::{ExtractorError, ExtractorSettings, TripExtractor};

/// Extracts trip durations by driving a Chromium browser through WebDriver.
pub struct WebDriverExtractor {
    settings: ExtractorSettings,
}

impl WebDriverExtractor {
    /// Validates the settings and checks that the WebDriver endpoint can
    /// start a browser.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractorError`] if the routing base URL is unusable or no
    /// browser session can be opened.
    pub async fn connect(settings: ExtractorSettings) -> Result<Self, ExtractorError> {
        route_url(&settings.routing_base_url, "start", "end")?;

        let extractor = Self { settings };
        let caps = extractor.capabilities()?;
        let probe = WebDriver::new(extractor.settings.webdriver_url.as_str(), caps).await?;
        probe.quit().await?;

        log::info!(
            "Connected to WebDriver at {} (headless: {})",
            extractor.settings.webdriver_url,
            extractor.settings.headless
        );

        Ok(extractor)
    }

    fn capabilities(&self) -> WebDriverResult<ChromeCapabilities> {
        let mut caps = DesiredCapabilities::chrome();
        if self.settings.headless {
            caps.add_arg("--headless=new")?;
        }
        for arg in &self.settings.browser_args {
            caps.add_arg(arg)?;
        }
        Ok(caps)
    }

    async fn open_page(&self) -> Result<WebDriver, ExtractionFailure> {
        let caps = self
            .capabilities()
            .map_err(|e| ExtractionFailure::Session(e.to_string()))?;

        WebDriver::new(self.settings.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| ExtractionFailure::Session(e.to_string()))
    }

    /// Finds the element matching `selector`, waiting for it to render if
    /// it is not there yet.
    ///
    /// The element may render before or after we start looking, so a failed
    /// wait is followed by one immediate lookup.
    async fn locate<P: RoutePage>(
        &self,
        page: &P,
        selector: &str,
    ) -> Result<P::Element, ExtractionFailure> {
        let waited = page
            .wait_for(
                selector,
                self.settings.wait_timeout(),
                self.settings.poll_interval(),
            )
            .await;

        match waited {
            Ok(element) => Ok(element),
            Err(e) => {
                log::trace!("Waiting for {selector} failed ({e}), trying direct lookup");
                page.find_now(selector)
                    .await
                    .map_err(|_| ExtractionFailure::SelectorMissing {
                        selector: selector.to_string(),
                    })
            }
        }
    }

    async fn route_duration<P: RoutePage>(
        &self,
        page: &P,
        pair: &CityPair,
    ) -> Result<u32, ExtractionFailure> {
        let url = route_url(
            &self.settings.routing_base_url,
            &pair.start.name,
            &pair.end.name,
        )
        .map_err(|e| ExtractionFailure::Navigation(e.to_string()))?;

        page.open(url.as_str())
            .await
            .map_err(|e| ExtractionFailure::Navigation(e.to_string()))?;

        let drive_mode = self
            .locate(page, &self.settings.drive_mode_selector)
            .await?;
        drive_mode
            .press()
            .await
            .map_err(|e| ExtractionFailure::Interaction(e.to_string()))?;

        let duration = self.locate(page, &self.settings.duration_selector).await?;
        let text = duration
            .read_text()
            .await
            .map_err(|e| ExtractionFailure::Interaction(e.to_string()))?;

        log::trace!(
            "{} -> {}: duration text {text:?}",
            pair.start.name,
            pair.end.name
        );

        parse_duration(&text, &self.settings.minutes_token)
    }

    /// Reads the duration for `pair` on `page`, then closes the page
    /// whatever the outcome.
    async fn extract_on<P: RoutePage>(&self, page: P, pair: &CityPair) -> TripResult {
        let outcome = self.route_duration(&page, pair).await;

        if let Err(e) = page.close().await {
            log::warn!(
                "Failed to close page for {} -> {}: {e}",
                pair.start.name,
                pair.end.name
            );
        }

        TripResult {
            pair: pair.clone(),
            outcome,
        }
    }
}

#[async_trait]
impl TripExtractor for WebDriverExtractor {
    async fn extract(&self, pair: &CityPair) -> TripResult {
        let page = match self.open_page().await {
            Ok(page) => page,
            Err(failure) => return TripResult::failure(pair.clone(), failure),
        };

        self.extract_on(page, pair).await
    }

    async fn close(&self) {
        log::debug!(
            "Releasing WebDriver endpoint {}",
            self.settings.webdriver_url
        );
    }
}
