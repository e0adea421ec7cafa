//! The browser operations an extraction needs.
//!
//! [`RoutePage`] is implemented for a thirtyfour [`WebDriver`] session and
//! [`PageElement`] for its [`WebElement`]s.

use std::time::Duration;

use async_trait::async_trait;
use thirtyfour::prelude::*;

/// Errors raised by a page or one of its elements.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// The WebDriver endpoint reported an error.
    #[error(transparent)]
    WebDriver(#[from] WebDriverError),

    /// The browser failed for a reason outside the WebDriver protocol.
    #[error("{0}")]
    Browser(String),
}

/// An element found on a [`RoutePage`].
#[async_trait]
pub trait PageElement: Send + Sync {
    /// Clicks the element.
    async fn press(&self) -> Result<(), PageError>;

    /// Returns the element's rendered text.
    async fn read_text(&self) -> Result<String, PageError>;
}

/// One open browser page.
#[async_trait]
pub trait RoutePage: Send + Sync + Sized {
    /// Elements found on this page.
    type Element: PageElement;

    /// Navigates to `url`.
    async fn open(&self, url: &str) -> Result<(), PageError>;

    /// Polls for the first element matching the CSS `selector` until
    /// `timeout` elapses.
    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<Self::Element, PageError>;

    /// Looks up the first element matching the CSS `selector` once.
    async fn find_now(&self, selector: &str) -> Result<Self::Element, PageError>;

    /// Closes the page and releases its browser session.
    async fn close(self) -> Result<(), PageError>;
}

#[async_trait]
impl PageElement for WebElement {
    async fn press(&self) -> Result<(), PageError> {
        Ok(self.click().await?)
    }

    async fn read_text(&self) -> Result<String, PageError> {
        Ok(self.text().await?)
    }
}

#[async_trait]
impl RoutePage for WebDriver {
    type Element = WebElement;

    async fn open(&self, url: &str) -> Result<(), PageError> {
        Ok(self.goto(url).await?)
    }

    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
        poll: Duration,
    ) -> Result<WebElement, PageError> {
        Ok(self
            .query(By::Css(selector.to_string()))
            .wait(timeout, poll)
            .first()
            .await?)
    }

    async fn find_now(&self, selector: &str) -> Result<WebElement, PageError> {
        Ok(self.find(By::Css(selector.to_string())).await?)
    }

    async fn close(self) -> Result<(), PageError> {
        Ok(self.quit().await?)
    }
}
