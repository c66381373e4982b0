//! Screen-agnostic helpers shared by every page object.

use crate::driver::{PageDriver, ScreenshotOptions};
use crate::result::SauceResult;
use crate::wait::{as_millis_u64, LoadState, WaitState, DEFAULT_ELEMENT_TIMEOUT};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Directory screenshots land in, relative to the working directory
pub const SCREENSHOT_DIR: &str = "screenshots";

/// `<name>-<timestamp>.png`, with the UTC instant at second granularity and
/// `:` replaced by `-` so the name is valid on every filesystem
#[must_use]
pub fn screenshot_file_name(name: &str, at: DateTime<Utc>) -> String {
    let stamp = at.to_rfc3339_opts(SecondsFormat::Secs, true).replace(':', "-");
    format!("{name}-{stamp}.png")
}

/// Timeout-aware navigation and inspection over a borrowed driver.
///
/// Holds nothing but the driver reference; the session outlives it.
pub struct BasePage<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
}

impl<'a, D: PageDriver + ?Sized> BasePage<'a, D> {
    /// Wrap a driver
    #[must_use]
    pub const fn new(driver: &'a D) -> Self {
        Self { driver }
    }

    /// The underlying driver
    #[must_use]
    pub const fn driver(&self) -> &'a D {
        self.driver
    }

    /// Request navigation to `url`
    pub async fn navigate(&self, url: &str) -> SauceResult<()> {
        debug!(url, "navigate");
        self.driver.navigate(url).await
    }

    /// Wait up to 5 seconds for `selector` to be visible
    pub async fn wait_for_element(&self, selector: &str) -> SauceResult<()> {
        self.wait_for_element_within(selector, DEFAULT_ELEMENT_TIMEOUT).await
    }

    /// Wait up to `timeout` for `selector` to be visible
    pub async fn wait_for_element_within(&self, selector: &str, timeout: Duration) -> SauceResult<()> {
        debug!(selector, timeout_ms = as_millis_u64(timeout), "wait for element");
        self.driver
            .wait_for_selector(selector, WaitState::Visible, timeout)
            .await
    }

    /// Text content of the first match; a node without text reads as `""`
    pub async fn get_text(&self, selector: &str) -> SauceResult<String> {
        Ok(self.driver.text_content(selector).await?.unwrap_or_default())
    }

    /// Whether `selector` is visible; an absent element is not
    pub async fn is_visible(&self, selector: &str) -> SauceResult<bool> {
        self.driver.is_visible(selector).await
    }

    /// Full-page screenshot written under `screenshots/`
    pub async fn take_screenshot(&self, name: &str) -> SauceResult<PathBuf> {
        self.take_screenshot_in(Path::new(SCREENSHOT_DIR), name).await
    }

    /// Full-page screenshot written under `dir`, created when missing
    pub async fn take_screenshot_in(&self, dir: &Path, name: &str) -> SauceResult<PathBuf> {
        let png = self.driver.screenshot(ScreenshotOptions::full_page()).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(screenshot_file_name(name, Utc::now()));
        tokio::fs::write(&path, &png).await?;
        info!(path = %path.display(), bytes = png.len(), "screenshot saved");
        Ok(path)
    }

    /// Current location, without suspending
    #[must_use]
    pub fn current_url(&self) -> String {
        self.driver.url()
    }

    /// Wait until the network has been idle for a quiet window
    pub async fn wait_for_navigation(&self) -> SauceResult<()> {
        self.driver.wait_for_load_state(LoadState::NetworkIdle).await
    }
}

impl<D: PageDriver + ?Sized> Clone for BasePage<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: PageDriver + ?Sized> Copy for BasePage<'_, D> {}

impl<D: PageDriver + ?Sized> fmt::Debug for BasePage<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasePage")
            .field("url", &self.driver.url())
            .finish()
    }
}
