//! PageDriver - the browser capability interface.
//!
//! Page objects never talk to a browser directly. They borrow a
//! [`PageDriver`] for the lifetime of one test and compose its operations.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  LoginPage / InventoryPage   (selector maps + flows)         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  BasePage                    (timeout-aware helpers)         │
//! ├──────────────────────────────────────────────────────────────┤
//! │  PageDriver (trait)                                          │
//! │    ├── ChromiumDriver   CDP via chromiumoxide (`browser`)    │
//! │    └── MockStorefront   in-memory storefront for tests       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! All methods take `&self`: the mutable state lives in the remote document,
//! and implementations use interior mutability for whatever they mirror
//! locally. Every method except [`PageDriver::url`] may suspend.

use crate::result::SauceResult;
use crate::url::UrlPattern;
use crate::wait::{LoadState, Settled, WaitState, DEFAULT_ELEMENT_TIMEOUT, DEFAULT_POLL_INTERVAL};
use async_trait::async_trait;
use std::time::Duration;

/// Default base URL of the storefront under test
pub const DEFAULT_BASE_URL: &str = "https://www.saucedemo.com";

/// Screenshot request options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenshotOptions {
    /// Capture the whole scrollable page instead of the viewport
    pub full_page: bool,
}

impl ScreenshotOptions {
    /// Full-page capture
    #[must_use]
    pub const fn full_page() -> Self {
        Self { full_page: true }
    }
}

/// Abstract driver trait for browser automation
///
/// # Implementations
///
/// - `ChromiumDriver` - uses the chromiumoxide crate (feature `browser`)
/// - `MockStorefront` - in-memory storefront for offline tests
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to `url`; relative URLs resolve against the driver's base URL.
    ///
    /// Completes once the navigation is acknowledged, not necessarily loaded.
    async fn navigate(&self, url: &str) -> SauceResult<()>;

    /// Wait until an element matching `selector` reaches `state`
    async fn wait_for_selector(
        &self,
        selector: &str,
        state: WaitState,
        timeout: Duration,
    ) -> SauceResult<()>;

    /// Text content of the first match; `None` when the node has no text.
    ///
    /// Fails with `ElementNotFound` when nothing matches.
    async fn text_content(&self, selector: &str) -> SauceResult<Option<String>>;

    /// Whether the first match is visible; no match is `false`
    async fn is_visible(&self, selector: &str) -> SauceResult<bool>;

    /// Click the first match, waiting for it to become visible first
    async fn click(&self, selector: &str) -> SauceResult<()>;

    /// Replace the value of an input, waiting for it to become visible first
    async fn fill(&self, selector: &str, value: &str) -> SauceResult<()>;

    /// Select the option with `value` in a `<select>`
    async fn select_option(&self, selector: &str, value: &str) -> SauceResult<()>;

    /// Capture a PNG screenshot
    async fn screenshot(&self, options: ScreenshotOptions) -> SauceResult<Vec<u8>>;

    /// Current location. Never suspends.
    fn url(&self) -> String;

    /// Wait until the current location matches `pattern`
    async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> SauceResult<()>;

    /// Wait until the page reaches `state`
    async fn wait_for_load_state(&self, state: LoadState) -> SauceResult<()>;

    /// Text content of every match, in document order
    async fn all_text_contents(&self, selector: &str) -> SauceResult<Vec<String>>;

    /// Wait for the subtree under `selector` to stop changing.
    ///
    /// Drivers without such a signal return [`Settled::Unsupported`].
    async fn wait_for_settled(&self, selector: &str, timeout: Duration) -> SauceResult<Settled> {
        let _ = (selector, timeout);
        Ok(Settled::Unsupported)
    }

    /// Release the session
    async fn close(&self) -> SauceResult<()> {
        Ok(())
    }
}

/// Session configuration for drivers
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Base URL relative navigations resolve against
    pub base_url: String,
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Timeout for navigation
    pub navigation_timeout: Duration,
    /// Implicit wait inside click/fill
    pub action_timeout: Duration,
    /// Polling interval for waits
    pub poll_interval: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
            navigation_timeout: Duration::from_secs(30),
            action_timeout: DEFAULT_ELEMENT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl DriverConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `SAUCEDEMO_BASE_URL`, `SAUCEDEMO_HEADLESS`,
    /// `CHROMIUM_PATH` and `SAUCEDEMO_NO_SANDBOX`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DriverConfig::from_env`] over an arbitrary variable source
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(base_url) = lookup("SAUCEDEMO_BASE_URL").filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        if let Some(headless) = lookup("SAUCEDEMO_HEADLESS").and_then(|v| parse_flag(&v)) {
            config.headless = headless;
        }
        if let Some(path) = lookup("CHROMIUM_PATH").filter(|v| !v.is_empty()) {
            config.chromium_path = Some(path);
        }
        if lookup("SAUCEDEMO_NO_SANDBOX").and_then(|v| parse_flag(&v)) == Some(true) {
            config.sandbox = false;
        }
        config
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the implicit wait used by click/fill
    #[must_use]
    pub const fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    /// Set navigation timeout
    #[must_use]
    pub const fn with_navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    /// Set the interval between condition checks while waiting
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    mod driver_config_tests {
        use super::*;

        #[test]
        fn test_config_default() {
            let config = DriverConfig::default();
            assert_eq!(config.base_url, "https://www.saucedemo.com");
            assert!(config.headless);
            assert!(config.sandbox);
            assert_eq!(config.action_timeout, Duration::from_secs(5));
        }

        #[test]
        fn test_config_builder() {
            let config = DriverConfig::new()
                .with_base_url("http://127.0.0.1:3000")
                .with_headless(false)
                .with_viewport(800, 600)
                .with_no_sandbox()
                .with_action_timeout(Duration::from_secs(2))
                .with_navigation_timeout(Duration::from_secs(10))
                .with_poll_interval(Duration::from_millis(20));

            assert_eq!(config.base_url, "http://127.0.0.1:3000");
            assert!(!config.headless);
            assert_eq!(config.viewport_width, 800);
            assert_eq!(config.viewport_height, 600);
            assert!(!config.sandbox);
            assert_eq!(config.action_timeout, Duration::from_secs(2));
            assert_eq!(config.navigation_timeout, Duration::from_secs(10));
            assert_eq!(config.poll_interval, Duration::from_millis(20));
        }

        #[test]
        fn test_default_poll_interval() {
            assert_eq!(DriverConfig::new().poll_interval, DEFAULT_POLL_INTERVAL);
        }

        #[test]
        fn test_config_from_lookup() {
            let vars: HashMap<&str, &str> = [
                ("SAUCEDEMO_BASE_URL", "http://localhost:8080"),
                ("SAUCEDEMO_HEADLESS", "false"),
                ("CHROMIUM_PATH", "/usr/bin/chromium"),
                ("SAUCEDEMO_NO_SANDBOX", "1"),
            ]
            .into_iter()
            .collect();

            let config = DriverConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string()));
            assert_eq!(config.base_url, "http://localhost:8080");
            assert!(!config.headless);
            assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
            assert!(!config.sandbox);
        }

        #[test]
        fn test_config_from_lookup_ignores_garbage() {
            let config = DriverConfig::from_lookup(|k| match k {
                "SAUCEDEMO_HEADLESS" => Some("maybe".to_string()),
                "SAUCEDEMO_BASE_URL" => Some(String::new()),
                _ => None,
            });
            assert!(config.headless);
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
        }

        #[test]
        fn test_screenshot_options() {
            assert!(ScreenshotOptions::full_page().full_page);
            assert!(!ScreenshotOptions::default().full_page);
        }
    }
}
