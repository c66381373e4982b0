//! saucedemo-pages: Page objects for end-to-end tests of the Sauce Labs demo
//! storefront.
//!
//! Tests drive the storefront through page objects ([`LoginPage`],
//! [`InventoryPage`]) that hold selector maps and compose operations of a
//! [`PageDriver`]. Two drivers ship with the crate: [`MockStorefront`], an
//! in-memory model for offline runs, and `ChromiumDriver` (feature
//! `browser`), a real Chromium session over CDP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │   ┌────────────┐    ┌────────────┐    ┌────────────────────┐    │
//! │   │ Test       │    │ Page       │    │ PageDriver         │    │
//! │   │ (tokio)    │───►│ objects    │───►│  ├ MockStorefront  │    │
//! │   │ + Users    │    │ + BasePage │    │  └ ChromiumDriver  │    │
//! │   └────────────┘    └────────────┘    └────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

#[cfg(feature = "browser")]
mod chromium;
pub mod constants;
mod driver;
mod fixtures;
pub mod logging;
pub mod mock;
pub mod pages;
mod result;
mod selector;
mod url;
mod wait;

#[cfg(feature = "browser")]
pub use chromium::{ChromiumDriver, SETTLE_QUIET_WINDOW};
pub use driver::{DriverConfig, PageDriver, ScreenshotOptions, DEFAULT_BASE_URL};
pub use fixtures::{Credentials, Users, USERS_FILE_ENV};
pub use logging::init_tracing;
pub use mock::{MockStorefront, Product};
pub use pages::{
    parse_price, screenshot_file_name, BasePage, InventoryPage, InventorySelectors, LoginPage,
    LoginSelectors, PageObject, SortOption, SCREENSHOT_DIR,
};
pub use result::{SauceError, SauceResult};
pub use selector::Selector;
pub use url::{resolve_url, url_path, UrlPattern};
pub use wait::{
    poll_until, LoadState, Settled, WaitState, DEFAULT_ELEMENT_TIMEOUT, DEFAULT_POLL_INTERVAL,
    LOGIN_TRANSITION_TIMEOUT, NETWORK_IDLE_THRESHOLD, SORT_SETTLE_DELAY,
};

/// Everything a suite needs in one import
pub mod prelude {
    #[cfg(feature = "browser")]
    pub use super::chromium::ChromiumDriver;
    pub use super::constants::{error_messages, success_messages, timeouts, urls};
    pub use super::driver::*;
    pub use super::fixtures::*;
    pub use super::logging::init_tracing;
    pub use super::mock::MockStorefront;
    pub use super::pages::*;
    pub use super::result::*;
    pub use super::url::UrlPattern;
    pub use super::wait::{LoadState, Settled, WaitState};
}
