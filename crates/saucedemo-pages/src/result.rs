//! Result and error types for the page-object layer.
//!
//! Nothing in the core recovers from these: every variant propagates to the
//! test that issued the call and fails it.

use thiserror::Error;

/// Result type for page-object and driver operations
pub type SauceResult<T> = Result<T, SauceError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum SauceError {
    /// An expected condition did not become true within its budget.
    ///
    /// Also the intentional signal of a login that never reached the
    /// inventory screen.
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// What was being waited for
        waited_for: String,
        /// Budget in milliseconds
        ms: u64,
    },

    /// A query assumed an element that is not in the document
    #[error("No element matches selector {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// Rendered text did not have the expected numeric shape
    #[error("Could not parse {what} from {text:?}")]
    Parse {
        /// Kind of value being parsed (price, cart count)
        what: &'static str,
        /// The offending text
        text: String,
    },

    /// Sort option outside `az`, `za`, `lohi`, `hilo`
    #[error("Unknown sort option: {value}")]
    UnknownSortOption {
        /// Value as given
        value: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page-level driver error (evaluation, CDP command)
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Fixture data could not be loaded
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SauceError {
    /// Build a timeout error from a duration budget
    #[must_use]
    pub fn timeout(waited_for: impl Into<String>, budget: std::time::Duration) -> Self {
        Self::Timeout {
            waited_for: waited_for.into(),
            ms: crate::wait::as_millis_u64(budget),
        }
    }

    /// Build an element-not-found error
    #[must_use]
    pub fn not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Whether this error is a timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
