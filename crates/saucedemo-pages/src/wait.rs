//! Wait primitives shared by drivers and page objects.
//!
//! Every suspension point in the suite carries a budget. When the budget runs
//! out the operation fails with [`SauceError::Timeout`]; nothing retries.

use crate::result::{SauceError, SauceResult};
use std::future::Future;
use std::time::Duration;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default budget for element waits (5 seconds)
pub const DEFAULT_ELEMENT_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Budget for the login → inventory transition
pub const LOGIN_TRANSITION_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Fixed delay after applying a sort when no settle signal is available
pub const SORT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Network idle threshold (500ms without requests)
pub const NETWORK_IDLE_THRESHOLD: Duration = Duration::from_millis(500);

// =============================================================================
// LOAD STATE
// =============================================================================

/// Page load states (Playwright parity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded` event
    DomContentLoaded,
    /// Wait for network to be idle (no requests for 500ms)
    NetworkIdle,
}

impl LoadState {
    /// Get the event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::NetworkIdle => "networkidle",
        }
    }

    /// Get default timeout for this load state
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        match self {
            Self::Load | Self::DomContentLoaded => Duration::from_millis(30_000),
            Self::NetworkIdle => Duration::from_millis(60_000),
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

// =============================================================================
// ELEMENT STATE
// =============================================================================

/// Element states a selector wait can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WaitState {
    /// Present and rendered with a non-empty box
    #[default]
    Visible,
    /// Absent or not rendered
    Hidden,
    /// Present in the document
    Attached,
    /// Absent from the document
    Detached,
}

impl WaitState {
    /// Whether an element with the given presence/visibility satisfies this state
    #[must_use]
    pub const fn is_satisfied(self, attached: bool, visible: bool) -> bool {
        match self {
            Self::Visible => attached && visible,
            Self::Hidden => !attached || !visible,
            Self::Attached => attached,
            Self::Detached => !attached,
        }
    }

    /// Lowercase name, as used in wait descriptions
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Attached => "attached",
            Self::Detached => "detached",
        }
    }
}

/// Outcome of asking a driver for an observable "rendering settled" signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// The driver observed the document settle
    Observed,
    /// The driver has no such signal; callers fall back to a fixed delay
    Unsupported,
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`
#[must_use]
pub fn as_millis_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

// =============================================================================
// POLLING
// =============================================================================

/// Poll `check` every `interval` until it yields `true` or `budget` elapses.
///
/// The check runs at least once, even with a zero budget. Check errors
/// propagate immediately.
pub async fn poll_until<F, Fut>(
    waited_for: &str,
    budget: Duration,
    interval: Duration,
    mut check: F,
) -> SauceResult<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SauceResult<bool>>,
{
    let deadline = tokio::time::Instant::now() + budget;
    loop {
        if check().await? {
            return Ok(());
        }
        let now = tokio::time::Instant::now();
        if now >= deadline {
            return Err(SauceError::timeout(waited_for, budget));
        }
        tokio::time::sleep(interval.min(deadline - now)).await;
    }
}
