//! Login screen.
//!
//! ```text
//! Unauthenticated ──(valid credentials)──────────────► Authenticated
//!        │
//!        └──(invalid / locked / empty)──► ErrorShown ──(dismiss)──► Unauthenticated
//! ```

use super::{BasePage, PageObject};
use crate::constants::urls;
use crate::driver::PageDriver;
use crate::result::SauceResult;
use crate::url::UrlPattern;
use crate::wait::LOGIN_TRANSITION_TIMEOUT;
use tracing::{debug, info};

/// Element name → selector map of the login screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginSelectors {
    /// Username input
    pub username_input: &'static str,
    /// Password input
    pub password_input: &'static str,
    /// Submit button
    pub login_button: &'static str,
    /// Error banner
    pub error_message: &'static str,
    /// Banner dismiss button
    pub error_button: &'static str,
}

impl LoginSelectors {
    /// Selectors of the live storefront
    pub const DEFAULT: Self = Self {
        username_input: "#user-name",
        password_input: "#password",
        login_button: "#login-button",
        error_message: "[data-test=\"error\"]",
        error_button: ".error-button",
    };
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Page object for the login screen
#[derive(Debug)]
pub struct LoginPage<'a, D: PageDriver + ?Sized> {
    base: BasePage<'a, D>,
    selectors: LoginSelectors,
}

impl<'a, D: PageDriver + ?Sized> LoginPage<'a, D> {
    /// Page object over `driver`
    #[must_use]
    pub const fn new(driver: &'a D) -> Self {
        Self {
            base: BasePage::new(driver),
            selectors: LoginSelectors::DEFAULT,
        }
    }

    /// Selector map in use
    #[must_use]
    pub const fn selectors(&self) -> &LoginSelectors {
        &self.selectors
    }

    /// Navigate to the application root
    pub async fn goto(&self) -> SauceResult<()> {
        self.base.navigate(urls::LOGIN).await
    }

    /// Fill both fields and submit.
    ///
    /// Does not wait for the outcome; observe it with
    /// [`LoginPage::is_login_successful`] or [`LoginPage::is_error_displayed`].
    pub async fn login(&self, username: &str, password: &str) -> SauceResult<()> {
        let driver = self.base.driver();
        driver.fill(self.selectors.username_input, username).await?;
        driver.fill(self.selectors.password_input, password).await?;
        driver.click(self.selectors.login_button).await?;
        info!(username, "login submitted");
        Ok(())
    }

    /// Wait for the inventory screen and report whether the session reached it.
    ///
    /// A login that never transitions fails with `Timeout` after 5 seconds.
    pub async fn is_login_successful(&self) -> SauceResult<bool> {
        self.base
            .driver()
            .wait_for_url(&UrlPattern::glob("**/inventory.html"), LOGIN_TRANSITION_TIMEOUT)
            .await?;
        Ok(self.base.current_url().contains("inventory"))
    }

    /// Wait for the error banner and return its text.
    ///
    /// Only call this when an error is expected; after a successful login it
    /// fails with `Timeout`.
    pub async fn get_error_message(&self) -> SauceResult<String> {
        self.base.wait_for_element(self.selectors.error_message).await?;
        self.base.get_text(self.selectors.error_message).await
    }

    /// Whether the error banner is shown
    pub async fn is_error_displayed(&self) -> SauceResult<bool> {
        self.base.is_visible(self.selectors.error_message).await
    }

    /// Dismiss the error banner if it is shown
    pub async fn clear_error(&self) -> SauceResult<()> {
        if self.base.is_visible(self.selectors.error_button).await? {
            debug!("dismissing login error");
            self.base.driver().click(self.selectors.error_button).await?;
        }
        Ok(())
    }
}

impl<'a, D: PageDriver + ?Sized> std::ops::Deref for LoginPage<'a, D> {
    type Target = BasePage<'a, D>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<'a, D: PageDriver + ?Sized + 'a> PageObject<'a, D> for LoginPage<'a, D> {
    fn base(&self) -> &BasePage<'a, D> {
        &self.base
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern::glob("**/")
    }

    fn page_name(&self) -> &'static str {
        "login"
    }
}
