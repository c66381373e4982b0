//! Page Object Model for the storefront.
//!
//! One page object per screen. Each holds a [`BasePage`] (a borrowed driver,
//! nothing else) and an immutable selector map. Nothing read from the
//! document is cached: cart badges, sort order and location all change
//! between calls, so every query goes back to the live page.
//!
//! # Example
//!
//! ```no_run
//! use saucedemo_pages::prelude::*;
//!
//! # async fn run(driver: &MockStorefront) -> SauceResult<()> {
//! let users = Users::global()?;
//! let login = LoginPage::new(driver);
//! let inventory = InventoryPage::new(driver);
//!
//! login.goto().await?;
//! login.login(&users.valid_user.username, &users.valid_user.password).await?;
//! inventory.wait_for_page_load().await?;
//! inventory.add_product_to_cart("Sauce Labs Backpack").await?;
//! assert_eq!(inventory.get_cart_items_count().await?, 1);
//! # Ok(())
//! # }
//! ```

pub mod base;
pub mod inventory;
pub mod login;

pub use base::{screenshot_file_name, BasePage, SCREENSHOT_DIR};
pub use inventory::{parse_price, InventoryPage, InventorySelectors, SortOption};
pub use login::{LoginPage, LoginSelectors};

use crate::driver::PageDriver;
use crate::url::UrlPattern;
use tracing::trace;

/// A screen of the application.
pub trait PageObject<'a, D: PageDriver + ?Sized + 'a> {
    /// Shared navigation/inspection helpers
    fn base(&self) -> &BasePage<'a, D>;

    /// Pattern the location matches while this screen is shown
    fn url_pattern(&self) -> UrlPattern;

    /// Name for logging
    fn page_name(&self) -> &'static str;

    /// Whether the session currently shows this screen
    fn is_current(&self) -> bool {
        let url = self.base().current_url();
        let current = self.url_pattern().matches(&url);
        trace!(page = self.page_name(), url = %url, current, "location check");
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockStorefront;

    fn current_page_name<'a, D: PageDriver + ?Sized + 'a>(
        pages: &[&dyn PageObject<'a, D>],
    ) -> Option<&'static str> {
        pages.iter().find(|p| p.is_current()).map(|p| p.page_name())
    }

    #[test]
    fn test_page_names() {
        let driver = MockStorefront::new();
        assert_eq!(LoginPage::new(&driver).page_name(), "login");
        assert_eq!(InventoryPage::new(&driver).page_name(), "inventory");
    }

    #[tokio::test]
    async fn test_is_current_through_trait_object() {
        let driver = MockStorefront::new();
        let login = LoginPage::new(&driver);
        let inventory = InventoryPage::new(&driver);
        let pages: [&dyn PageObject<'_, MockStorefront>; 2] = [&login, &inventory];

        login.goto().await.unwrap();
        assert_eq!(current_page_name(&pages), Some("login"));

        login.login("standard_user", "secret_sauce").await.unwrap();
        assert_eq!(current_page_name(&pages), Some("inventory"));
    }
}
