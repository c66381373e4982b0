//! Product listing, cart badge, sorting and the side menu.

use super::{BasePage, PageObject};
use crate::constants::urls;
use crate::driver::PageDriver;
use crate::result::{SauceError, SauceResult};
use crate::url::UrlPattern;
use crate::wait::{as_millis_u64, Settled, DEFAULT_ELEMENT_TIMEOUT, SORT_SETTLE_DELAY};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

fn add_to_cart_xpath(name: &str) -> String {
    format!(
        "//div[text()='{name}']/ancestor::div[@class='inventory_item']//button[contains(@class,'btn_inventory')]"
    )
}

fn remove_from_cart_xpath(name: &str) -> String {
    format!(
        "//div[text()='{name}']/ancestor::div[@class='inventory_item']//button[contains(text(),'Remove')]"
    )
}

/// Element name → selector map of the inventory screen.
///
/// The per-product buttons are templates: the product name is interpolated
/// verbatim into an exact-text XPath match, so a name differing in case or
/// whitespace resolves to nothing.
#[derive(Debug, Clone, Copy)]
pub struct InventorySelectors {
    /// Product grid
    pub inventory_container: &'static str,
    /// One product card
    pub inventory_item: &'static str,
    /// Product title
    pub item_name: &'static str,
    /// Product price label
    pub item_price: &'static str,
    /// Product blurb
    pub item_description: &'static str,
    /// Item count on the cart icon
    pub cart_badge: &'static str,
    /// Cart icon
    pub cart_link: &'static str,
    /// Sort `<select>`
    pub sort_dropdown: &'static str,
    /// Side menu toggle
    pub burger_menu: &'static str,
    /// Side menu logout entry
    pub logout_link: &'static str,
    /// Add-to-cart button of the named product
    pub add_to_cart_button: fn(&str) -> String,
    /// Remove button of the named product
    pub remove_from_cart_button: fn(&str) -> String,
}

impl InventorySelectors {
    /// Selectors of the live storefront
    pub const DEFAULT: Self = Self {
        inventory_container: ".inventory_container",
        inventory_item: ".inventory_item",
        item_name: ".inventory_item_name",
        item_price: ".inventory_item_price",
        item_description: ".inventory_item_desc",
        cart_badge: ".shopping_cart_badge",
        cart_link: ".shopping_cart_link",
        sort_dropdown: ".product_sort_container",
        burger_menu: "#react-burger-menu-btn",
        logout_link: "#logout_sidebar_link",
        add_to_cart_button: add_to_cart_xpath,
        remove_from_cart_button: remove_from_cart_xpath,
    };
}

impl Default for InventorySelectors {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Product ordering offered by the sort control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOption {
    /// Name (A to Z)
    Az,
    /// Name (Z to A)
    Za,
    /// Price (low to high)
    LoHi,
    /// Price (high to low)
    HiLo,
}

impl SortOption {
    /// Every option, in the order the control lists them
    pub const ALL: [Self; 4] = [Self::Az, Self::Za, Self::LoHi, Self::HiLo];

    /// `<option>` value
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::Az => "az",
            Self::Za => "za",
            Self::LoHi => "lohi",
            Self::HiLo => "hilo",
        }
    }
}

impl FromStr for SortOption {
    type Err = SauceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|option| option.value() == s)
            .ok_or_else(|| SauceError::UnknownSortOption { value: s.to_string() })
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Parse a rendered price label such as `"$29.99"`
pub fn parse_price(text: &str) -> SauceResult<f64> {
    let stripped = text.replace('$', "");
    stripped
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| SauceError::Parse {
            what: "price",
            text: text.to_string(),
        })
}

fn parse_cart_count(text: &str) -> SauceResult<u32> {
    text.trim().parse().map_err(|_| SauceError::Parse {
        what: "cart count",
        text: text.to_string(),
    })
}

/// Page object for the product listing
#[derive(Debug)]
pub struct InventoryPage<'a, D: PageDriver + ?Sized> {
    base: BasePage<'a, D>,
    selectors: InventorySelectors,
}

impl<'a, D: PageDriver + ?Sized> InventoryPage<'a, D> {
    /// Page object over `driver`
    #[must_use]
    pub const fn new(driver: &'a D) -> Self {
        Self {
            base: BasePage::new(driver),
            selectors: InventorySelectors::DEFAULT,
        }
    }

    /// Selector map in use
    #[must_use]
    pub const fn selectors(&self) -> &InventorySelectors {
        &self.selectors
    }

    /// Wait for the product grid to be visible
    pub async fn wait_for_page_load(&self) -> SauceResult<()> {
        self.base.wait_for_element(self.selectors.inventory_container).await
    }

    /// Product titles in display order
    pub async fn get_all_product_names(&self) -> SauceResult<Vec<String>> {
        self.wait_for_page_load().await?;
        self.base.driver().all_text_contents(self.selectors.item_name).await
    }

    /// Product prices in display order
    pub async fn get_all_product_prices(&self) -> SauceResult<Vec<f64>> {
        self.wait_for_page_load().await?;
        let labels = self.base.driver().all_text_contents(self.selectors.item_price).await?;
        labels.iter().map(|label| parse_price(label)).collect()
    }

    /// Product blurbs in display order
    pub async fn get_all_product_descriptions(&self) -> SauceResult<Vec<String>> {
        self.wait_for_page_load().await?;
        self.base
            .driver()
            .all_text_contents(self.selectors.item_description)
            .await
    }

    /// Click the add-to-cart button of the product titled exactly `name`
    pub async fn add_product_to_cart(&self, name: &str) -> SauceResult<()> {
        debug!(product = name, "add to cart");
        self.base
            .driver()
            .click(&(self.selectors.add_to_cart_button)(name))
            .await
    }

    /// Click the remove button of the product titled exactly `name`
    pub async fn remove_product_from_cart(&self, name: &str) -> SauceResult<()> {
        debug!(product = name, "remove from cart");
        self.base
            .driver()
            .click(&(self.selectors.remove_from_cart_button)(name))
            .await
    }

    /// Number on the cart badge; 0 while the badge is hidden
    pub async fn get_cart_items_count(&self) -> SauceResult<u32> {
        if !self.is_cart_badge_visible().await? {
            return Ok(0);
        }
        let text = self.base.get_text(self.selectors.cart_badge).await?;
        parse_cart_count(&text)
    }

    /// Whether the cart badge is shown
    pub async fn is_cart_badge_visible(&self) -> SauceResult<bool> {
        self.base.is_visible(self.selectors.cart_badge).await
    }

    /// Open the cart
    pub async fn go_to_cart(&self) -> SauceResult<()> {
        debug!("go to cart");
        self.base.driver().click(self.selectors.cart_link).await
    }

    /// Reorder the grid and wait for it to settle.
    ///
    /// Uses the driver's settle signal when it has one, a fixed 500 ms pause
    /// otherwise.
    pub async fn sort_products(&self, option: SortOption) -> SauceResult<()> {
        let driver = self.base.driver();
        debug!(sort = %option, "sort products");
        driver
            .select_option(self.selectors.sort_dropdown, option.value())
            .await?;
        match driver
            .wait_for_settled(self.selectors.inventory_container, DEFAULT_ELEMENT_TIMEOUT)
            .await?
        {
            Settled::Observed => {}
            Settled::Unsupported => {
                warn!(
                    delay_ms = as_millis_u64(SORT_SETTLE_DELAY),
                    "driver has no settle signal, pausing after sort"
                );
                tokio::time::sleep(SORT_SETTLE_DELAY).await;
            }
        }
        Ok(())
    }

    /// Open the side menu and log out
    pub async fn logout(&self) -> SauceResult<()> {
        let driver = self.base.driver();
        driver.click(self.selectors.burger_menu).await?;
        self.base.wait_for_element(self.selectors.logout_link).await?;
        driver.click(self.selectors.logout_link).await?;
        info!("logged out");
        Ok(())
    }

    /// Whether the location is the inventory screen. Never suspends.
    #[must_use]
    pub fn is_on_inventory_page(&self) -> bool {
        self.base.current_url().contains(urls::INVENTORY)
    }
}

impl<'a, D: PageDriver + ?Sized> std::ops::Deref for InventoryPage<'a, D> {
    type Target = BasePage<'a, D>;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl<'a, D: PageDriver + ?Sized + 'a> PageObject<'a, D> for InventoryPage<'a, D> {
    fn base(&self) -> &BasePage<'a, D> {
        &self.base
    }

    fn url_pattern(&self) -> UrlPattern {
        UrlPattern::glob("**/inventory.html")
    }

    fn page_name(&self) -> &'static str {
        "inventory"
    }
}
