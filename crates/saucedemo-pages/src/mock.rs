//! In-memory storefront for offline tests.
//!
//! `MockStorefront` models the parts of the storefront the page objects
//! touch: the login form and its validation, the product grid and its sort
//! control, the cart badge, the side menu and logout. It answers the same
//! selectors the live site does, so page objects run against it unchanged.
//!
//! Waits never sleep: nothing changes the document while a test is
//! suspended, so a condition that does not hold now fails straight away with
//! a `Timeout` carrying the requested budget.

use crate::constants::error_messages;
use crate::driver::{DriverConfig, PageDriver, ScreenshotOptions, DEFAULT_BASE_URL};
use crate::pages::inventory::{parse_price, SortOption};
use crate::result::{SauceError, SauceResult};
use crate::url::{resolve_url, url_path, UrlPattern};
use crate::wait::{LoadState, Settled, WaitState, DEFAULT_ELEMENT_TIMEOUT};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::trace;

const PRODUCT_PREFIX: &str = "//div[text()='";
const ADD_BUTTON_SUFFIX: &str =
    "']/ancestor::div[@class='inventory_item']//button[contains(@class,'btn_inventory')]";
const REMOVE_BUTTON_SUFFIX: &str =
    "']/ancestor::div[@class='inventory_item']//button[contains(text(),'Remove')]";

const STANDARD_PASSWORD: &str = "secret_sauce";
const LOCKED_OUT_USER: &str = "locked_out_user";
const ACCEPTED_USERS: [&str; 6] = [
    "standard_user",
    LOCKED_OUT_USER,
    "problem_user",
    "performance_glitch_user",
    "error_user",
    "visual_user",
];

const DEFAULT_CATALOG: [(&str, &str, &str); 6] = [
    (
        "Sauce Labs Backpack",
        "carry.allTheThings() with the sleek, streamlined Sly Pack that melds uncompromising style with unequaled laptop and tablet protection.",
        "$29.99",
    ),
    (
        "Sauce Labs Bike Light",
        "A red light isn't the desired state in testing but it sure helps when riding your bike at night. Water-resistant with 3 lighting modes, 1 AAA battery included.",
        "$9.99",
    ),
    (
        "Sauce Labs Bolt T-Shirt",
        "Get your testing superhero on with the Sauce Labs bolt T-shirt. From American Apparel, 100% ringspun combed cotton, heather gray with red bolt.",
        "$15.99",
    ),
    (
        "Sauce Labs Fleece Jacket",
        "It's not every day that you come across a midweight quarter-zip fleece jacket capable of handling everything from a relaxing day outdoors to a busy day at the office.",
        "$49.99",
    ),
    (
        "Sauce Labs Onesie",
        "Rib snap infant onesie for the junior automation engineer in development. Reinforced 3-snap bottom closure, two-needle hemmed sleeved and bottom won't unravel.",
        "$7.99",
    ),
    (
        "Test.allTheThings() T-Shirt (Red)",
        "This classic Sauce Labs t-shirt is perfect to wear when cozying up to your keyboard to automate a few tests. Super-soft and comfy ringspun combed cotton.",
        "$15.99",
    ),
];

/// A product card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Title
    pub name: String,
    /// Blurb
    pub description: String,
    /// Price label as rendered, e.g. `$29.99`
    pub price_label: String,
}

impl Product {
    fn new(name: &str, description: &str, price_label: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            price_label: price_label.to_string(),
        }
    }

    /// Numeric price for ordering. `select_option` refuses a price sort
    /// while any label fails to parse, so the fallback never orders a grid.
    fn price_key(&self) -> f64 {
        parse_price(&self.price_label).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Blank,
    Login,
    Inventory,
    Cart,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProductButton {
    AddOrRemove,
    Remove,
}

/// What a selector resolved to
#[derive(Debug, Clone)]
struct Node {
    visible: bool,
    text: String,
}

impl Node {
    fn shown(text: impl Into<String>) -> Self {
        Self {
            visible: true,
            text: text.into(),
        }
    }

    fn hidden(text: impl Into<String>) -> Self {
        Self {
            visible: false,
            text: text.into(),
        }
    }
}

#[derive(Debug)]
struct StoreState {
    url: String,
    user: Option<String>,
    username: String,
    password: String,
    error: Option<String>,
    cart: BTreeSet<String>,
    sort: SortOption,
    menu_open: bool,
    call_history: Vec<String>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            user: None,
            username: String::new(),
            password: String::new(),
            error: None,
            cart: BTreeSet::new(),
            sort: SortOption::Az,
            menu_open: false,
            call_history: Vec::new(),
        }
    }
}

impl StoreState {
    fn screen(&self) -> Screen {
        if self.url == "about:blank" {
            return Screen::Blank;
        }
        match url_path(&self.url) {
            "/" => Screen::Login,
            "/inventory.html" => Screen::Inventory,
            "/cart.html" => Screen::Cart,
            _ => Screen::Other,
        }
    }

    fn record(&mut self, call: String) {
        trace!(call = %call, "mock storefront");
        self.call_history.push(call);
    }

    fn show_login(&mut self, base_url: &str) {
        self.url = resolve_url(base_url, "/");
        self.username.clear();
        self.password.clear();
        self.error = None;
        self.menu_open = false;
    }
}

/// In-memory storefront implementing [`PageDriver`]
#[derive(Debug)]
pub struct MockStorefront {
    base_url: String,
    action_timeout: Duration,
    settle_signal: bool,
    catalog: Vec<Product>,
    state: Mutex<StoreState>,
}

impl Default for MockStorefront {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStorefront {
    /// Bytes returned by every screenshot: the PNG signature
    pub const SCREENSHOT_BYTES: &'static [u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    /// Storefront at the default base URL with the six stock products
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            action_timeout: DEFAULT_ELEMENT_TIMEOUT,
            settle_signal: true,
            catalog: DEFAULT_CATALOG
                .iter()
                .map(|(name, description, price)| Product::new(name, description, price))
                .collect(),
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Storefront using the base URL and action timeout of `config`
    #[must_use]
    pub fn from_config(config: &DriverConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            action_timeout: config.action_timeout,
            ..Self::new()
        }
    }

    /// Replace the products, given as `(name, description, price label)`
    #[must_use]
    pub fn with_catalog(mut self, products: Vec<(&str, &str, &str)>) -> Self {
        self.catalog = products
            .into_iter()
            .map(|(name, description, price)| Product::new(name, description, price))
            .collect();
        self
    }

    /// Report [`Settled::Unsupported`] from `wait_for_settled`
    #[must_use]
    pub const fn without_settle_signal(mut self) -> Self {
        self.settle_signal = false;
        self
    }

    /// Products in catalog order
    #[must_use]
    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    /// Names of the products in the cart
    #[must_use]
    pub fn cart(&self) -> Vec<String> {
        self.state().cart.iter().cloned().collect()
    }

    /// Signed-in username, if any
    #[must_use]
    pub fn signed_in_user(&self) -> Option<String> {
        self.state().user.clone()
    }

    /// Call history for verification
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state().call_history.clone()
    }

    /// Check if a call starting with `method` was made
    #[must_use]
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_history.iter().any(|c| c.starts_with(method))
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sorted_catalog(&self, sort: SortOption) -> Vec<&Product> {
        let mut products: Vec<&Product> = self.catalog.iter().collect();
        match sort {
            SortOption::Az => products.sort_by(|a, b| a.name.cmp(&b.name)),
            SortOption::Za => products.sort_by(|a, b| b.name.cmp(&a.name)),
            SortOption::LoHi => products.sort_by(|a, b| a.price_key().total_cmp(&b.price_key())),
            SortOption::HiLo => products.sort_by(|a, b| b.price_key().total_cmp(&a.price_key())),
        }
        products
    }

    fn product(&self, name: &str) -> Option<&Product> {
        self.catalog.iter().find(|p| p.name == name)
    }

    fn listed_products<'s>(&'s self, state: &StoreState) -> Vec<&'s Product> {
        match state.screen() {
            Screen::Inventory => self.sorted_catalog(state.sort),
            Screen::Cart => state.cart.iter().filter_map(|name| self.product(name)).collect(),
            _ => Vec::new(),
        }
    }

    /// First node matching `selector` on the current screen
    fn resolve(&self, state: &StoreState, selector: &str) -> Option<Node> {
        self.resolve_all(state, selector).into_iter().next()
    }

    /// Every node matching `selector` on the current screen, in document order
    fn resolve_all(&self, state: &StoreState, selector: &str) -> Vec<Node> {
        let screen = state.screen();
        let signed_in_screen = matches!(screen, Screen::Inventory | Screen::Cart);
        let single = |node: Node| vec![node];

        match (screen, selector) {
            (Screen::Login, "#user-name" | "#password" | "#login-button") => single(Node::shown("")),
            (Screen::Login, "[data-test=\"error\"]" | ".error-button") => state
                .error
                .as_ref()
                .map(|message| {
                    if selector == ".error-button" {
                        Node::shown("")
                    } else {
                        Node::shown(message.clone())
                    }
                })
                .into_iter()
                .collect(),
            (Screen::Inventory, ".inventory_container" | ".product_sort_container") => {
                single(Node::shown(""))
            }
            (_, ".shopping_cart_link" | "#react-burger-menu-btn") if signed_in_screen => {
                single(Node::shown(""))
            }
            (_, ".shopping_cart_badge") if signed_in_screen && !state.cart.is_empty() => {
                single(Node::shown(state.cart.len().to_string()))
            }
            (_, "#logout_sidebar_link") if signed_in_screen => {
                let node = if state.menu_open {
                    Node::shown("Logout")
                } else {
                    Node::hidden("Logout")
                };
                single(node)
            }
            (_, ".inventory_item" | ".cart_item") => self
                .listed_products(state)
                .into_iter()
                .map(|p| Node::shown(format!("{}{}{}", p.name, p.description, p.price_label)))
                .collect(),
            (_, ".inventory_item_name") => self
                .listed_products(state)
                .into_iter()
                .map(|p| Node::shown(p.name.clone()))
                .collect(),
            (_, ".inventory_item_desc") => self
                .listed_products(state)
                .into_iter()
                .map(|p| Node::shown(p.description.clone()))
                .collect(),
            (_, ".inventory_item_price") => self
                .listed_products(state)
                .into_iter()
                .map(|p| Node::shown(p.price_label.clone()))
                .collect(),
            (Screen::Inventory, xpath) => match parse_product_button(xpath) {
                Some((button, name)) if self.product(name).is_some() => {
                    let in_cart = state.cart.contains(name);
                    match (button, in_cart) {
                        (ProductButton::AddOrRemove, false) => single(Node::shown("Add to cart")),
                        (_, true) => single(Node::shown("Remove")),
                        (ProductButton::Remove, false) => Vec::new(),
                    }
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn require_visible(&self, state: &StoreState, selector: &str) -> SauceResult<()> {
        match self.resolve(state, selector) {
            Some(node) if node.visible => Ok(()),
            _ => Err(SauceError::timeout(
                format!("'{selector}' to be visible"),
                self.action_timeout,
            )),
        }
    }

    fn submit_login(&self, state: &mut StoreState) {
        let error = if state.username.is_empty() {
            Some(error_messages::REQUIRED_USERNAME)
        } else if state.password.is_empty() {
            Some(error_messages::REQUIRED_PASSWORD)
        } else if !ACCEPTED_USERS.contains(&state.username.as_str()) || state.password != STANDARD_PASSWORD {
            Some(error_messages::INVALID_CREDENTIALS)
        } else if state.username == LOCKED_OUT_USER {
            Some(error_messages::LOCKED_USER)
        } else {
            None
        };

        match error {
            Some(message) => state.error = Some(message.to_string()),
            None => {
                state.user = Some(state.username.clone());
                state.error = None;
                state.menu_open = false;
                state.url = resolve_url(&self.base_url, "/inventory.html");
            }
        }
    }
}

fn parse_product_button(selector: &str) -> Option<(ProductButton, &str)> {
    let rest = selector.strip_prefix(PRODUCT_PREFIX)?;
    if let Some(name) = rest.strip_suffix(ADD_BUTTON_SUFFIX) {
        return Some((ProductButton::AddOrRemove, name));
    }
    rest.strip_suffix(REMOVE_BUTTON_SUFFIX)
        .map(|name| (ProductButton::Remove, name))
}

fn logged_out_error(path: &str) -> String {
    format!("Epic sadface: You can only access '{path}' when you are logged in.")
}

#[async_trait]
impl PageDriver for MockStorefront {
    async fn navigate(&self, url: &str) -> SauceResult<()> {
        let mut state = self.state();
        state.record(format!("navigate:{url}"));

        let target = resolve_url(&self.base_url, url);
        let path = url_path(&target).to_string();
        state.show_login(&self.base_url);
        match path.as_str() {
            "/" => {}
            "/inventory.html" | "/cart.html" if state.user.is_none() => {
                state.error = Some(logged_out_error(&path));
            }
            _ => state.url = target,
        }
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        wait: WaitState,
        timeout: Duration,
    ) -> SauceResult<()> {
        let mut state = self.state();
        state.record(format!("wait_for_selector:{selector}"));
        let node = self.resolve(&state, selector);
        let attached = node.is_some();
        let visible = node.is_some_and(|n| n.visible);
        if wait.is_satisfied(attached, visible) {
            Ok(())
        } else {
            Err(SauceError::timeout(
                format!("'{selector}' to be {}", wait.as_str()),
                timeout,
            ))
        }
    }

    async fn text_content(&self, selector: &str) -> SauceResult<Option<String>> {
        let mut state = self.state();
        state.record(format!("text_content:{selector}"));
        self.resolve(&state, selector)
            .map(|node| Some(node.text))
            .ok_or_else(|| SauceError::not_found(selector))
    }

    async fn is_visible(&self, selector: &str) -> SauceResult<bool> {
        let mut state = self.state();
        state.record(format!("is_visible:{selector}"));
        Ok(self.resolve(&state, selector).is_some_and(|n| n.visible))
    }

    async fn click(&self, selector: &str) -> SauceResult<()> {
        let mut state = self.state();
        state.record(format!("click:{selector}"));
        self.require_visible(&state, selector)?;

        match selector {
            "#login-button" => self.submit_login(&mut state),
            ".error-button" => state.error = None,
            ".shopping_cart_link" => {
                state.menu_open = false;
                state.url = resolve_url(&self.base_url, "/cart.html");
            }
            "#react-burger-menu-btn" => state.menu_open = true,
            "#logout_sidebar_link" => {
                state.user = None;
                state.show_login(&self.base_url);
            }
            xpath => {
                if let Some((button, name)) = parse_product_button(xpath) {
                    let name = name.to_string();
                    if button == ProductButton::AddOrRemove && !state.cart.contains(&name) {
                        state.cart.insert(name);
                    } else {
                        state.cart.remove(&name);
                    }
                }
            }
        }
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str) -> SauceResult<()> {
        let mut state = self.state();
        state.record(format!("fill:{selector}"));
        self.require_visible(&state, selector)?;

        match selector {
            "#user-name" => state.username = value.to_string(),
            "#password" => state.password = value.to_string(),
            other => {
                return Err(SauceError::Page {
                    message: format!("element {other} is not an input"),
                })
            }
        }
        Ok(())
    }

    async fn select_option(&self, selector: &str, value: &str) -> SauceResult<()> {
        let mut state = self.state();
        state.record(format!("select_option:{selector}={value}"));
        self.require_visible(&state, selector)?;

        if selector != ".product_sort_container" {
            return Err(SauceError::Page {
                message: format!("element {selector} is not a <select>"),
            });
        }
        let sort: SortOption = value.parse().map_err(|_| SauceError::Page {
            message: format!("no option with value {value:?} in {selector}"),
        })?;
        if matches!(sort, SortOption::LoHi | SortOption::HiLo) {
            for product in &self.catalog {
                parse_price(&product.price_label)?;
            }
        }
        state.sort = sort;
        Ok(())
    }

    async fn screenshot(&self, options: ScreenshotOptions) -> SauceResult<Vec<u8>> {
        let mode = if options.full_page { "full_page" } else { "viewport" };
        self.state().record(format!("screenshot:{mode}"));
        Ok(Self::SCREENSHOT_BYTES.to_vec())
    }

    fn url(&self) -> String {
        self.state().url.clone()
    }

    async fn wait_for_url(&self, pattern: &UrlPattern, timeout: Duration) -> SauceResult<()> {
        let mut state = self.state();
        state.record(format!("wait_for_url:{pattern}"));
        if pattern.matches(&state.url) {
            Ok(())
        } else {
            Err(SauceError::timeout(format!("URL matching {pattern}"), timeout))
        }
    }

    async fn wait_for_load_state(&self, load: LoadState) -> SauceResult<()> {
        self.state()
            .record(format!("wait_for_load_state:{}", load.event_name()));
        Ok(())
    }

    async fn all_text_contents(&self, selector: &str) -> SauceResult<Vec<String>> {
        let mut state = self.state();
        state.record(format!("all_text_contents:{selector}"));
        Ok(self
            .resolve_all(&state, selector)
            .into_iter()
            .map(|node| node.text)
            .collect())
    }

    async fn wait_for_settled(&self, selector: &str, _timeout: Duration) -> SauceResult<Settled> {
        self.state().record(format!("wait_for_settled:{selector}"));
        Ok(if self.settle_signal {
            Settled::Observed
        } else {
            Settled::Unsupported
        })
    }

    async fn close(&self) -> SauceResult<()> {
        self.state().record("close".to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn signed_in(user: &str) -> MockStorefront {
        sign_in(MockStorefront::new(), user).await
    }

    async fn sign_in(store: MockStorefront, user: &str) -> MockStorefront {
        store.navigate("/").await.unwrap();
        store.fill("#user-name", user).await.unwrap();
        store.fill("#password", STANDARD_PASSWORD).await.unwrap();
        store.click("#login-button").await.unwrap();
        store
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_starts_blank() {
            let store = MockStorefront::new();
            assert_eq!(store.url(), "about:blank");
            assert!(store.history().is_empty());
        }

        #[tokio::test]
        async fn test_inventory_requires_login() {
            let store = MockStorefront::new();
            store.navigate("/inventory.html").await.unwrap();

            assert_eq!(store.url(), "https://www.saucedemo.com/");
            let banner = store.text_content("[data-test=\"error\"]").await.unwrap();
            assert_eq!(
                banner.as_deref(),
                Some("Epic sadface: You can only access '/inventory.html' when you are logged in.")
            );
        }

        #[tokio::test]
        async fn test_session_survives_navigation() {
            let store = signed_in("standard_user").await;
            store.navigate("/cart.html").await.unwrap();
            assert_eq!(store.url(), "https://www.saucedemo.com/cart.html");
            store.navigate("/inventory.html").await.unwrap();
            assert!(store.is_visible(".inventory_container").await.unwrap());
        }

        #[tokio::test]
        async fn test_from_config_uses_base_url() {
            let config = DriverConfig::new().with_base_url("http://localhost:3000");
            let store = MockStorefront::from_config(&config);
            store.navigate("/").await.unwrap();
            assert_eq!(store.url(), "http://localhost:3000/");
        }
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_every_accepted_user_but_locked_signs_in() {
            for user in ACCEPTED_USERS.iter().filter(|u| **u != LOCKED_OUT_USER) {
                let store = signed_in(user).await;
                assert_eq!(store.signed_in_user().as_deref(), Some(*user));
                assert_eq!(url_path(&store.url()), "/inventory.html");
            }
        }

        #[tokio::test]
        async fn test_locked_user_with_wrong_password_is_invalid() {
            let store = MockStorefront::new();
            store.navigate("/").await.unwrap();
            store.fill("#user-name", LOCKED_OUT_USER).await.unwrap();
            store.fill("#password", "nope").await.unwrap();
            store.click("#login-button").await.unwrap();

            let banner = store.text_content("[data-test=\"error\"]").await.unwrap();
            assert_eq!(banner.as_deref(), Some(error_messages::INVALID_CREDENTIALS));
        }

        #[tokio::test]
        async fn test_fill_does_not_record_values() {
            let store = signed_in("standard_user").await;
            assert!(store.history().iter().all(|c| !c.contains(STANDARD_PASSWORD)));
        }
    }

    mod element_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_states() {
            let store = signed_in("standard_user").await;
            let budget = Duration::from_millis(100);

            store
                .wait_for_selector("#logout_sidebar_link", WaitState::Attached, budget)
                .await
                .unwrap();
            store
                .wait_for_selector("#logout_sidebar_link", WaitState::Hidden, budget)
                .await
                .unwrap();
            let err = store
                .wait_for_selector("#logout_sidebar_link", WaitState::Visible, budget)
                .await
                .unwrap_err();
            assert!(matches!(err, SauceError::Timeout { ms: 100, .. }));

            store.click("#react-burger-menu-btn").await.unwrap();
            store
                .wait_for_selector("#logout_sidebar_link", WaitState::Visible, budget)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_click_hidden_element_times_out() {
            let store = signed_in("standard_user").await;
            let err = store.click("#logout_sidebar_link").await.unwrap_err();
            assert!(matches!(err, SauceError::Timeout { ms: 5000, .. }));
            assert!(store.signed_in_user().is_some());
        }

        #[tokio::test]
        async fn test_add_button_toggles_like_the_site() {
            let store = signed_in("standard_user").await;
            let add = format!("{PRODUCT_PREFIX}Sauce Labs Backpack{ADD_BUTTON_SUFFIX}");

            store.click(&add).await.unwrap();
            assert_eq!(store.cart(), ["Sauce Labs Backpack"]);
            assert_eq!(store.text_content(&add).await.unwrap().as_deref(), Some("Remove"));

            store.click(&add).await.unwrap();
            assert!(store.cart().is_empty());
        }

        #[tokio::test]
        async fn test_cart_lists_added_products() {
            let store = signed_in("standard_user").await;
            for name in ["Sauce Labs Onesie", "Sauce Labs Backpack"] {
                store
                    .click(&format!("{PRODUCT_PREFIX}{name}{ADD_BUTTON_SUFFIX}"))
                    .await
                    .unwrap();
            }
            store.click(".shopping_cart_link").await.unwrap();

            let names = store.all_text_contents(".inventory_item_name").await.unwrap();
            assert_eq!(names, ["Sauce Labs Backpack", "Sauce Labs Onesie"]);
        }

        #[tokio::test]
        async fn test_select_unknown_option_fails() {
            let store = signed_in("standard_user").await;
            let err = store
                .select_option(".product_sort_container", "price")
                .await
                .unwrap_err();
            assert!(matches!(err, SauceError::Page { .. }));
        }

        #[tokio::test]
        async fn test_screenshot_modes_recorded() {
            let store = MockStorefront::new();
            store.screenshot(ScreenshotOptions::default()).await.unwrap();
            assert!(store.was_called("screenshot:viewport"));
        }
    }

    mod catalog_tests {
        use super::*;

        #[test]
        fn test_default_catalog() {
            let store = MockStorefront::new();
            assert_eq!(store.catalog().len(), 6);
            assert!(store.catalog().windows(2).all(|w| w[0].name < w[1].name));
        }

        #[test]
        fn test_price_sort_is_stable() {
            let store = MockStorefront::new();
            let names: Vec<_> = store
                .sorted_catalog(SortOption::LoHi)
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            assert_eq!(
                names,
                [
                    "Sauce Labs Onesie",
                    "Sauce Labs Bike Light",
                    "Sauce Labs Bolt T-Shirt",
                    "Test.allTheThings() T-Shirt (Red)",
                    "Sauce Labs Backpack",
                    "Sauce Labs Fleece Jacket",
                ]
            );
        }

        #[tokio::test]
        async fn test_price_sort_rejects_malformed_label() {
            let catalog = vec![("Gift Card", "?", "$abc"), ("Sticker", "?", "$1.00")];
            let store = sign_in(MockStorefront::new().with_catalog(catalog), "standard_user").await;

            let err = store
                .select_option(".product_sort_container", "lohi")
                .await
                .unwrap_err();
            assert!(matches!(err, SauceError::Parse { what: "price", ref text } if text == "$abc"));

            store
                .select_option(".product_sort_container", "za")
                .await
                .unwrap();
            let names = store.all_text_contents(".inventory_item_name").await.unwrap();
            assert_eq!(names, ["Sticker", "Gift Card"]);
        }

        #[test]
        fn test_parse_product_button() {
            let remove = format!("{PRODUCT_PREFIX}X{REMOVE_BUTTON_SUFFIX}");
            assert_eq!(parse_product_button(&remove), Some((ProductButton::Remove, "X")));
            assert_eq!(parse_product_button("#login-button"), None);
        }
    }
}
