//! Inventory suite against the in-memory storefront: listing, cart badge,
//! sorting, cart navigation and logout.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use saucedemo_pages::prelude::*;

async fn signed_in(driver: &MockStorefront) -> InventoryPage<'_, MockStorefront> {
    init_tracing();
    let users = Users::global().unwrap();
    let login = LoginPage::new(driver);
    login.goto().await.unwrap();
    login
        .login(&users.valid_user.username, &users.valid_user.password)
        .await
        .unwrap();
    assert!(login.is_login_successful().await.unwrap());

    let inventory = InventoryPage::new(driver);
    inventory.wait_for_page_load().await.unwrap();
    inventory
}

fn is_sorted_by<T>(items: &[T], ordered: impl Fn(&T, &T) -> bool) -> bool {
    items.windows(2).all(|w| ordered(&w[0], &w[1]))
}

// ============================================================================
// Listing
// ============================================================================

#[tokio::test]
async fn test_lists_six_products() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;

    let names = inventory.get_all_product_names().await.unwrap();

    assert_eq!(names.len(), 6);
    assert!(names.iter().any(|n| n == "Sauce Labs Backpack"));
    assert!(names.iter().any(|n| n == "Sauce Labs Bike Light"));
}

#[tokio::test]
async fn test_prices_and_descriptions_line_up_with_names() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;

    let names = inventory.get_all_product_names().await.unwrap();
    let prices = inventory.get_all_product_prices().await.unwrap();
    let descriptions = inventory.get_all_product_descriptions().await.unwrap();

    assert_eq!(prices.len(), names.len());
    assert_eq!(descriptions.len(), names.len());
    assert!(prices.iter().all(|p| *p > 0.0));
    let backpack = names.iter().position(|n| n == "Sauce Labs Backpack").unwrap();
    assert!((prices[backpack] - 29.99).abs() < 1e-9);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_then_remove_backpack() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;

    inventory.add_product_to_cart("Sauce Labs Backpack").await.unwrap();
    assert_eq!(inventory.get_cart_items_count().await.unwrap(), 1);

    inventory
        .remove_product_from_cart("Sauce Labs Backpack")
        .await
        .unwrap();
    assert!(!inventory.is_cart_badge_visible().await.unwrap());
    assert_eq!(inventory.get_cart_items_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_add_three_products() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;

    for name in ["Sauce Labs Backpack", "Sauce Labs Bike Light", "Sauce Labs Onesie"] {
        inventory.add_product_to_cart(name).await.unwrap();
    }

    assert_eq!(inventory.get_cart_items_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_go_to_cart() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;
    inventory.add_product_to_cart("Sauce Labs Bolt T-Shirt").await.unwrap();

    inventory.go_to_cart().await.unwrap();

    assert!(inventory.current_url().contains(urls::CART));
    assert!(!inventory.is_on_inventory_page());
    assert_eq!(inventory.get_cart_items_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_product_name_match_is_exact() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;

    let err = inventory
        .add_product_to_cart("sauce labs backpack")
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "{err}");
    assert_eq!(inventory.get_cart_items_count().await.unwrap(), 0);
}

// ============================================================================
// Sorting
// ============================================================================

#[tokio::test]
async fn test_sort_by_name() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;
    let listed = inventory.get_all_product_names().await.unwrap();
    assert_eq!(listed.len(), 6);
    let mut expected = listed.clone();
    expected.sort();

    inventory.sort_products(SortOption::Az).await.unwrap();
    let ascending = inventory.get_all_product_names().await.unwrap();
    assert_eq!(ascending, expected);

    inventory.sort_products(SortOption::Za).await.unwrap();
    let descending = inventory.get_all_product_names().await.unwrap();
    assert!(is_sorted_by(&descending, |a, b| a >= b));
    let mut same_set = descending.clone();
    same_set.sort();
    assert_eq!(same_set, expected);
}

#[tokio::test]
async fn test_sort_by_price() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;
    let listed = inventory.get_all_product_prices().await.unwrap();
    assert_eq!(listed.len(), 6);
    let mut expected = listed.clone();
    expected.sort_by(f64::total_cmp);

    inventory.sort_products(SortOption::LoHi).await.unwrap();
    let ascending = inventory.get_all_product_prices().await.unwrap();
    assert_eq!(ascending, expected);

    inventory.sort_products(SortOption::HiLo).await.unwrap();
    let descending = inventory.get_all_product_prices().await.unwrap();
    assert!(is_sorted_by(&descending, |a, b| a >= b));
    let mut same_set = descending.clone();
    same_set.sort_by(f64::total_cmp);
    assert_eq!(same_set, expected);
}

#[tokio::test]
async fn test_sort_option_from_string() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;

    let option: SortOption = "hilo".parse().unwrap();
    inventory.sort_products(option).await.unwrap();
    let prices = inventory.get_all_product_prices().await.unwrap();
    assert!((prices[0] - 49.99).abs() < 1e-9);

    let err = "cheapest".parse::<SortOption>().unwrap_err();
    assert!(matches!(err, SauceError::UnknownSortOption { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_sort_without_settle_signal_still_sorts() {
    let driver = MockStorefront::new().without_settle_signal();
    let inventory = signed_in(&driver).await;

    inventory.sort_products(SortOption::Za).await.unwrap();

    let names = inventory.get_all_product_names().await.unwrap();
    assert_eq!(names.first().map(String::as_str), Some("Test.allTheThings() T-Shirt (Red)"));
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_returns_to_login() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;

    inventory.logout().await.unwrap();

    assert_eq!(inventory.current_url(), "https://www.saucedemo.com/");
    assert!(LoginPage::new(&driver).is_current());
}

#[tokio::test]
async fn test_inventory_requires_session_after_logout() {
    let driver = MockStorefront::new();
    let inventory = signed_in(&driver).await;
    inventory.logout().await.unwrap();

    inventory.navigate(urls::INVENTORY).await.unwrap();

    let login = LoginPage::new(&driver);
    assert!(login.is_error_displayed().await.unwrap());
    assert!(inventory.wait_for_page_load().await.unwrap_err().is_timeout());
}
