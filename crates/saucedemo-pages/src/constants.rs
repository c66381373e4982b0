//! Known URLs, timeouts and banner strings of the storefront.

/// Paths and base URL
pub mod urls {
    /// Storefront origin
    pub const BASE_URL: &str = "https://www.saucedemo.com";
    /// Login screen
    pub const LOGIN: &str = "/";
    /// Product catalog
    pub const INVENTORY: &str = "/inventory.html";
    /// Shopping cart
    pub const CART: &str = "/cart.html";
    /// Checkout: customer information
    pub const CHECKOUT_STEP_ONE: &str = "/checkout-step-one.html";
    /// Checkout: overview
    pub const CHECKOUT_STEP_TWO: &str = "/checkout-step-two.html";
    /// Checkout: confirmation
    pub const CHECKOUT_COMPLETE: &str = "/checkout-complete.html";
}

/// Timeouts in milliseconds
pub mod timeouts {
    /// Default action budget
    pub const DEFAULT: u64 = 30_000;
    /// Navigation budget
    pub const NAVIGATION: u64 = 30_000;
    /// Short waits (element visibility, login transition)
    pub const SHORT: u64 = 5_000;
    /// Long waits
    pub const LONG: u64 = 60_000;
}

/// Error banner texts on the login screen
pub mod error_messages {
    /// Locked-out account
    pub const LOCKED_USER: &str = "Epic sadface: Sorry, this user has been locked out.";
    /// Unknown user or wrong password
    pub const INVALID_CREDENTIALS: &str =
        "Epic sadface: Username and password do not match any user in this service";
    /// Empty username
    pub const REQUIRED_USERNAME: &str = "Epic sadface: Username is required";
    /// Empty password
    pub const REQUIRED_PASSWORD: &str = "Epic sadface: Password is required";
}

/// Confirmation texts at the end of checkout
pub mod success_messages {
    /// Checkout complete header
    pub const ORDER_COMPLETE: &str = "Thank you for your order!";
    /// Checkout complete body
    pub const ORDER_DISPATCHED: &str = "Your order has been dispatched";
}
