//! Registered end-to-end scenarios.
//!
//! Every scenario is a plain async function over a [`Session`]. The catalog
//! pairs each one with its suite and name so the runner can list, filter and
//! execute them through [`TestFixture`](crate::TestFixture).

use crate::result::SuiteResult;
use crate::session::Session;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;

mod cart;
mod checkout;
mod login;
mod product;

/// Account with full access
pub const STANDARD_USER: &str = "standard_user";
/// Account the storefront refuses
pub const LOCKED_OUT_USER: &str = "locked_out_user";
/// Password shared by the demo accounts
pub const PASSWORD: &str = "secret_sauce";

/// Boxed scenario body, accepted by [`TestFixture::run`](crate::TestFixture::run)
pub type ScenarioFn = for<'s> fn(&'s Session) -> BoxFuture<'s, SuiteResult<()>>;

/// One registered scenario
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Group the scenario belongs to (`login`, `cart`, ...)
    pub suite: &'static str,
    /// Unique name, also used for failure screenshots
    pub name: &'static str,
    /// One-line description
    pub summary: &'static str,
    /// Scenario body
    pub run: ScenarioFn,
}

impl Scenario {
    /// `suite::name`
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}::{}", self.suite, self.name)
    }

    /// Whether `pattern` is a substring of [`Scenario::id`]
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        self.id().contains(pattern)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

macro_rules! scenario {
    ($suite:ident :: $name:ident, $summary:literal) => {
        Scenario {
            suite: stringify!($suite),
            name: stringify!($name),
            summary: $summary,
            run: |session| $suite::$name(session).boxed(),
        }
    };
}

/// Every scenario, grouped by suite
#[must_use]
pub fn catalog() -> Vec<Scenario> {
    vec![
        scenario!(login::successful_login, "Valid credentials reach the inventory"),
        scenario!(login::login_with_invalid_username, "Unknown user is rejected"),
        scenario!(login::login_with_invalid_password, "Wrong password is rejected"),
        scenario!(login::login_with_empty_credentials, "Empty form asks for a username"),
        scenario!(login::login_with_locked_user, "Locked account is refused"),
        scenario!(login::logout, "Logout returns to the login form"),
        scenario!(login::dismiss_login_error, "Error banner can be closed"),
        scenario!(cart::add_single_product_to_cart, "One product shows in badge and cart"),
        scenario!(cart::add_multiple_products_to_cart, "Three products show in badge and cart"),
        scenario!(cart::remove_product_from_cart, "Removing drops exactly that product"),
        scenario!(cart::cart_persists_across_pages, "Badge survives a cart round trip"),
        scenario!(cart::empty_cart_message, "Empty cart has no rows and no badge"),
        scenario!(cart::product_prices_in_cart, "Cart shows the listing price"),
        scenario!(checkout::successful_checkout, "Single item checkout completes"),
        scenario!(checkout::checkout_with_empty_first_name, "Missing first name is reported"),
        scenario!(checkout::checkout_with_empty_last_name, "Missing last name is reported"),
        scenario!(checkout::checkout_with_empty_postal_code, "Missing postal code is reported"),
        scenario!(checkout::checkout_with_multiple_items, "Two item checkout completes"),
        scenario!(checkout::return_to_home_after_checkout, "Back Home shows an empty cart"),
        scenario!(checkout::price_calculation_accuracy, "Total equals subtotal plus tax"),
        scenario!(product::product_details_match_listing, "Details view matches the listing"),
        scenario!(product::add_and_remove_from_details, "Details view toggles the cart"),
        scenario!(product::sort_by_price_low_to_high, "Price sort orders the listing"),
    ]
}

/// Scenarios whose id contains `filter`, or all of them
#[must_use]
pub fn select(filter: Option<&str>) -> Vec<Scenario> {
    let all = catalog();
    match filter {
        Some(pattern) => all.into_iter().filter(|s| s.matches(pattern)).collect(),
        None => all,
    }
}
