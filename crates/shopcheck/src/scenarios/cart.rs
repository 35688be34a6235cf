//! Adding to and removing from the cart.

use super::{PASSWORD, STANDARD_USER};
use crate::pages::{CartPage, HomePage, LoginPage};
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::{verify, verify_eq};

/// Log in as the standard user and land on the inventory
pub(super) async fn signed_in(session: &Session) -> SuiteResult<HomePage<'_>> {
    LoginPage::open(session)
        .await?
        .login(STANDARD_USER, PASSWORD)
        .await?;
    Ok(HomePage::attach(session))
}

pub(super) async fn add_single_product_to_cart(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    home.add_product_to_cart("Sauce Labs Backpack").await?;

    let badge = home.cart_badge_count().await?;
    verify_eq!(badge, 1, "Expected 1 item in cart, got {badge}");

    home.open_cart().await?;
    let cart = CartPage::attach(session);
    verify_eq!(cart.item_count().await?, 1, "Cart should have 1 item");

    let names = cart.item_names().await?;
    verify!(
        names.iter().any(|n| n == "Sauce Labs Backpack"),
        "Product not found in cart: {names:?}"
    );
    Ok(())
}

pub(super) async fn add_multiple_products_to_cart(session: &Session) -> SuiteResult<()> {
    let products = [
        "Sauce Labs Backpack",
        "Sauce Labs Bike Light",
        "Sauce Labs Bolt T-Shirt",
    ];
    let home = signed_in(session).await?;
    for product in products {
        home.add_product_to_cart(product).await?;
    }

    let badge = home.cart_badge_count().await?;
    verify_eq!(badge, 3, "Expected 3 items in cart, got {badge}");

    home.open_cart().await?;
    let cart = CartPage::attach(session);
    verify_eq!(cart.item_count().await?, 3, "Cart should have 3 items");

    let names = cart.item_names().await?;
    for product in products {
        let copies = names.iter().filter(|n| *n == product).count();
        verify_eq!(copies, 1, "{product} should be in the cart once");
    }
    Ok(())
}

pub(super) async fn remove_product_from_cart(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    home.add_product_to_cart("Sauce Labs Backpack").await?;
    home.add_product_to_cart("Sauce Labs Bike Light").await?;
    home.open_cart().await?;

    let cart = CartPage::attach(session);
    let before = cart.item_count().await?;
    cart.remove_item("Sauce Labs Backpack").await?;
    verify_eq!(
        cart.item_count().await?,
        before.saturating_sub(1),
        "Cart should have 1 item after removal"
    );

    let names = cart.item_names().await?;
    verify!(
        !names.iter().any(|n| n == "Sauce Labs Backpack"),
        "Removed product still in cart"
    );
    verify!(
        names.iter().any(|n| n == "Sauce Labs Bike Light"),
        "Remaining product not in cart"
    );
    Ok(())
}

pub(super) async fn cart_persists_across_pages(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    home.add_product_to_cart("Sauce Labs Backpack").await?;
    let initial = home.cart_badge_count().await?;

    home.open_cart().await?;
    CartPage::attach(session).continue_shopping().await?;

    let after = HomePage::attach(session).cart_badge_count().await?;
    verify_eq!(after, initial, "Cart count changed after navigation");
    Ok(())
}

pub(super) async fn empty_cart_message(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    home.open_cart().await?;

    let cart = CartPage::attach(session);
    verify_eq!(cart.item_count().await?, 0, "Cart should be empty");

    cart.continue_shopping().await?;
    let badge = HomePage::attach(session).cart_badge().await?;
    verify!(badge.is_none(), "Badge should not show when cart is empty");
    Ok(())
}

pub(super) async fn product_prices_in_cart(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    let listed = home.product_prices().await?;
    let Some(&backpack) = listed.first() else {
        return Err(SuiteError::assertion("Inventory shows no prices"));
    };

    home.add_product_to_cart("Sauce Labs Backpack").await?;
    home.open_cart().await?;

    let in_cart = CartPage::attach(session).item_prices().await?;
    verify!(
        in_cart.contains(&backpack),
        "Product price {backpack} doesn't match cart prices {in_cart:?}"
    );
    Ok(())
}
