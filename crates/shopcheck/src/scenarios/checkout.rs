//! Checkout from a cart holding the backpack.

use super::cart::signed_in;
use crate::pages::{CartPage, HomePage};
use crate::result::SuiteResult;
use crate::session::Session;
use crate::{verify, verify_eq};

async fn cart_with_backpack(session: &Session) -> SuiteResult<CartPage<'_>> {
    let home = signed_in(session).await?;
    home.add_product_to_cart("Sauce Labs Backpack").await?;
    home.open_cart().await?;
    Ok(CartPage::attach(session))
}

async fn reach_overview(cart: &CartPage<'_>) -> SuiteResult<()> {
    cart.checkout().await?;
    cart.fill_checkout_information("John", "Doe", "12345").await?;
    cart.continue_checkout().await
}

pub(super) async fn successful_checkout(session: &Session) -> SuiteResult<()> {
    let cart = cart_with_backpack(session).await?;
    verify!(cart.item_count().await? > 0, "Cart should have items");

    reach_overview(&cart).await?;
    verify!(
        cart.subtotal().await?.contains("Item total:"),
        "Subtotal not displayed"
    );
    verify!(cart.tax().await?.contains("Tax:"), "Tax not displayed");
    verify!(cart.total().await?.contains("Total:"), "Total not displayed");

    cart.finish().await?;
    verify!(cart.is_checkout_complete().await, "Checkout not completed");
    let header = cart.complete_header().await?;
    verify!(
        header.contains("Thank you for your order"),
        "Success message not displayed: {header}"
    );
    Ok(())
}

/// Labels of the checkout information fields, in form order
const FIELD_LABELS: [&str; 3] = ["First Name", "Last Name", "Postal Code"];

/// The message reports `missing` as required and mentions no other field
fn names_only(message: &str, missing: &str) -> bool {
    message.contains(&format!("{missing} is required"))
        && FIELD_LABELS
            .iter()
            .filter(|label| **label != missing)
            .all(|label| !message.contains(label))
}

async fn expect_missing_field(
    session: &Session,
    (first_name, last_name, postal_code): (&str, &str, &str),
    missing: &str,
) -> SuiteResult<()> {
    let cart = cart_with_backpack(session).await?;
    cart.checkout().await?;
    cart.fill_checkout_information(first_name, last_name, postal_code)
        .await?;
    cart.continue_checkout().await?;

    let message = cart.checkout_error_message().await?;
    verify!(
        names_only(&message, missing),
        "Error should name only {missing}: {message}"
    );
    Ok(())
}

pub(super) async fn checkout_with_empty_first_name(session: &Session) -> SuiteResult<()> {
    expect_missing_field(session, ("", "Doe", "12345"), "First Name").await
}

pub(super) async fn checkout_with_empty_last_name(session: &Session) -> SuiteResult<()> {
    expect_missing_field(session, ("John", "", "12345"), "Last Name").await
}

pub(super) async fn checkout_with_empty_postal_code(session: &Session) -> SuiteResult<()> {
    expect_missing_field(session, ("John", "Doe", ""), "Postal Code").await
}

pub(super) async fn checkout_with_multiple_items(session: &Session) -> SuiteResult<()> {
    let cart = cart_with_backpack(session).await?;
    cart.continue_shopping().await?;

    let home = HomePage::attach(session);
    home.add_product_to_cart("Sauce Labs Bike Light").await?;
    home.open_cart().await?;
    verify_eq!(cart.item_count().await?, 2, "Should have 2 items");

    reach_overview(&cart).await?;
    verify_eq!(
        cart.item_names().await?.len(),
        2,
        "Overview should show 2 items"
    );

    cart.finish().await?;
    verify!(cart.is_checkout_complete().await, "Checkout not completed");
    Ok(())
}

pub(super) async fn return_to_home_after_checkout(session: &Session) -> SuiteResult<()> {
    let cart = cart_with_backpack(session).await?;
    reach_overview(&cart).await?;
    cart.finish().await?;
    verify!(cart.is_checkout_complete().await, "Checkout not completed");

    cart.back_home().await?;
    let home = HomePage::attach(session);
    verify!(home.is_loaded().await, "Not redirected to home page");
    verify_eq!(
        home.cart_badge_count().await?,
        0,
        "Cart should be empty after checkout"
    );
    Ok(())
}

pub(super) async fn price_calculation_accuracy(session: &Session) -> SuiteResult<()> {
    let cart = cart_with_backpack(session).await?;
    reach_overview(&cart).await?;

    for (label, text) in [
        ("Subtotal", cart.subtotal().await?),
        ("Tax", cart.tax().await?),
        ("Total", cart.total().await?),
    ] {
        verify!(text.contains('$'), "{label} should contain currency: {text}");
    }

    let summary = cart.order_summary().await?;
    tracing::info!(
        subtotal = %summary.subtotal,
        tax = %summary.tax,
        total = %summary.total,
        "Order summary"
    );
    verify_eq!(
        summary.total,
        summary.subtotal + summary.tax,
        "Total calculation incorrect"
    );
    Ok(())
}
