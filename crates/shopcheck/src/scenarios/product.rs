//! Product details and listing order.

use super::cart::signed_in;
use crate::pages::{HomePage, SortOrder};
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use crate::{verify, verify_eq};

pub(super) async fn product_details_match_listing(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    let names = home.product_names().await?;
    let prices = home.product_prices().await?;
    let (Some(name), Some(&price)) = (names.first(), prices.first()) else {
        return Err(SuiteError::assertion("Inventory is empty"));
    };

    let product = home.open_product(name).await?;
    verify_eq!(product.name().await?, *name, "Details show another product");
    verify_eq!(product.price().await?, price, "Details price differs from listing");
    verify!(
        !product.description().await?.trim().is_empty(),
        "Description is empty"
    );
    verify!(product.is_image_displayed().await, "Product image not shown");

    product.back_to_products().await?;
    verify!(
        HomePage::attach(session).is_loaded().await,
        "Not returned to the inventory"
    );
    Ok(())
}

pub(super) async fn add_and_remove_from_details(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    let product = home.open_product("Sauce Labs Bolt T-Shirt").await?;

    product.add_to_cart().await?;
    verify!(
        product.is_remove_button_displayed().await,
        "Remove button not shown after adding"
    );
    verify_eq!(
        HomePage::attach(session).cart_badge_count().await?,
        1,
        "Badge after adding from details"
    );

    product.remove().await?;
    verify!(
        !product.is_remove_button_displayed().await,
        "Remove button still shown after removing"
    );
    verify_eq!(
        HomePage::attach(session).cart_badge_count().await?,
        0,
        "Badge after removing from details"
    );
    Ok(())
}

pub(super) async fn sort_by_price_low_to_high(session: &Session) -> SuiteResult<()> {
    let home = signed_in(session).await?;
    home.sort_products(SortOrder::PriceLowHigh).await?;

    let prices = home.product_prices().await?;
    verify!(!prices.is_empty(), "Inventory is empty");
    verify!(
        prices.windows(2).all(|pair| pair[0] <= pair[1]),
        "Prices not ascending: {prices:?}"
    );
    Ok(())
}
