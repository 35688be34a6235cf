//! Inventory (home) screen.

use crate::base_page::BasePage;
use crate::locator::{Locator, ProductAction, ProductContainer};
use crate::pages::product::ProductPage;
use crate::price::Price;
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;
use serde::{Deserialize, Serialize};

/// Inventory sort options, by `<option>` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Name (A to Z)
    NameAsc,
    /// Name (Z to A)
    NameDesc,
    /// Price (low to high)
    PriceLowHigh,
    /// Price (high to low)
    PriceHighLow,
}

impl SortOrder {
    /// `<option value>` for this order
    #[must_use]
    pub const fn value(&self) -> &'static str {
        match self {
            Self::NameAsc => "az",
            Self::NameDesc => "za",
            Self::PriceLowHigh => "lohi",
            Self::PriceHighLow => "hilo",
        }
    }

    /// Parse an `<option value>`
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "az" => Some(Self::NameAsc),
            "za" => Some(Self::NameDesc),
            "lohi" => Some(Self::PriceLowHigh),
            "hilo" => Some(Self::PriceHighLow),
            _ => None,
        }
    }
}

/// Product listing shown after login
#[derive(Debug, Clone, Copy)]
pub struct HomePage<'s> {
    page: BasePage<'s>,
}

impl<'s> HomePage<'s> {
    /// Screen heading
    pub const PAGE_TITLE: Locator = Locator::class_name("title");
    /// Product cards
    pub const PRODUCT_ITEMS: Locator = Locator::class_name("inventory_item");
    /// Product names
    pub const ITEM_NAMES: Locator = Locator::class_name("inventory_item_name");
    /// Product prices
    pub const ITEM_PRICES: Locator = Locator::class_name("inventory_item_price");
    /// Cart count badge
    pub const SHOPPING_CART_BADGE: Locator = Locator::class_name("shopping_cart_badge");
    /// Cart icon
    pub const SHOPPING_CART_LINK: Locator = Locator::class_name("shopping_cart_link");
    /// Side menu button
    pub const HAMBURGER_MENU: Locator = Locator::id("react-burger-menu-btn");
    /// Logout entry in the side menu
    pub const LOGOUT_LINK: Locator = Locator::id("logout_sidebar_link");
    /// Sort dropdown
    pub const PRODUCT_SORT: Locator = Locator::class_name("product_sort_container");

    /// Bind to the current screen
    #[must_use]
    pub fn attach(session: &'s Session) -> Self {
        Self {
            page: BasePage::new(session),
        }
    }

    /// Heading visible
    pub async fn is_loaded(&self) -> bool {
        self.page
            .is_displayed(&Self::PAGE_TITLE, self.page.policy().timeout)
            .await
    }

    /// Heading text, "Products" on this screen
    pub async fn heading(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::PAGE_TITLE).await
    }

    /// Number of product cards
    pub async fn product_count(&self) -> SuiteResult<usize> {
        Ok(self.page.find_elements(&Self::PRODUCT_ITEMS).await?.len())
    }

    /// Click "Add to cart" on the named product
    pub async fn add_product_to_cart(&self, name: &str) -> SuiteResult<()> {
        let locator = self.page.session().config().product_lookup.locate(
            name,
            ProductContainer::InventoryItem,
            ProductAction::AddToCart,
        )?;
        tracing::info!(product = name, "Adding product to cart");
        self.page.click(&locator).await
    }

    /// Badge value, or `None` when the badge is absent
    pub async fn cart_badge(&self) -> SuiteResult<Option<u32>> {
        let timeout = self.page.session().config().absence_timeout();
        let Some(badge) = self
            .page
            .find_optional(&Self::SHOPPING_CART_BADGE, timeout)
            .await?
        else {
            return Ok(None);
        };
        badge.text.trim().parse().map(Some).map_err(|_| {
            SuiteError::assertion(format!("cart badge shows non-numeric text {:?}", badge.text))
        })
    }

    /// Badge value, zero when the badge is absent
    pub async fn cart_badge_count(&self) -> SuiteResult<u32> {
        Ok(self.cart_badge().await?.unwrap_or(0))
    }

    /// Open the cart
    pub async fn open_cart(&self) -> SuiteResult<()> {
        self.page.click(&Self::SHOPPING_CART_LINK).await
    }

    /// Open the side menu and log out
    pub async fn logout(&self) -> SuiteResult<()> {
        self.page.click(&Self::HAMBURGER_MENU).await?;
        self.page.click(&Self::LOGOUT_LINK).await
    }

    /// Product names in display order
    pub async fn product_names(&self) -> SuiteResult<Vec<String>> {
        self.page.get_texts(&Self::ITEM_NAMES).await
    }

    /// Product prices in display order
    pub async fn product_prices(&self) -> SuiteResult<Vec<Price>> {
        self.page
            .get_texts(&Self::ITEM_PRICES)
            .await?
            .iter()
            .map(|text| Price::parse_label(text))
            .collect()
    }

    /// Re-sort the listing
    pub async fn sort_products(&self, order: SortOrder) -> SuiteResult<()> {
        self.page
            .select_option(&Self::PRODUCT_SORT, order.value())
            .await
    }

    /// Open the details view of the named product
    pub async fn open_product(&self, name: &str) -> SuiteResult<ProductPage<'s>> {
        let names = self.page.find_elements(&Self::ITEM_NAMES).await?;
        let target = names
            .iter()
            .find(|e| e.text == name)
            .ok_or_else(|| SuiteError::assertion(format!("no product named {name:?} in the listing")))?;
        self.page.click_element(target).await?;
        Ok(ProductPage::attach(self.page.session()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_values() {
        for order in [
            SortOrder::NameAsc,
            SortOrder::NameDesc,
            SortOrder::PriceLowHigh,
            SortOrder::PriceHighLow,
        ] {
            assert_eq!(SortOrder::from_value(order.value()), Some(order));
        }
        assert_eq!(SortOrder::from_value("price"), None);
    }
}
