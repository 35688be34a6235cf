//! Product details screen.

use crate::base_page::BasePage;
use crate::locator::Locator;
use crate::price::Price;
use crate::result::SuiteResult;
use crate::session::Session;

/// Details view of a single product
#[derive(Debug, Clone, Copy)]
pub struct ProductPage<'s> {
    page: BasePage<'s>,
}

impl<'s> ProductPage<'s> {
    /// Product name
    pub const PRODUCT_NAME: Locator = Locator::class_name("inventory_details_name");
    /// Product description
    pub const PRODUCT_DESCRIPTION: Locator = Locator::class_name("inventory_details_desc");
    /// Product price
    pub const PRODUCT_PRICE: Locator = Locator::class_name("inventory_details_price");
    /// "Add to cart" button
    pub const ADD_TO_CART_BUTTON: Locator = Locator::css("button[id^='add-to-cart']");
    /// "Remove" button
    pub const REMOVE_BUTTON: Locator = Locator::css("button[id^='remove']");
    /// "Back to products" button
    pub const BACK_TO_PRODUCTS: Locator = Locator::id("back-to-products");
    /// Product image
    pub const PRODUCT_IMAGE: Locator = Locator::class_name("inventory_details_img");

    /// Bind to the current screen
    #[must_use]
    pub fn attach(session: &'s Session) -> Self {
        Self {
            page: BasePage::new(session),
        }
    }

    /// Product name
    pub async fn name(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::PRODUCT_NAME).await
    }

    /// Product description
    pub async fn description(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::PRODUCT_DESCRIPTION).await
    }

    /// Product price
    pub async fn price(&self) -> SuiteResult<Price> {
        Price::parse_label(&self.page.get_text(&Self::PRODUCT_PRICE).await?)
    }

    /// Put this product in the cart
    pub async fn add_to_cart(&self) -> SuiteResult<()> {
        self.page.click(&Self::ADD_TO_CART_BUTTON).await
    }

    /// Take this product out of the cart
    pub async fn remove(&self) -> SuiteResult<()> {
        self.page.click(&Self::REMOVE_BUTTON).await
    }

    /// "Remove" visible within the absence timeout
    pub async fn is_remove_button_displayed(&self) -> bool {
        let timeout = self.page.session().config().absence_timeout();
        self.page.is_displayed(&Self::REMOVE_BUTTON, timeout).await
    }

    /// Return to the inventory
    pub async fn back_to_products(&self) -> SuiteResult<()> {
        self.page.click(&Self::BACK_TO_PRODUCTS).await
    }

    /// Product image visible
    pub async fn is_image_displayed(&self) -> bool {
        self.page
            .is_displayed(&Self::PRODUCT_IMAGE, self.page.policy().timeout)
            .await
    }
}
