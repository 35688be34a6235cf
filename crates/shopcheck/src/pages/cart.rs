//! Cart and the three checkout screens.

use crate::base_page::BasePage;
use crate::locator::{Locator, ProductAction, ProductContainer};
use crate::price::{OrderSummary, Price};
use crate::result::{SuiteError, SuiteResult};
use crate::session::Session;

/// Cart, checkout information, overview and complete screens
#[derive(Debug, Clone, Copy)]
pub struct CartPage<'s> {
    page: BasePage<'s>,
}

impl<'s> CartPage<'s> {
    /// Screen heading
    pub const PAGE_TITLE: Locator = Locator::class_name("title");
    /// Cart rows
    pub const CART_ITEMS: Locator = Locator::class_name("cart_item");
    /// Item names
    pub const CART_ITEM_NAMES: Locator = Locator::class_name("inventory_item_name");
    /// Item prices
    pub const CART_ITEM_PRICES: Locator = Locator::class_name("inventory_item_price");
    /// Item quantities
    pub const CART_QUANTITY: Locator = Locator::class_name("cart_quantity");
    /// "Continue Shopping"
    pub const CONTINUE_SHOPPING: Locator = Locator::id("continue-shopping");
    /// "Checkout"
    pub const CHECKOUT_BUTTON: Locator = Locator::id("checkout");
    /// Every "Remove" button
    pub const REMOVE_BUTTONS: Locator = Locator::css("button[id^='remove']");

    /// First name field
    pub const FIRST_NAME: Locator = Locator::id("first-name");
    /// Last name field
    pub const LAST_NAME: Locator = Locator::id("last-name");
    /// Postal code field
    pub const POSTAL_CODE: Locator = Locator::id("postal-code");
    /// "Continue" on the information form
    pub const CONTINUE_BUTTON: Locator = Locator::id("continue");
    /// "Cancel" on the information form and overview
    pub const CANCEL_BUTTON: Locator = Locator::id("cancel");
    /// Form error banner
    pub const ERROR_MESSAGE: Locator = Locator::css("h3[data-test='error']");

    /// Subtotal label
    pub const SUBTOTAL: Locator = Locator::class_name("summary_subtotal_label");
    /// Tax label
    pub const TAX: Locator = Locator::class_name("summary_tax_label");
    /// Total label
    pub const TOTAL: Locator = Locator::class_name("summary_total_label");
    /// "Finish"
    pub const FINISH_BUTTON: Locator = Locator::id("finish");

    /// Confirmation heading
    pub const COMPLETE_HEADER: Locator = Locator::class_name("complete-header");
    /// Confirmation text
    pub const COMPLETE_TEXT: Locator = Locator::class_name("complete-text");
    /// "Back Home"
    pub const BACK_HOME_BUTTON: Locator = Locator::id("back-to-products");

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

    /// Heading text
    pub async fn heading(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::PAGE_TITLE).await
    }

    /// Number of rows, zero for an empty cart
    pub async fn item_count(&self) -> SuiteResult<usize> {
        let timeout = self.page.session().config().absence_timeout();
        Ok(self
            .page
            .find_all_optional(&Self::CART_ITEMS, timeout)
            .await?
            .len())
    }

    /// Item names in cart order
    pub async fn item_names(&self) -> SuiteResult<Vec<String>> {
        self.page.get_texts(&Self::CART_ITEM_NAMES).await
    }

    /// Item prices in cart order
    pub async fn item_prices(&self) -> SuiteResult<Vec<Price>> {
        self.page
            .get_texts(&Self::CART_ITEM_PRICES)
            .await?
            .iter()
            .map(|text| Price::parse_label(text))
            .collect()
    }

    /// Item quantities in cart order
    pub async fn item_quantities(&self) -> SuiteResult<Vec<u32>> {
        self.page
            .get_texts(&Self::CART_QUANTITY)
            .await?
            .iter()
            .map(|text| {
                text.trim().parse().map_err(|_| {
                    SuiteError::assertion(format!("cart quantity shows non-numeric text {text:?}"))
                })
            })
            .collect()
    }

    /// Click "Remove" on the named row
    pub async fn remove_item(&self, name: &str) -> SuiteResult<()> {
        let locator = self.page.session().config().product_lookup.locate(
            name,
            ProductContainer::CartItem,
            ProductAction::Remove,
        )?;
        tracing::info!(product = name, "Removing product from cart");
        self.page.click(&locator).await
    }

    /// Back to the inventory
    pub async fn continue_shopping(&self) -> SuiteResult<()> {
        self.page.click(&Self::CONTINUE_SHOPPING).await
    }

    /// Start checkout
    pub async fn checkout(&self) -> SuiteResult<()> {
        self.page.click(&Self::CHECKOUT_BUTTON).await
    }

    /// Fill the information form. Empty strings leave a field blank.
    pub async fn fill_checkout_information(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> SuiteResult<()> {
        self.page.enter_text(&Self::FIRST_NAME, first_name).await?;
        self.page.enter_text(&Self::LAST_NAME, last_name).await?;
        self.page.enter_text(&Self::POSTAL_CODE, postal_code).await
    }

    /// Submit the information form
    pub async fn continue_checkout(&self) -> SuiteResult<()> {
        self.page.click(&Self::CONTINUE_BUTTON).await
    }

    /// Abandon checkout
    pub async fn cancel_checkout(&self) -> SuiteResult<()> {
        self.page.click(&Self::CANCEL_BUTTON).await
    }

    /// Information form error text
    pub async fn checkout_error_message(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::ERROR_MESSAGE).await
    }

    /// Subtotal label text
    pub async fn subtotal(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::SUBTOTAL).await
    }

    /// Tax label text
    pub async fn tax(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::TAX).await
    }

    /// Total label text
    pub async fn total(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::TOTAL).await
    }

    /// Parsed overview amounts
    pub async fn order_summary(&self) -> SuiteResult<OrderSummary> {
        Ok(OrderSummary {
            subtotal: Price::parse_label(&self.subtotal().await?)?,
            tax: Price::parse_label(&self.tax().await?)?,
            total: Price::parse_label(&self.total().await?)?,
        })
    }

    /// Place the order
    pub async fn finish(&self) -> SuiteResult<()> {
        self.page.click(&Self::FINISH_BUTTON).await
    }

    /// Confirmation heading visible
    pub async fn is_checkout_complete(&self) -> bool {
        self.page
            .is_displayed(&Self::COMPLETE_HEADER, self.page.policy().timeout)
            .await
    }

    /// Confirmation heading text
    pub async fn complete_header(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::COMPLETE_HEADER).await
    }

    /// Confirmation body text
    pub async fn complete_message(&self) -> SuiteResult<String> {
        self.page.get_text(&Self::COMPLETE_TEXT).await
    }

    /// Back to the inventory after ordering
    pub async fn back_home(&self) -> SuiteResult<()> {
        self.page.click(&Self::BACK_HOME_BUTTON).await
    }
}
