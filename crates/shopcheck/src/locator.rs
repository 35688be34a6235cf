//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable `(strategy, selector)` pair. Page objects own
//! their static locators as constants; product-specific locators are built at
//! call time through [`ProductLookup`].
//!
//! # Strategies
//!
//! - **Id** and **ClassName** are compiled to attribute selectors so the
//!   selector text never needs CSS identifier escaping.
//! - **CssSelector** is passed through untouched.
//! - **XPath** is evaluated with `document.evaluate`.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::result::{SuiteError, SuiteResult};

/// How a locator finds elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Match the `id` attribute
    Id,
    /// Match one class token
    ClassName,
    /// CSS selector
    CssSelector,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// Short name used in logs and error messages
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ClassName => "class",
            Self::CssSelector => "css",
            Self::XPath => "xpath",
        }
    }
}

/// An immutable `(strategy, selector)` pair identifying zero or more elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: Strategy,
    selector: Cow<'static, str>,
}

impl Locator {
    /// Locate by `id` attribute
    #[must_use]
    pub const fn id(id: &'static str) -> Self {
        Self {
            strategy: Strategy::Id,
            selector: Cow::Borrowed(id),
        }
    }

    /// Locate by class token
    #[must_use]
    pub const fn class_name(class: &'static str) -> Self {
        Self {
            strategy: Strategy::ClassName,
            selector: Cow::Borrowed(class),
        }
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self {
            strategy: Strategy::CssSelector,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Locate by XPath expression
    #[must_use]
    pub const fn xpath(expression: &'static str) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: Cow::Borrowed(expression),
        }
    }

    /// Build a locator from a runtime selector
    #[must_use]
    pub fn dynamic(strategy: Strategy, selector: impl Into<String>) -> Self {
        Self {
            strategy,
            selector: Cow::Owned(selector.into()),
        }
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the raw selector text
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// CSS form of this locator, or `None` for XPath locators
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        match self.strategy {
            Strategy::Id => Some(format!("[id={}]", css_string(&self.selector))),
            Strategy::ClassName => Some(format!("[class~={}]", css_string(&self.selector))),
            Strategy::CssSelector => Some(self.selector.to_string()),
            Strategy::XPath => None,
        }
    }

    /// JavaScript expression evaluating to an array of all matching elements
    /// in document order.
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self.to_css() {
            Some(css) => format!(
                "Array.from(document.querySelectorAll({}))",
                js_string(&css)
            ),
            None => format!(
                "(() => {{ const r = document.evaluate({}, document, null, \
                 XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; \
                 for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                 return out; }})()",
                js_string(&self.selector)
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy.as_str(), self.selector)
    }
}

/// Quote a value as a double-quoted CSS string literal.
#[must_use]
pub fn css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn js_string(value: &str) -> String {
    // A JSON string literal is a valid JavaScript string literal.
    serde_json::Value::String(value.to_string()).to_string()
}

/// Storefront `data-test` slug for a product name.
///
/// "Sauce Labs Bolt T-Shirt" becomes "sauce-labs-bolt-t-shirt".
#[must_use]
pub fn product_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Element that wraps one product on a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductContainer {
    /// Product card on the inventory page
    InventoryItem,
    /// Line item on the cart and checkout overview pages
    CartItem,
}

impl ProductContainer {
    /// Container class attribute value
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::InventoryItem => "inventory_item",
            Self::CartItem => "cart_item",
        }
    }
}

/// Button action on a product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    /// "Add to cart"
    AddToCart,
    /// "Remove"
    Remove,
}

impl ProductAction {
    /// `data-test` prefix of the action's button
    #[must_use]
    pub const fn data_test_prefix(&self) -> &'static str {
        match self {
            Self::AddToCart => "add-to-cart",
            Self::Remove => "remove",
        }
    }
}

/// How product-by-name actions find their button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductLookup {
    /// Stable `data-test` identifier derived from the product name
    #[default]
    DataTest,
    /// Name text node, then its container ancestor, then the button inside.
    ///
    /// Fragile: the name is interpolated into an XPath string literal, so
    /// names containing `'` cannot be expressed and are rejected.
    Structural,
}

impl ProductLookup {
    /// Build the locator for `action` on the product called `name`.
    ///
    /// The structural form matches whichever button the container holds, so
    /// `action` only narrows the `data-test` form.
    pub fn locate(
        self,
        name: &str,
        container: ProductContainer,
        action: ProductAction,
    ) -> SuiteResult<Locator> {
        match self {
            Self::DataTest => {
                let data_test = format!("{}-{}", action.data_test_prefix(), product_slug(name));
                Ok(Locator::dynamic(
                    Strategy::CssSelector,
                    format!("button[data-test={}]", css_string(&data_test)),
                ))
            }
            Self::Structural => {
                if name.contains('\'') {
                    return Err(SuiteError::InvalidLocator {
                        message: format!(
                            "product name {name:?} contains a quote and cannot be used in a structural lookup"
                        ),
                    });
                }
                Ok(Locator::dynamic(
                    Strategy::XPath,
                    format!(
                        "//div[text()='{name}']/ancestor::div[@class='{}']//button",
                        container.class()
                    ),
                ))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use super::Strategy;
    use proptest::prelude::*;

    mod locator_tests {
        use super::*;

        #[test]
        fn test_const_constructors() {
            const LOGIN: Locator = Locator::id("login-button");
            assert_eq!(LOGIN.strategy(), Strategy::Id);
            assert_eq!(LOGIN.selector(), "login-button");
            assert_eq!(LOGIN.to_string(), "id=login-button");
        }

        #[test]
        fn test_static_and_dynamic_are_equal() {
            let a = Locator::class_name("title");
            let b = Locator::dynamic(Strategy::ClassName, "title");
            assert_eq!(a, b);
        }

        #[test]
        fn test_to_css() {
            assert_eq!(
                Locator::id("user-name").to_css().unwrap(),
                "[id=\"user-name\"]"
            );
            assert_eq!(
                Locator::class_name("title").to_css().unwrap(),
                "[class~=\"title\"]"
            );
            assert_eq!(
                Locator::css("h3[data-test='error']").to_css().unwrap(),
                "h3[data-test='error']"
            );
            assert!(Locator::xpath("//div").to_css().is_none());
        }

        #[test]
        fn test_query_all_css() {
            let query = Locator::class_name("cart_item").to_query_all();
            assert!(query.starts_with("Array.from(document.querySelectorAll("));
            assert!(query.contains("cart_item"));
        }

        #[test]
        fn test_query_all_xpath() {
            let query = Locator::xpath("//div[text()='x']").to_query_all();
            assert!(query.contains("document.evaluate"));
            assert!(query.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
        }
    }

    mod product_lookup_tests {
        use super::*;

        #[test]
        fn test_slug() {
            assert_eq!(product_slug("Sauce Labs Backpack"), "sauce-labs-backpack");
            assert_eq!(
                product_slug("Test.allTheThings() T-Shirt (Red)"),
                "test.allthethings()-t-shirt-(red)"
            );
        }

        #[test]
        fn test_data_test_add() {
            let locator = ProductLookup::DataTest
                .locate(
                    "Sauce Labs Backpack",
                    ProductContainer::InventoryItem,
                    ProductAction::AddToCart,
                )
                .unwrap();
            assert_eq!(locator.strategy(), Strategy::CssSelector);
            assert_eq!(
                locator.selector(),
                "button[data-test=\"add-to-cart-sauce-labs-backpack\"]"
            );
        }

        #[test]
        fn test_data_test_remove() {
            let locator = ProductLookup::DataTest
                .locate(
                    "Sauce Labs Bike Light",
                    ProductContainer::CartItem,
                    ProductAction::Remove,
                )
                .unwrap();
            assert_eq!(
                locator.selector(),
                "button[data-test=\"remove-sauce-labs-bike-light\"]"
            );
        }

        #[test]
        fn test_structural_form() {
            let locator = ProductLookup::Structural
                .locate(
                    "Sauce Labs Backpack",
                    ProductContainer::CartItem,
                    ProductAction::Remove,
                )
                .unwrap();
            assert_eq!(locator.strategy(), Strategy::XPath);
            assert_eq!(
                locator.selector(),
                "//div[text()='Sauce Labs Backpack']/ancestor::div[@class='cart_item']//button"
            );
        }

        #[test]
        fn test_structural_rejects_quote() {
            let err = ProductLookup::Structural
                .locate(
                    "Sauce Labs' Backpack",
                    ProductContainer::InventoryItem,
                    ProductAction::AddToCart,
                )
                .unwrap_err();
            assert!(matches!(err, SuiteError::InvalidLocator { .. }));
        }

        #[test]
        fn test_data_test_accepts_quote() {
            let locator = ProductLookup::DataTest
                .locate(
                    "Sauce Labs' \"Backpack\"",
                    ProductContainer::InventoryItem,
                    ProductAction::AddToCart,
                )
                .unwrap();
            assert!(locator.selector().contains("\\\"backpack\\\""));
        }

        #[test]
        fn test_lookup_serde_names() {
            let lookup: ProductLookup = serde_json::from_str("\"structural\"").unwrap();
            assert_eq!(lookup, ProductLookup::Structural);
            let lookup: ProductLookup = serde_json::from_str("\"data-test\"").unwrap();
            assert_eq!(lookup, ProductLookup::DataTest);
        }
    }

    proptest! {
        #[test]
        fn prop_slug_has_no_whitespace_or_uppercase(name in "[A-Za-z0-9 ().-]{0,40}") {
            let slug = product_slug(&name);
            prop_assert!(!slug.chars().any(char::is_whitespace));
            prop_assert!(!slug.chars().any(char::is_uppercase));
        }

        #[test]
        fn prop_css_string_never_ends_early(value in ".{0,40}") {
            let quoted = css_string(&value);
            let inner = &quoted[1..quoted.len() - 1];
            let mut escaped = false;
            for c in inner.chars() {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else {
                    prop_assert_ne!(c, '"');
                }
            }
        }
    }
}
