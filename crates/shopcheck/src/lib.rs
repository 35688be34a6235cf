//! Shopcheck: page-object end-to-end suite for the Swag Labs storefront
//!
//! Scenarios drive the storefront through page objects. Page objects are
//! built from explicit-wait primitives over a [`WebDriver`]. The lifecycle
//! fixture hands each scenario its own session and tears it down.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       SHOPCHECK Architecture                     │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐   ┌─────────┐  │
//! │  │ Scenarios  │──►│ Page       │──►│ Base Page  │──►│ Driver  │  │
//! │  │            │   │ Objects    │   │ (waits)    │   │ (CDP or │  │
//! │  └─────▲──────┘   └────────────┘   └────────────┘   │  mock)  │  │
//! │        │                                            └────▲────┘  │
//! │  ┌─────┴──────────────────────────────────────────────────┴────┐ │
//! │  │ TestFixture: acquire -> run -> screenshot if failed -> quit │ │
//! │  └─────────────────────────────────────────────────────────────┘ │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Real browser control lives behind the `browser` feature. Without it the
//! in-memory [`MockStorefront`] runs every scenario.

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

mod artifacts;
mod base_page;
#[cfg(feature = "browser")]
mod browser;
mod config;
mod driver;
mod fixture;
mod locator;
mod price;
mod result;
mod session;

/// Process-wide `tracing` setup
pub mod logging;

/// In-memory storefront driver
pub mod mock;

/// Page objects, one per storefront screen
pub mod pages;

/// Run-level JSON report
pub mod report;

/// Registered end-to-end scenarios
pub mod scenarios;

/// Explicit waits
pub mod wait;

pub use artifacts::{timestamp, timestamped_name, ArtifactDirs, TIMESTAMP_FORMAT};
pub use base_page::BasePage;
#[cfg(feature = "browser")]
pub use browser::{ChromiumDriver, ChromiumProvider};
pub use config::{
    parse_bool, SuiteConfig, DEFAULT_BASE_URL, ENV_BASE_URL, ENV_CHROMIUM_PATH, ENV_HEADLESS,
};
pub use driver::{
    DriverConfig, DriverProvider, ElementHandle, MockDriver, MockElement, WebDriver,
};
pub use fixture::{LifecycleState, TestFixture, TestOutcome, TestReport};
pub use locator::{
    css_string, product_slug, Locator, ProductAction, ProductContainer, ProductLookup, Strategy,
};
pub use mock::{MockProvider, MockStorefront};
pub use price::{OrderSummary, Price};
pub use report::SuiteReport;
pub use result::{SuiteError, SuiteResult};
pub use scenarios::{Scenario, ScenarioFn};
pub use session::Session;
pub use wait::{WaitCondition, WaitPolicy};

/// Prelude for writing scenarios
pub mod prelude {
    pub use super::pages::{CartPage, HomePage, LoginPage, ProductPage, SortOrder};
    pub use super::{
        BasePage, Locator, Price, Session, SuiteConfig, SuiteError, SuiteResult, TestFixture,
    };
    pub use crate::{verify, verify_eq};
}
