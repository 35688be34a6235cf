//! The scenario catalog against the live storefront in Chromium.
//!
//! Needs a local Chromium and network access:
//! `cargo test -p shopcheck --features browser -- --ignored`

#![cfg(feature = "browser")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use shopcheck::scenarios;
use shopcheck::{ArtifactDirs, ChromiumProvider, SuiteConfig, TestFixture};
use std::sync::Arc;
use tempfile::TempDir;

fn fixture(root: &std::path::Path) -> TestFixture {
    let config = SuiteConfig::default()
        .apply_env()
        .unwrap()
        .with_artifacts(ArtifactDirs::under(root));
    let provider = ChromiumProvider::new(config.driver_config());
    TestFixture::new(Arc::new(provider), Arc::new(config))
}

async fn run_suite(suite: &str) {
    let tmp = TempDir::new().unwrap();
    let fixture = fixture(tmp.path());
    for scenario in scenarios::select(Some(&format!("{suite}::"))) {
        let report = fixture.run(scenario.name, scenario.run).await.unwrap();
        assert!(
            report.outcome.is_passed(),
            "{}: {:?}",
            scenario.id(),
            report.outcome.reason()
        );
    }
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn test_login_suite_live() {
    run_suite("login").await;
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn test_cart_suite_live() {
    run_suite("cart").await;
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn test_checkout_suite_live() {
    run_suite("checkout").await;
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn test_product_suite_live() {
    run_suite("product").await;
}
