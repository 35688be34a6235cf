//! Locator and price parsing benchmarks.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shopcheck::{css_string, product_slug, Price, ProductAction, ProductContainer, ProductLookup};

const NAMES: [(&str, &str); 3] = [
    ("short", "Sauce Labs Onesie"),
    ("long", "Sauce Labs Fleece Jacket"),
    ("punctuated", "Test.allTheThings() T-Shirt (Red)"),
];

fn bench_product_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("product_lookup");

    for lookup in [ProductLookup::DataTest, ProductLookup::Structural] {
        for (label, name) in NAMES {
            let id = format!("{lookup:?}/{label}");
            group.bench_with_input(BenchmarkId::from_parameter(id), &name, |bench, name| {
                bench.iter(|| {
                    let locator = lookup
                        .locate(
                            black_box(name),
                            ProductContainer::InventoryItem,
                            ProductAction::AddToCart,
                        )
                        .unwrap();
                    black_box(locator);
                });
            });
        }
    }

    group.finish();
}

fn bench_quoting(c: &mut Criterion) {
    let mut group = c.benchmark_group("quoting");

    group.bench_function("product_slug", |bench| {
        bench.iter(|| black_box(product_slug(black_box(NAMES[2].1))));
    });
    group.bench_function("css_string", |bench| {
        bench.iter(|| black_box(css_string(black_box("add-to-cart-\"quoted\"\\name"))));
    });

    group.finish();
}

fn bench_price_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("price_parsing");

    for label in ["$29.99", "Item total: $39.98", "Total: $43.18"] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &label, |bench, label| {
            bench.iter(|| black_box(Price::parse_label(black_box(label)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_product_lookup,
    bench_quoting,
    bench_price_parsing
);
criterion_main!(benches);
