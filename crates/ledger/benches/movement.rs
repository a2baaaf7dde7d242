use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use std::collections::HashMap;

use stockroom_catalog::{Product, ProductDraft};
use stockroom_core::ProductId;
use stockroom_ledger::movement::{Transition, apply_sale_transition};
use stockroom_sales::SaleLine;

fn build_catalog(n: usize) -> (HashMap<ProductId, Product>, Vec<ProductId>) {
    let mut products = HashMap::new();
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = ProductId::new();
        let product = Product::create(
            id,
            ProductDraft {
                upc: format!("{i:012}"),
                name: format!("Product {i}"),
                description: String::new(),
                picture: String::new(),
                supplier_id: None,
                purchase_price: 10.0,
                sales_price: 20.0,
                in_stock: 1_000_000,
            },
        )
        .unwrap();
        products.insert(id, product);
        ids.push(id);
    }
    (products, ids)
}

fn bench_sale_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("sale_transition");

    for line_count in [1usize, 10, 100] {
        let (catalog, ids) = build_catalog(line_count);
        let lines: Vec<SaleLine> = ids
            .iter()
            .map(|&product_id| SaleLine {
                product_id,
                quantity: 1,
                unit_price: 20.0,
            })
            .collect();

        group.throughput(Throughput::Elements(line_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(line_count),
            &lines,
            |b, lines| {
                b.iter_batched(
                    || catalog.clone(),
                    |mut products| {
                        apply_sale_transition(
                            black_box(&mut products),
                            Transition::Realize,
                            black_box(lines),
                        )
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sale_transition);
criterion_main!(benches);
