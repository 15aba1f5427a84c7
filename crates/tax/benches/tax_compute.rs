use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use billforge_core::{PartySnapshot, StateCode};
use billforge_tax::{compute, InvoiceKind, LineItem};
use rust_decimal::Decimal;
use std::collections::HashMap;

fn catalog() -> HashMap<String, Decimal> {
    let mut rates = HashMap::new();
    rates.insert("8471".to_string(), Decimal::new(1800, 2));
    rates.insert("9983".to_string(), Decimal::new(1200, 2));
    rates
}

fn items(n: usize) -> Vec<LineItem> {
    (0..n)
        .map(|i| {
            let code = if i % 2 == 0 { "8471" } else { "9983" };
            LineItem::new(
                format!("Item {i}"),
                code,
                Decimal::new(1 + i as i64, 0),
                "NOS",
                Decimal::new(99_95, 2),
            )
            .with_discount(Decimal::new((i as i64 % 20) * 100, 2))
        })
        .collect()
}

fn bench_compute(c: &mut Criterion) {
    let rates = catalog();
    let seller = PartySnapshot::new("Seller", StateCode::new("MH"));
    let intra_buyer = PartySnapshot::new("Buyer", StateCode::new("MH"));
    let inter_buyer = PartySnapshot::new("Buyer", StateCode::new("KA"));

    let mut group = c.benchmark_group("tax_compute");
    for n in [1usize, 10, 100] {
        let lines = items(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("intrastate", n), &lines, |b, lines| {
            b.iter(|| {
                compute(
                    black_box(lines),
                    &seller,
                    &intra_buyer,
                    InvoiceKind::TaxInvoice,
                    &rates,
                )
                .unwrap()
            })
        });
        group.bench_with_input(BenchmarkId::new("interstate", n), &lines, |b, lines| {
            b.iter(|| {
                compute(
                    black_box(lines),
                    &seller,
                    &inter_buyer,
                    InvoiceKind::TaxInvoice,
                    &rates,
                )
                .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
