use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use stockroom_core::ItemId;
use stockroom_purchasing::{PurchaseOrderLineItem, RequestedQuantities, plan_partial_receipt};

fn fixture(lines: i64) -> (Vec<PurchaseOrderLineItem>, RequestedQuantities) {
    let items = (1..=lines)
        .map(|i| PurchaseOrderLineItem::new(ItemId::new(i), 20 + i % 9, i % 6, Decimal::from(i)))
        .collect();
    // Every fourth item asks for more than remains.
    let requested = (1..=lines)
        .map(|i| {
            let want = if i % 4 == 0 { 100 } else { i % 5 };
            (ItemId::new(i), want)
        })
        .collect();
    (items, requested)
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_partial_receipt");
    for lines in [10i64, 100, 1_000] {
        let (items, requested) = fixture(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, _| {
            b.iter(|| plan_partial_receipt(black_box(&items), black_box(&requested)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
