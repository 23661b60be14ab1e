use common::{CustomerId, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{LineItemInput, OrderInput, OrderWorkflow};
use store::{MemoryStore, OrderSort};

fn details(count: usize) -> Vec<LineItemInput> {
    (0..count)
        .map(|i| LineItemInput {
            product_id: ProductId::new(),
            quantity: (i + 1) as f64,
            subtotal: (i + 1) as f64 * 10.0,
            price: 10.0,
        })
        .collect()
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("workflow/create_order_50_items", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = MemoryStore::new();
                let engine = OrderWorkflow::new(store);
                engine
                    .create_order(
                        OrderInput {
                            customer_id: CustomerId::new(),
                        },
                        details(50),
                        vec![],
                    )
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_list_enriched(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = MemoryStore::new();
    let engine = OrderWorkflow::new(store);

    rt.block_on(async {
        for _ in 0..20 {
            engine
                .create_order(
                    OrderInput {
                        customer_id: CustomerId::new(),
                    },
                    details(5),
                    vec![],
                )
                .await
                .unwrap();
        }
    });

    c.bench_function("workflow/list_20_orders_enriched", |b| {
        b.iter(|| {
            rt.block_on(async {
                engine.get_orders(OrderSort::default()).await.unwrap();
            });
        });
    });
}

criterion_group!(benches, bench_create_order, bench_list_enriched);
criterion_main!(benches);
