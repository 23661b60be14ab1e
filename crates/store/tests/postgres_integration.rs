//! PostgreSQL integration tests
//!
//! These tests share one PostgreSQL container for efficiency and run
//! serially because every test truncates the tables.

use std::sync::Arc;

use chrono::Utc;
use common::{CustomerId, LineItemId, OrderId, PaymentId, PaymentMethodId, ProductId};
use serial_test::serial;
use sqlx::PgPool;
use store::{
    CustomerRecord, EntityStore, LineItemPatch, LineItemRecord, OrderRecord, OrderSort,
    OrderSortField, OrderStore, PaymentRecord, PgStore, SortDirection,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PgStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query(
        "TRUNCATE TABLE orders, order_line_items, order_payments, customers, customer_addresses, products, payment_methods",
    )
    .execute(&pool)
    .await
    .unwrap();

    PgStore::new(pool)
}

fn sample_order(customer_id: CustomerId) -> OrderRecord {
    OrderRecord {
        id: OrderId::new(),
        customer_id,
        total_amount: 50.0,
        total_qty: 5.0,
        transaction_date: Utc::now(),
    }
}

fn sample_item(order_id: OrderId) -> LineItemRecord {
    LineItemRecord {
        id: LineItemId::new(),
        order_id,
        product_id: ProductId::new(),
        quantity: 5.0,
        subtotal: 50.0,
        price: 10.0,
    }
}

fn sample_payment(order_id: OrderId) -> PaymentRecord {
    PaymentRecord {
        id: PaymentId::new(),
        order_id,
        payment_method_id: PaymentMethodId::new(),
        status: 1,
        paid_amount: 50.0,
        payment_date: Some(Utc::now()),
    }
}

#[tokio::test]
#[serial]
async fn insert_and_fetch_order_roundtrip() {
    let store = get_test_store().await;

    let header = sample_order(CustomerId::new());
    let items = vec![sample_item(header.id), sample_item(header.id)];
    let payments = vec![sample_payment(header.id)];

    store
        .insert_order(&header, &items, &payments)
        .await
        .unwrap();

    let fetched = store.fetch_order(header.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, header.id);
    assert_eq!(fetched.customer_id, header.customer_id);
    assert_eq!(fetched.total_amount, header.total_amount);

    let fetched_items = store.line_items_for_order(header.id).await.unwrap();
    assert_eq!(fetched_items.len(), 2);
    assert!(fetched_items.iter().all(|i| i.order_id == header.id));

    let fetched_payments = store.payments_for_order(header.id).await.unwrap();
    assert_eq!(fetched_payments.len(), 1);
}

#[tokio::test]
#[serial]
async fn delete_order_cascades_to_children() {
    let store = get_test_store().await;

    let header = sample_order(CustomerId::new());
    let items = vec![sample_item(header.id)];
    let payments = vec![sample_payment(header.id)];
    store
        .insert_order(&header, &items, &payments)
        .await
        .unwrap();

    store.delete_order(header.id).await.unwrap();

    assert!(store.fetch_order(header.id).await.unwrap().is_none());
    assert!(store.line_items_for_order(header.id).await.unwrap().is_empty());
    assert!(store.payments_for_order(header.id).await.unwrap().is_empty());
}

#[tokio::test]
#[serial]
async fn replace_order_swaps_items_and_appends_payments() {
    let store = get_test_store().await;

    let mut header = sample_order(CustomerId::new());
    store
        .insert_order(&header, &[sample_item(header.id)], &[sample_payment(header.id)])
        .await
        .unwrap();

    header.total_amount = 120.0;
    let new_items = vec![sample_item(header.id), sample_item(header.id)];
    store
        .replace_order(&header, &new_items, &[sample_payment(header.id)])
        .await
        .unwrap();

    let fetched = store.fetch_order(header.id).await.unwrap().unwrap();
    assert_eq!(fetched.total_amount, 120.0);

    let items = store.line_items_for_order(header.id).await.unwrap();
    assert_eq!(items.len(), 2);

    // Original payment survives, new one is appended.
    let payments = store.payments_for_order(header.id).await.unwrap();
    assert_eq!(payments.len(), 2);
}

#[tokio::test]
#[serial]
async fn update_line_item_reports_match() {
    let store = get_test_store().await;

    let header = sample_order(CustomerId::new());
    let item = sample_item(header.id);
    store.insert_order(&header, &[item.clone()], &[]).await.unwrap();

    let patch = LineItemPatch {
        id: item.id,
        quantity: 9.0,
        subtotal: 90.0,
        price: 10.0,
    };
    assert!(store.update_line_item(&patch).await.unwrap());

    let missing = LineItemPatch {
        id: LineItemId::new(),
        quantity: 1.0,
        subtotal: 1.0,
        price: 1.0,
    };
    assert!(!store.update_line_item(&missing).await.unwrap());
}

#[tokio::test]
#[serial]
async fn list_orders_honors_sort_direction() {
    let store = get_test_store().await;

    let customer = CustomerId::new();
    let mut small = sample_order(customer);
    small.total_amount = 10.0;
    let mut large = sample_order(customer);
    large.total_amount = 90.0;
    store.insert_order(&small, &[], &[]).await.unwrap();
    store.insert_order(&large, &[], &[]).await.unwrap();

    let descending = store
        .list_orders(OrderSort {
            field: OrderSortField::TotalAmount,
            direction: SortDirection::Descending,
        })
        .await
        .unwrap();
    assert_eq!(descending[0].id, large.id);
    assert_eq!(descending[1].id, small.id);
}

#[tokio::test]
#[serial]
async fn count_orders_for_customer_counts_only_theirs() {
    let store = get_test_store().await;

    let customer = CustomerId::new();
    let other = CustomerId::new();
    store
        .insert_order(&sample_order(customer), &[], &[])
        .await
        .unwrap();
    store
        .insert_order(&sample_order(customer), &[], &[])
        .await
        .unwrap();
    store
        .insert_order(&sample_order(other), &[], &[])
        .await
        .unwrap();

    assert_eq!(store.count_orders_for_customer(customer).await.unwrap(), 2);
    assert_eq!(store.count_orders_for_customer(other).await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn customer_crud_and_email_lookup() {
    let store = get_test_store().await;

    let customer = CustomerRecord {
        id: CustomerId::new(),
        name: "Acme".to_string(),
        code: "ACM".to_string(),
        email: "orders@acme.example".to_string(),
    };
    store.insert_customer(&customer).await.unwrap();

    let by_email = store
        .find_customer_by_email("orders@acme.example")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, customer.id);

    store.delete_customer_with_addresses(customer.id).await.unwrap();
    assert!(store.fetch_customer(customer.id).await.unwrap().is_none());
}
