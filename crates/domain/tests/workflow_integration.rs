//! Integration tests for the order workflow engine against the in-memory
//! store, covering atomicity, aggregate consistency, cascades, and the
//! cross-aggregate customer deletion guard.

use std::time::Duration;

use common::{CustomerId, LineItemId, OrderId, PaymentMethodId, ProductId};
use domain::{
    CustomerInput, CustomerService, DomainError, LineItemInput, OrderInput, OrderWorkflow,
    PaymentInput,
};
use store::{LineItemPatch, MemoryStore, OrderSort, OrderSortField, SortDirection};

fn detail(quantity: f64, price: f64) -> LineItemInput {
    LineItemInput {
        product_id: ProductId::new(),
        quantity,
        subtotal: quantity * price,
        price,
    }
}

fn payment(paid_amount: f64) -> PaymentInput {
    PaymentInput {
        payment_method_id: PaymentMethodId::new(),
        status: 1,
        paid_amount,
        payment_date: None,
    }
}

fn workflow(store: &MemoryStore) -> OrderWorkflow<MemoryStore> {
    OrderWorkflow::new(store.clone())
}

#[tokio::test]
async fn create_order_persists_header_details_and_payments() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let view = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![detail(2.0, 10.0), detail(1.0, 5.0)],
            vec![payment(25.0)],
        )
        .await
        .unwrap();

    let reloaded = engine.get_order(view.header.id).await.unwrap();
    assert_eq!(reloaded.header, view.header);
    assert_eq!(reloaded.details.len(), 2);
    assert_eq!(reloaded.payments.len(), 1);
}

#[tokio::test]
async fn totals_match_line_items_for_single_item() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let view = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![detail(3.0, 4.5)],
            vec![],
        )
        .await
        .unwrap();

    assert_eq!(view.header.total_amount, 13.5);
    assert_eq!(view.header.total_qty, 3.0);
}

#[tokio::test]
async fn totals_match_line_items_for_large_set() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let details: Vec<_> = (1..=50).map(|i| detail(i as f64, 2.0)).collect();
    let expected_qty: f64 = (1..=50).map(|i| i as f64).sum();
    let expected_amount = expected_qty * 2.0;

    let view = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            details,
            vec![],
        )
        .await
        .unwrap();

    assert_eq!(view.details.len(), 50);
    assert_eq!(view.header.total_qty, expected_qty);
    assert_eq!(view.header.total_amount, expected_amount);
}

#[tokio::test]
async fn create_order_rejects_empty_detail_set() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let err = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![],
            vec![],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn every_child_carries_the_new_header_identifier() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let view = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![detail(1.0, 1.0), detail(2.0, 2.0), detail(3.0, 3.0)],
            vec![payment(1.0), payment(13.0)],
        )
        .await
        .unwrap();

    let order_id = view.header.id;
    assert!(view.details.iter().all(|d| d.order_id == order_id));
    assert!(view.payments.iter().all(|p| p.order_id == order_id));
}

#[tokio::test]
async fn failed_create_leaves_no_observable_state() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    // Header and first line item succeed, second line item fails.
    store.fail_after_writes(2);
    let err = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![detail(1.0, 1.0), detail(2.0, 2.0)],
            vec![payment(5.0)],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Store(_)));
    store.clear_write_faults();

    let orders = engine.get_orders(OrderSort::default()).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn failed_update_preserves_the_previous_aggregate() {
    let store = MemoryStore::new();
    let engine = workflow(&store);
    let customer_id = CustomerId::new();

    let view = engine
        .create_order(
            OrderInput { customer_id },
            vec![detail(2.0, 10.0)],
            vec![],
        )
        .await
        .unwrap();
    let order_id = view.header.id;

    // Header replace and line-item delete succeed, insert fails.
    store.fail_after_writes(2);
    let err = engine
        .update_order(
            order_id,
            OrderInput { customer_id },
            vec![detail(9.0, 9.0)],
            vec![],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Store(_)));
    store.clear_write_faults();

    let reloaded = engine.get_order(order_id).await.unwrap();
    assert_eq!(reloaded.header.total_amount, 20.0);
    assert_eq!(reloaded.details.len(), 1);
    assert_eq!(reloaded.details[0].quantity, 2.0);
}

#[tokio::test]
async fn delete_order_leaves_no_children_behind() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let view = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![detail(1.0, 2.0), detail(2.0, 3.0)],
            vec![payment(8.0)],
        )
        .await
        .unwrap();
    let order_id = view.header.id;

    engine.delete_order(order_id).await.unwrap();

    let err = engine.get_order(order_id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    // Direct store reads: nothing referencing the header remains.
    use store::OrderStore;
    assert!(store.line_items_for_order(order_id).await.unwrap().is_empty());
    assert!(store.payments_for_order(order_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn update_replaces_details_but_appends_payments() {
    let store = MemoryStore::new();
    let engine = workflow(&store);
    let customer_id = CustomerId::new();

    let view = engine
        .create_order(
            OrderInput { customer_id },
            vec![detail(1.0, 10.0)],
            vec![payment(10.0)],
        )
        .await
        .unwrap();
    let order_id = view.header.id;

    engine
        .update_order(
            order_id,
            OrderInput { customer_id },
            vec![detail(4.0, 5.0), detail(1.0, 1.0)],
            vec![payment(21.0)],
        )
        .await
        .unwrap();

    let reloaded = engine.get_order(order_id).await.unwrap();
    assert_eq!(reloaded.header.total_amount, 21.0);
    assert_eq!(reloaded.header.total_qty, 5.0);

    // Details fully replaced, payments appended to the original one.
    assert_eq!(reloaded.details.len(), 2);
    assert_eq!(reloaded.payments.len(), 2);
    assert!(reloaded.payments.iter().any(|p| p.paid_amount == 10.0));
    assert!(reloaded.payments.iter().any(|p| p.paid_amount == 21.0));
}

#[tokio::test]
async fn update_of_unknown_order_is_not_found() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let err = engine
        .update_order(
            OrderId::new(),
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![detail(1.0, 1.0)],
            vec![],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn get_order_on_unknown_id_is_not_found_not_empty() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let err = engine.get_order(OrderId::new()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn listing_sorts_by_transaction_date_in_both_directions() {
    let store = MemoryStore::new();
    let engine = workflow(&store);
    let customer_id = CustomerId::new();

    let first = engine
        .create_order(OrderInput { customer_id }, vec![detail(1.0, 1.0)], vec![])
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = engine
        .create_order(OrderInput { customer_id }, vec![detail(1.0, 2.0)], vec![])
        .await
        .unwrap();

    let ascending = engine.get_orders(OrderSort::default()).await.unwrap();
    assert_eq!(ascending[0].header.id, first.header.id);
    assert_eq!(ascending[1].header.id, second.header.id);

    let descending = engine
        .get_orders(OrderSort {
            field: OrderSortField::TransactionDate,
            direction: SortDirection::Descending,
        })
        .await
        .unwrap();
    assert_eq!(descending[0].header.id, second.header.id);
    assert_eq!(descending[1].header.id, first.header.id);
}

#[tokio::test]
async fn listing_enriches_each_header_with_its_own_children() {
    let store = MemoryStore::new();
    let engine = workflow(&store);
    let customer_id = CustomerId::new();

    let a = engine
        .create_order(
            OrderInput { customer_id },
            vec![detail(1.0, 1.0)],
            vec![payment(1.0)],
        )
        .await
        .unwrap();
    let b = engine
        .create_order(
            OrderInput { customer_id },
            vec![detail(2.0, 2.0), detail(3.0, 3.0)],
            vec![],
        )
        .await
        .unwrap();

    let listed = engine.get_orders(OrderSort::default()).await.unwrap();
    assert_eq!(listed.len(), 2);

    for view in listed {
        assert!(view.details.iter().all(|d| d.order_id == view.header.id));
        assert!(view.payments.iter().all(|p| p.order_id == view.header.id));
        if view.header.id == a.header.id {
            assert_eq!(view.details.len(), 1);
            assert_eq!(view.payments.len(), 1);
        } else {
            assert_eq!(view.header.id, b.header.id);
            assert_eq!(view.details.len(), 2);
            assert!(view.payments.is_empty());
        }
    }
}

#[tokio::test]
async fn targeted_line_item_update_requires_an_existing_record() {
    let store = MemoryStore::new();
    let engine = workflow(&store);

    let err = engine
        .update_line_item(LineItemPatch {
            id: LineItemId::new(),
            quantity: 1.0,
            subtotal: 1.0,
            price: 1.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let view = engine
        .create_order(
            OrderInput {
                customer_id: CustomerId::new(),
            },
            vec![detail(1.0, 10.0)],
            vec![],
        )
        .await
        .unwrap();
    let item = &view.details[0];

    engine
        .update_line_item(LineItemPatch {
            id: item.id,
            quantity: 7.0,
            subtotal: 70.0,
            price: 10.0,
        })
        .await
        .unwrap();

    let reloaded = engine.get_order(view.header.id).await.unwrap();
    assert_eq!(reloaded.details[0].quantity, 7.0);
}

#[tokio::test]
async fn customer_with_orders_cannot_be_deleted() {
    let store = MemoryStore::new();
    let engine = workflow(&store);
    let customers = CustomerService::new(store.clone());

    let customer = customers
        .create_customer(CustomerInput {
            name: "Blocked".to_string(),
            code: "BLK".to_string(),
            email: "blocked@example.com".to_string(),
        })
        .await
        .unwrap();

    let view = engine
        .create_order(
            OrderInput {
                customer_id: customer.id,
            },
            vec![detail(1.0, 1.0)],
            vec![],
        )
        .await
        .unwrap();

    let err = customers.delete_customer(customer.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    // Customer and order are both intact.
    assert!(customers.get_customer(customer.id).await.is_ok());
    assert!(engine.get_order(view.header.id).await.is_ok());

    // Once the order is gone the customer can be deleted.
    engine.delete_order(view.header.id).await.unwrap();
    customers.delete_customer(customer.id).await.unwrap();
    let err = customers.get_customer(customer.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
