//! The Order Workflow Engine.
//!
//! An order is one aggregate spread over three collections: the header,
//! its line items, and its payments. This engine computes the derived
//! header fields, stamps identifiers and the transaction timestamp,
//! delegates the atomic multi-record writes to the store, and assembles
//! the composite read view.

use chrono::{DateTime, Utc};
use common::{CustomerId, LineItemId, OrderId, PaymentId, PaymentMethodId, ProductId};
use serde::{Deserialize, Serialize};
use store::{
    LineItemPatch, LineItemRecord, OrderRecord, OrderSort, OrderStore, PaymentPatch, PaymentRecord,
};

use crate::error::DomainError;

/// Inbound order header fields; everything else on the header is derived.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInput {
    pub customer_id: CustomerId,
}

/// Inbound line item. The identifier and header reference are assigned
/// by the engine, never by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemInput {
    pub product_id: ProductId,
    pub quantity: f64,
    pub subtotal: f64,
    pub price: f64,
}

/// Inbound payment; identified and stamped by the engine like line items.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    pub payment_method_id: PaymentMethodId,
    pub status: i16,
    pub paid_amount: f64,
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
}

/// Composite read view: header fields flattened with the correlated
/// line items and payments embedded.
#[derive(Debug, Clone, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub header: OrderRecord,
    pub details: Vec<LineItemRecord>,
    pub payments: Vec<PaymentRecord>,
}

/// Orchestrates atomic create/replace/delete across the order collections
/// and keeps the denormalized header totals consistent with the line items.
pub struct OrderWorkflow<S> {
    store: S,
}

impl<S: OrderStore> OrderWorkflow<S> {
    /// Creates a workflow engine over the given aggregate repository.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an order: computes totals, stamps identifiers and the
    /// transaction timestamp, and persists header, line items, and
    /// payments in one unit of work.
    ///
    /// Either all three record sets are durably persisted or none are;
    /// a failed unit of work surfaces as `DomainError::Store` and the
    /// caller must resubmit the full payload.
    #[tracing::instrument(skip(self, input, details, payments), fields(detail_count = details.len()))]
    pub async fn create_order(
        &self,
        input: OrderInput,
        details: Vec<LineItemInput>,
        payments: Vec<PaymentInput>,
    ) -> Result<OrderView, DomainError> {
        if details.is_empty() {
            return Err(DomainError::Validation(
                "transaction requires at least one detail line".to_string(),
            ));
        }

        let (total_amount, total_qty) = aggregate_totals(&details);
        let header = OrderRecord {
            id: OrderId::new(),
            customer_id: input.customer_id,
            total_amount,
            total_qty,
            transaction_date: Utc::now(),
        };
        let items = stamp_line_items(header.id, details);
        let payments = stamp_payments(header.id, payments);

        self.store.insert_order(&header, &items, &payments).await?;
        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %header.id, total_amount, "order created");

        Ok(OrderView {
            header,
            details: items,
            payments,
        })
    }

    /// Lists all orders in the requested sort order, each enriched with
    /// its line items and payments.
    #[tracing::instrument(skip(self))]
    pub async fn get_orders(&self, sort: OrderSort) -> Result<Vec<OrderView>, DomainError> {
        let headers = self.store.list_orders(sort).await?;

        let mut views = Vec::with_capacity(headers.len());
        for header in headers {
            views.push(self.assemble(header).await?);
        }
        Ok(views)
    }

    /// Resolves one order by identifier with its line items and payments.
    ///
    /// An id that does not resolve to a stored header is `NotFound`; a
    /// header with no children yields a view with empty collections, which
    /// is a distinct, successful outcome.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<OrderView, DomainError> {
        let header = self
            .store
            .fetch_order(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Transaction"))?;
        self.assemble(header).await
    }

    /// Replaces an order: recomputes totals, re-stamps the transaction
    /// timestamp, swaps the full line item set, and appends the supplied
    /// payments — all in one unit of work.
    ///
    /// Existing payments are not deleted; the asymmetry with line items
    /// is preserved observed behavior.
    #[tracing::instrument(skip(self, input, details, payments))]
    pub async fn update_order(
        &self,
        id: OrderId,
        input: OrderInput,
        details: Vec<LineItemInput>,
        payments: Vec<PaymentInput>,
    ) -> Result<(), DomainError> {
        // A replace against an absent header would strand the new line
        // items without an owner, so existence is checked up front.
        self.store
            .fetch_order(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Transaction"))?;

        let (total_amount, total_qty) = aggregate_totals(&details);
        let header = OrderRecord {
            id,
            customer_id: input.customer_id,
            total_amount,
            total_qty,
            transaction_date: Utc::now(),
        };
        let items = stamp_line_items(id, details);
        let payments = stamp_payments(id, payments);

        self.store.replace_order(&header, &items, &payments).await?;
        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(order_id = %id, total_amount, "order replaced");
        Ok(())
    }

    /// Deletes an order header and cascades to its line items and
    /// payments in one unit of work.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), DomainError> {
        self.store.delete_order(id).await?;
        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }

    /// Applies a targeted quantity/subtotal/price adjustment to one line
    /// item. Fails with `NotFound` when the identifier does not resolve.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_line_item(&self, patch: LineItemPatch) -> Result<(), DomainError> {
        if self.store.update_line_item(&patch).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Transaction detail"))
        }
    }

    /// Applies a targeted status/paid-amount/payment-date adjustment to
    /// one payment. Fails with `NotFound` when the identifier does not
    /// resolve.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update_payment(&self, patch: PaymentPatch) -> Result<(), DomainError> {
        if self.store.update_payment(&patch).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Transaction payment"))
        }
    }

    // Two supplementary lookups per header, correlated on its identifier.
    async fn assemble(&self, header: OrderRecord) -> Result<OrderView, DomainError> {
        let details = self.store.line_items_for_order(header.id).await?;
        let payments = self.store.payments_for_order(header.id).await?;
        Ok(OrderView {
            header,
            details,
            payments,
        })
    }
}

fn aggregate_totals(details: &[LineItemInput]) -> (f64, f64) {
    let total_amount = details.iter().map(|d| d.subtotal).sum();
    let total_qty = details.iter().map(|d| d.quantity).sum();
    (total_amount, total_qty)
}

fn stamp_line_items(order_id: OrderId, details: Vec<LineItemInput>) -> Vec<LineItemRecord> {
    details
        .into_iter()
        .map(|d| LineItemRecord {
            id: LineItemId::new(),
            order_id,
            product_id: d.product_id,
            quantity: d.quantity,
            subtotal: d.subtotal,
            price: d.price,
        })
        .collect()
}

fn stamp_payments(order_id: OrderId, payments: Vec<PaymentInput>) -> Vec<PaymentRecord> {
    payments
        .into_iter()
        .map(|p| PaymentRecord {
            id: PaymentId::new(),
            order_id,
            payment_method_id: p.payment_method_id,
            status: p.status,
            paid_amount: p.paid_amount,
            payment_date: p.payment_date,
        })
        .collect()
}
