//! Order (transaction) endpoints: the multi-record workflow surface.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::{LineItemInput, OrderInput, OrderView, PaymentInput};
use serde::{Deserialize, Serialize};
use store::{OrderSort, Store};

use crate::AppState;
use crate::error::{ApiError, parse_id};

/// Inbound payload: a header plus nested detail and payment collections.
#[derive(Deserialize)]
pub struct TransactionPayload {
    pub transaction: OrderInput,
    #[serde(default)]
    pub details: Vec<LineItemInput>,
    #[serde(default)]
    pub payments: Vec<PaymentInput>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub transaction: OrderView,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /transaction — create an order with its details and payments in
/// one atomic unit of work.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(payload): Json<TransactionPayload>,
) -> Result<(StatusCode, Json<TransactionResponse>), ApiError> {
    let view = state
        .orders
        .create_order(payload.transaction, payload.details, payload.payments)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse { transaction: view }),
    ))
}

/// GET /transactions — list all orders, enriched, in the requested sort
/// order (transaction date ascending by default).
#[tracing::instrument(skip(state, query))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<OrderView>>, ApiError> {
    let sort = OrderSort::from_params(
        query.order_by.as_deref(),
        query.order_direction.as_deref(),
    );
    let views = state.orders.get_orders(sort).await?;
    Ok(Json(views))
}

/// GET /transaction/:id — resolve one order with its details and payments.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderView>, ApiError> {
    let order_id: OrderId = parse_id(&id, "ID")?;
    let view = state.orders.get_order(order_id).await?;
    Ok(Json(view))
}

/// PUT /transaction/:id — full replace of the order aggregate.
#[tracing::instrument(skip(state, payload))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionPayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id: OrderId = parse_id(&id, "ID")?;
    state
        .orders
        .update_order(
            order_id,
            payload.transaction,
            payload.details,
            payload.payments,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Transaction updated successfully",
    }))
}

/// DELETE /transaction/:id — delete the order and cascade to its
/// details and payments.
#[tracing::instrument(skip(state))]
pub async fn remove<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let order_id: OrderId = parse_id(&id, "ID")?;
    state.orders.delete_order(order_id).await?;

    Ok(Json(MessageResponse {
        message: "Transaction and associated details/payments deleted",
    }))
}
