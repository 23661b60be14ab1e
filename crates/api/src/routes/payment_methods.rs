//! Payment method endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::PaymentMethodId;
use domain::PaymentMethodInput;
use serde::Serialize;
use store::{PaymentMethodRecord, Store};

use crate::AppState;
use crate::error::{ApiError, parse_id};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /payment-method — create a payment method; the name must be unique.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<(StatusCode, Json<PaymentMethodRecord>), ApiError> {
    let method = state.catalog.create_payment_method(input).await?;
    Ok((StatusCode::CREATED, Json(method)))
}

/// GET /payment-methods — list all payment methods.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<PaymentMethodRecord>>, ApiError> {
    let methods = state.catalog.get_payment_methods().await?;
    Ok(Json(methods))
}

/// GET /payment-method/:id — resolve one payment method.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<PaymentMethodRecord>, ApiError> {
    let method_id: PaymentMethodId = parse_id(&id, "payment method ID")?;
    let method = state.catalog.get_payment_method(method_id).await?;
    Ok(Json(method))
}

/// PUT /payment-method/:id — update a payment method in place.
#[tracing::instrument(skip(state, input))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(input): Json<PaymentMethodInput>,
) -> Result<Json<PaymentMethodRecord>, ApiError> {
    let method_id: PaymentMethodId = parse_id(&id, "payment method ID")?;
    let method = state.catalog.update_payment_method(method_id, input).await?;
    Ok(Json(method))
}

/// DELETE /payment-method/:id — delete a payment method.
#[tracing::instrument(skip(state))]
pub async fn remove<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let method_id: PaymentMethodId = parse_id(&id, "payment method ID")?;
    state.catalog.delete_payment_method(method_id).await?;

    Ok(Json(MessageResponse {
        message: "Payment method deleted",
    }))
}
