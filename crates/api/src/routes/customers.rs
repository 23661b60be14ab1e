//! Customer endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CustomerId;
use domain::{CustomerInput, CustomerWithAddresses};
use serde::Serialize;
use store::{CustomerRecord, Store};

use crate::AppState;
use crate::error::{ApiError, parse_id};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /customers — create a customer; the email must be unique.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<CustomerRecord>), ApiError> {
    let customer = state.customers.create_customer(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customers — list all customers joined with their addresses.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CustomerWithAddresses>>, ApiError> {
    let customers = state.customers.get_customers().await?;
    Ok(Json(customers))
}

/// GET /customers/:id — resolve one customer with its addresses.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CustomerWithAddresses>, ApiError> {
    let customer_id: CustomerId = parse_id(&id, "customer ID")?;
    let customer = state.customers.get_customer(customer_id).await?;
    Ok(Json(customer))
}

/// PUT /customers/:id — update a customer in place.
#[tracing::instrument(skip(state, input))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<CustomerRecord>, ApiError> {
    let customer_id: CustomerId = parse_id(&id, "customer ID")?;
    let customer = state.customers.update_customer(customer_id, input).await?;
    Ok(Json(customer))
}

/// DELETE /customers/:id — delete a customer and its addresses; blocked
/// with a conflict while any order references the customer.
#[tracing::instrument(skip(state))]
pub async fn remove<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let customer_id: CustomerId = parse_id(&id, "customer ID")?;
    state.customers.delete_customer(customer_id).await?;

    Ok(Json(MessageResponse {
        message: "Customer and associated addresses deleted",
    }))
}
