//! Customer address endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::AddressId;
use domain::AddressInput;
use serde::Serialize;
use store::{AddressRecord, Store};

use crate::AppState;
use crate::error::{ApiError, parse_id};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /customer-addresses — create an address for a customer.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(input): Json<AddressInput>,
) -> Result<(StatusCode, Json<AddressRecord>), ApiError> {
    let address = state.customers.create_address(input).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

/// GET /customer-addresses — list all addresses.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<AddressRecord>>, ApiError> {
    let addresses = state.customers.get_addresses().await?;
    Ok(Json(addresses))
}

/// GET /customer-addresses/:id — resolve one address.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<AddressRecord>, ApiError> {
    let address_id: AddressId = parse_id(&id, "customer address ID")?;
    let address = state.customers.get_address(address_id).await?;
    Ok(Json(address))
}

/// PUT /customer-addresses/:id — replace an address in place.
#[tracing::instrument(skip(state, input))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(input): Json<AddressInput>,
) -> Result<Json<AddressRecord>, ApiError> {
    let address_id: AddressId = parse_id(&id, "customer address ID")?;
    let address = state.customers.update_address(address_id, input).await?;
    Ok(Json(address))
}

/// DELETE /customer-addresses/:id — delete an address.
#[tracing::instrument(skip(state))]
pub async fn remove<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let address_id: AddressId = parse_id(&id, "customer address ID")?;
    state.customers.delete_address(address_id).await?;

    Ok(Json(MessageResponse {
        message: "Customer address deleted",
    }))
}
