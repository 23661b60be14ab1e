//! Product endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::ProductInput;
use serde::Serialize;
use store::{ProductRecord, Store};

use crate::AppState;
use crate::error::{ApiError, parse_id};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// POST /product — create a product; the code must be unique.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductRecord>), ApiError> {
    let product = state.catalog.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// GET /products — list all products.
#[tracing::instrument(skip(state))]
pub async fn list<S: Store>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductRecord>>, ApiError> {
    let products = state.catalog.get_products().await?;
    Ok(Json(products))
}

/// GET /product/:id — resolve one product.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductRecord>, ApiError> {
    let product_id: ProductId = parse_id(&id, "product ID")?;
    let product = state.catalog.get_product(product_id).await?;
    Ok(Json(product))
}

/// PUT /product/:id — update a product in place.
#[tracing::instrument(skip(state, input))]
pub async fn update<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductRecord>, ApiError> {
    let product_id: ProductId = parse_id(&id, "product ID")?;
    let product = state.catalog.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// DELETE /product/:id — delete a product.
#[tracing::instrument(skip(state))]
pub async fn remove<S: Store>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let product_id: ProductId = parse_id(&id, "product ID")?;
    state.catalog.delete_product(product_id).await?;

    Ok(Json(MessageResponse {
        message: "Product deleted",
    }))
}
