//! HTTP API server for the order-management service.
//!
//! Provides REST endpoints for the order workflow and its thin-CRUD
//! collaborators, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use domain::{CatalogService, CustomerService, OrderWorkflow};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
///
/// The services receive their store handle at construction; handlers
/// never open connections of their own.
pub struct AppState<S: Store> {
    pub orders: OrderWorkflow<S>,
    pub customers: CustomerService<S>,
    pub catalog: CatalogService<S>,
}

/// Creates the application state over a single shared store handle.
pub fn create_state<S: Store>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState {
        orders: OrderWorkflow::new(store.clone()),
        customers: CustomerService::new(store.clone()),
        catalog: CatalogService::new(store),
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store>(state: Arc<AppState<S>>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        // Orders
        .route("/transaction", post(routes::transactions::create::<S>))
        .route("/transactions", get(routes::transactions::list::<S>))
        .route("/transaction/{id}", get(routes::transactions::get::<S>))
        .route("/transaction/{id}", put(routes::transactions::update::<S>))
        .route(
            "/transaction/{id}",
            delete(routes::transactions::remove::<S>),
        )
        // Customers
        .route("/customers", post(routes::customers::create::<S>))
        .route("/customers", get(routes::customers::list::<S>))
        .route("/customers/{id}", get(routes::customers::get::<S>))
        .route("/customers/{id}", put(routes::customers::update::<S>))
        .route("/customers/{id}", delete(routes::customers::remove::<S>))
        // Customer addresses
        .route(
            "/customer-addresses",
            post(routes::customer_addresses::create::<S>),
        )
        .route(
            "/customer-addresses",
            get(routes::customer_addresses::list::<S>),
        )
        .route(
            "/customer-addresses/{id}",
            get(routes::customer_addresses::get::<S>),
        )
        .route(
            "/customer-addresses/{id}",
            put(routes::customer_addresses::update::<S>),
        )
        .route(
            "/customer-addresses/{id}",
            delete(routes::customer_addresses::remove::<S>),
        )
        // Products
        .route("/product", post(routes::products::create::<S>))
        .route("/products", get(routes::products::list::<S>))
        .route("/product/{id}", get(routes::products::get::<S>))
        .route("/product/{id}", put(routes::products::update::<S>))
        .route("/product/{id}", delete(routes::products::remove::<S>))
        // Payment methods
        .route(
            "/payment-method",
            post(routes::payment_methods::create::<S>),
        )
        .route(
            "/payment-methods",
            get(routes::payment_methods::list::<S>),
        )
        .route(
            "/payment-method/{id}",
            get(routes::payment_methods::get::<S>),
        )
        .route(
            "/payment-method/{id}",
            put(routes::payment_methods::update::<S>),
        )
        .route(
            "/payment-method/{id}",
            delete(routes::payment_methods::remove::<S>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
