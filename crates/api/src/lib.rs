//! HTTP API server for the orders service.
//!
//! Provides REST endpoints for order management and service health,
//! with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders/{order_id}", get(routes::orders::get::<S>))
        .route("/orders/{order_id}", patch(routes::orders::update::<S>))
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

/// Wraps a store in the shared application state handlers receive.
pub fn create_state<S: OrderStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState { store })
}
