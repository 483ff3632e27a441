//! Weather API Service Library
//!
//! HTTP front end that answers one coordinate in South Korea with the
//! current observation, short-range forecast, particulate matter, sun
//! state and a short address, gathered concurrently from public upstreams.

pub mod access;
pub mod aggregator;
pub mod config;
pub mod envelope;
pub mod handlers;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router.
pub fn app(state: Arc<AppState>) -> Router {
    // Client-facing routes go through the access guard
    let guarded = Router::new()
        .route("/weather", get(handlers::weather::weather_handler))
        .route("/favicon.ico", get(handlers::health::favicon_handler))
        .route_layer(middleware::from_fn(access::access_guard));

    Router::new()
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .merge(guarded)
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
