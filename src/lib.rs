//! Fare pricing service for AGTS luxury ground transportation.
//!
//! The booking page collects trip details and a distance/duration from the
//! mapping service, then asks this service for a quote.

pub mod config;
pub mod error;
pub mod pricing;
pub mod routes;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pricing::PricingService;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub pricing: PricingService,
}

/// Full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/api/pricing", pricing::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
