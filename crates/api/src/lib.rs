//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes for the payment relay
//! - Rate limiting middleware
//! - CORS and request tracing layers

pub mod middleware;
pub mod routes;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use malipo_core::ledger::TransactionLedger;
use malipo_gateway::PaymentGateway;
use malipo_shared::CorsConfig;

use crate::middleware::RateLimiter;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Transaction ledger tracking payment attempts.
    pub ledger: Arc<dyn TransactionLedger>,
    /// Client for the external payment processor.
    pub gateway: Arc<dyn PaymentGateway>,
    /// Per-client request counters.
    pub rate_limiter: Arc<RateLimiter>,
    /// Network code applied when an initiation request omits one.
    pub default_network_code: Option<String>,
}

/// Creates the main application router.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .with_state(state)
}

/// Builds the CORS layer for the configured origin.
///
/// Deployments pin the single browser origin that hosts the payment page;
/// `*` opens the relay to any origin. An unparseable origin fails closed.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allowed_origin == "*" {
        AllowOrigin::any()
    } else {
        match HeaderValue::from_str(&config.allowed_origin) {
            Ok(origin) => AllowOrigin::exact(origin),
            Err(_) => {
                error!(
                    origin = %config.allowed_origin,
                    "Invalid CORS origin in configuration, cross-origin requests disabled"
                );
                AllowOrigin::list(Vec::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
