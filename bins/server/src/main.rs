//! Malipo API Server
//!
//! Main entry point for the Malipo payment relay.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use malipo_api::middleware::RateLimiter;
use malipo_api::{AppState, create_router};
use malipo_core::ledger::InMemoryLedger;
use malipo_gateway::HttpPaymentGateway;
use malipo_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "malipo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; aborts when gateway credentials are missing
    let config = AppConfig::load()?;

    // Create the transaction ledger
    let ledger = InMemoryLedger::with_config(config.ledger.max_capacity, config.ledger.ttl_secs);
    info!(
        max_capacity = config.ledger.max_capacity,
        ttl_secs = config.ledger.ttl_secs,
        "Transaction ledger ready"
    );

    // Create the processor client
    let gateway = HttpPaymentGateway::new(
        config.gateway.base_url.clone(),
        config.gateway.auth_token.clone(),
        Duration::from_secs(config.gateway.timeout_secs),
    )?;
    info!(
        base_url = %config.gateway.base_url,
        timeout_secs = config.gateway.timeout_secs,
        "Payment gateway client configured"
    );

    // Create application state
    let state = AppState {
        ledger: Arc::new(ledger),
        gateway: Arc::new(gateway),
        rate_limiter: Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window_secs,
        )),
        default_network_code: config.gateway.default_network_code.clone(),
    };

    // Create router
    let app = create_router(state, &config.cors);

    // Start server; connect info feeds the rate limiter's client keys
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
