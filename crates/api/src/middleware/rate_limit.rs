//! Fixed-window rate limiting for caller-facing routes.
//!
//! Counters live in a concurrent map keyed by client address. The window is
//! coarse on purpose: the relay only needs to stop runaway pollers, not
//! shape traffic precisely.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::AppState;
use crate::routes::error_response;
use malipo_shared::AppError;

/// Counter map size that triggers a sweep of expired windows.
const SWEEP_THRESHOLD: usize = 10_000;

/// Per-client counter covering one fixed window.
#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request limiter keyed by client address.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clients: DashMap<String, Window>,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_requests` per `window_secs` window.
    ///
    /// A `max_requests` of zero disables limiting entirely.
    #[must_use]
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
            clients: DashMap::new(),
        }
    }

    /// Records a request for `client` and returns whether it fits the budget.
    pub fn check(&self, client: &str) -> bool {
        if self.max_requests == 0 {
            return true;
        }

        let now = Instant::now();
        let allowed = {
            let mut window = self
                .clients
                .entry(client.to_string())
                .or_insert_with(|| Window {
                    started_at: now,
                    count: 0,
                });

            if now.duration_since(window.started_at) >= self.window {
                window.started_at = now;
                window.count = 0;
            }
            window.count = window.count.saturating_add(1);
            window.count <= self.max_requests
        };

        // Expired windows would otherwise pin one entry per client address
        // for the lifetime of the process.
        if self.clients.len() > SWEEP_THRESHOLD {
            self.clients
                .retain(|_, window| now.duration_since(window.started_at) < self.window);
        }

        allowed
    }
}

/// Resolves the client identity a request is counted against.
///
/// The first `X-Forwarded-For` entry wins so deployments behind a proxy
/// keep per-caller budgets. Without it the peer address is used, and as a
/// last resort all callers share one bucket.
fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(client) = forwarded {
        return client.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |info| info.0.ip().to_string())
}

/// Rejects requests that exceed the configured per-client budget.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);

    if state.rate_limiter.check(&client) {
        next.run(request).await
    } else {
        warn!(client = %client, "Rate limit exceeded");
        error_response(&AppError::RateLimited)
    }
}
