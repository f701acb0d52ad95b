//! Transaction status polling routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::AppState;
use crate::routes::{error_response, gateway_error_response};
use malipo_shared::AppError;

/// Creates the status query routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transaction-status", get(transaction_status))
}

/// Query parameters for the status lookup.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    /// Reference of the payment attempt to look up.
    pub reference: Option<String>,
    /// Read path selector. `gateway` proxies a live processor query
    /// instead of reading the ledger.
    pub source: Option<String>,
}

/// GET `/transaction-status` - Returns the last reconciled state for a reference.
///
/// A 404 is a normal outcome while the webhook is still in flight; callers
/// are expected to poll.
async fn transaction_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    let Some(reference) = query
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
    else {
        return error_response(&AppError::Validation(
            "Query parameter 'reference' is required".to_string(),
        ));
    };

    debug!(reference = %reference, "Checking payment status");

    if query.source.as_deref() == Some("gateway") {
        return match state.gateway.transaction_status(reference).await {
            Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Err(error) => gateway_error_response(&error),
        };
    }

    match state.ledger.get(reference) {
        Some(record) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "status": record.state,
                "details": record.details,
            })),
        )
            .into_response(),
        None => error_response(&AppError::NotFound(
            "Status not found or still pending.".to_string(),
        )),
    }
}
