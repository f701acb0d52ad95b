//! API route definitions.

use axum::{Json, Router, http::StatusCode, middleware, response::IntoResponse, response::Response};
use serde_json::json;

use crate::{AppState, middleware::rate_limit::rate_limit_middleware};
use malipo_gateway::GatewayError;
use malipo_shared::AppError;

pub mod callbacks;
pub mod health;
pub mod payments;
pub mod status;

/// Creates the API router with rate limiting on caller-facing routes.
///
/// The processor callback and the health check stay outside the limiter:
/// throttling must never push the processor into webhook retry loops.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Caller-facing routes behind the per-client budget
    let limited_routes = Router::new()
        .merge(payments::routes())
        .merge(status::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(callbacks::routes())
        .merge(limited_routes)
}

/// Renders an error as the standard response envelope.
pub(crate) fn error_response(error: &AppError) -> Response {
    (
        http_status(error),
        Json(json!({
            "success": false,
            "error": error.to_string(),
            "code": error.error_code(),
        })),
    )
        .into_response()
}

/// Renders a processor failure as the standard envelope, carrying the
/// processor's own HTTP status when it answered at all.
pub(crate) fn gateway_error_response(error: &GatewayError) -> Response {
    let (app_error, gateway_status) = match error {
        GatewayError::Timeout => (AppError::GatewayTimeout, None),
        GatewayError::Network(message) => (AppError::Network(message.clone()), None),
        GatewayError::Upstream { status, message } => {
            (AppError::Gateway(message.clone()), Some(*status))
        }
        GatewayError::InvalidResponse(message) => (AppError::Gateway(message.clone()), None),
    };

    let mut body = json!({
        "success": false,
        "error": app_error.to_string(),
        "code": app_error.error_code(),
    });
    if let Some(status) = gateway_status {
        body["gateway_status"] = json!(status);
    }

    (http_status(&app_error), Json(body)).into_response()
}

fn http_status(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
