//! Processor webhook routes.
//!
//! The processor reports payment outcomes here. The endpoint always
//! acknowledges with 200: a payload this side cannot read is logged and
//! dropped, never bounced, so the processor does not retry forever.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::AppState;
use malipo_core::ledger::UpsertOutcome;
use malipo_gateway::CallbackEnvelope;
use malipo_shared::AppError;

/// Creates the processor callback routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/payment-callback", post(payment_callback))
}

/// POST `/payment-callback` - Records a processor-reported outcome.
///
/// Takes the body as a raw string: even syntactically broken payloads get
/// acknowledged instead of a framework-level reject.
async fn payment_callback(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let payload = match serde_json::from_str::<Value>(&body) {
        Ok(payload) => payload,
        Err(error) => {
            let malformed = AppError::MalformedCallback(format!("body is not JSON: {error}"));
            warn!(code = malformed.error_code(), error = %malformed, "Discarding callback");
            return Json(json!({ "success": true }));
        }
    };

    info!("Payment callback received");
    debug!(payload = %payload, "Callback payload");

    let envelope = CallbackEnvelope::new(payload);
    match envelope.extract() {
        Ok(event) => {
            match state
                .ledger
                .upsert(&event.reference, event.state, envelope.into_body())
            {
                UpsertOutcome::Created(record) => {
                    info!(
                        reference = %record.reference,
                        state = %record.state,
                        "Callback arrived before the initiation response, record created"
                    );
                }
                UpsertOutcome::Updated(record) => {
                    info!(
                        reference = %record.reference,
                        state = %record.state,
                        "Payment status updated"
                    );
                }
                UpsertOutcome::Rejected(existing) => {
                    warn!(
                        reference = %existing.reference,
                        kept = %existing.state,
                        reported = %event.state,
                        "Callback ignored, record already terminal"
                    );
                }
            }
        }
        Err(error) => {
            let malformed = AppError::MalformedCallback(error.to_string());
            warn!(code = malformed.error_code(), error = %malformed, "Discarding callback");
        }
    }

    Json(json!({ "success": true }))
}
