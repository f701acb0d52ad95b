//! Payment initiation routes.
//!
//! Validates the caller's request, forwards the charge to the processor,
//! and on acceptance registers the attempt in the transaction ledger so
//! the polling path can observe it.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::AppState;
use crate::routes::{error_response, gateway_error_response};
use malipo_core::ledger::{PaymentState, UpsertOutcome};
use malipo_core::phone::normalize_phone;
use malipo_gateway::ChargeRequest;
use malipo_shared::AppError;

/// Creates the payment initiation routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/initiate-payment", post(initiate_payment))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for initiating a mobile-money charge.
///
/// Every field is optional at the serde level so missing values surface as
/// a `VALIDATION_ERROR` envelope instead of a bare deserialization reject.
#[derive(Debug, Deserialize)]
pub struct InitiatePaymentRequest {
    /// Subscriber phone number in local (07../01..) or 254 form.
    pub phone_number: Option<String>,
    /// Charge amount. Must be positive.
    pub amount: Option<Decimal>,
    /// Processor channel the charge is billed against.
    pub channel_id: Option<u64>,
    /// Payment provider identifier, e.g. "m-pesa".
    pub provider: Option<String>,
    /// Mobile network code, when the provider requires one.
    pub network_code: Option<String>,
    /// Caller-chosen reference identifying this payment attempt.
    pub external_reference: Option<String>,
    /// Name of the paying customer.
    pub customer_name: Option<String>,
    /// URL the processor reports the outcome to.
    pub callback_url: Option<String>,
    /// Arbitrary caller metadata echoed back in the processor webhook.
    pub metadata: Option<Value>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/initiate-payment` - Forwards a charge to the processor.
async fn initiate_payment(
    State(state): State<AppState>,
    Json(payload): Json<InitiatePaymentRequest>,
) -> impl IntoResponse {
    let charge = match build_charge(&payload, state.default_network_code.as_deref()) {
        Ok(charge) => charge,
        Err(error) => {
            info!(error = %error, "Rejecting initiation request");
            return error_response(&error);
        }
    };

    info!(
        reference = %charge.external_reference,
        amount = %charge.amount,
        channel_id = charge.channel_id,
        "Initiating payment"
    );

    let caller_reference = charge.external_reference.clone();
    match state.gateway.initiate(charge).await {
        Ok(response) if response.success => {
            // Prefer the processor-assigned reference; webhooks will carry
            // that one when it exists.
            let reference = response.reference.clone().unwrap_or(caller_reference);
            let state_label = initial_state(response.status.as_deref());

            match state.ledger.upsert(&reference, state_label, response.raw.clone()) {
                UpsertOutcome::Created(record) | UpsertOutcome::Updated(record) => {
                    info!(
                        reference = %record.reference,
                        state = %record.state,
                        "Tracking payment attempt"
                    );
                }
                UpsertOutcome::Rejected(existing) => {
                    warn!(
                        reference = %existing.reference,
                        state = %existing.state,
                        "Reference already settled, keeping the terminal record"
                    );
                }
            }

            (StatusCode::OK, Json(response.raw)).into_response()
        }
        Ok(response) => {
            // The processor answered 2xx but declined the charge. Its
            // answer passes through untouched and nothing is tracked.
            info!("Processor declined the charge");
            (StatusCode::OK, Json(response.raw)).into_response()
        }
        Err(error) => {
            warn!(error = %error, "Payment initiation failed");
            gateway_error_response(&error)
        }
    }
}

/// Validates the request and assembles the outbound charge.
fn build_charge(
    request: &InitiatePaymentRequest,
    default_network_code: Option<&str>,
) -> Result<ChargeRequest, AppError> {
    let phone_number = required(request.phone_number.as_deref(), "phone_number")?;
    let provider = required(request.provider.as_deref(), "provider")?;
    let external_reference = required(request.external_reference.as_deref(), "external_reference")?;
    let customer_name = required(request.customer_name.as_deref(), "customer_name")?;
    let callback_url = required(request.callback_url.as_deref(), "callback_url")?;
    let amount = request
        .amount
        .ok_or_else(|| AppError::Validation("Missing required field: amount".to_string()))?;
    let channel_id = request
        .channel_id
        .ok_or_else(|| AppError::Validation("Missing required field: channel_id".to_string()))?;

    let phone_number =
        normalize_phone(phone_number).map_err(|e| AppError::Validation(e.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(AppError::Validation("Amount must be positive".to_string()));
    }

    let network_code = request
        .network_code
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or(default_network_code)
        .map(str::to_string);

    Ok(ChargeRequest {
        phone_number,
        amount,
        channel_id,
        provider: provider.to_string(),
        network_code,
        external_reference: external_reference.to_string(),
        customer_name: customer_name.to_string(),
        callback_url: callback_url.to_string(),
        metadata: request.metadata.clone(),
    })
}

/// Rejects absent or blank required fields.
fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, AppError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing required field: {name}")))
}

/// Maps the processor's reported initial status onto the internal state.
///
/// Unknown labels are tracked as `PENDING` rather than dropped: the
/// webhook settles the truth later.
fn initial_state(status: Option<&str>) -> PaymentState {
    match status {
        Some(label) => PaymentState::parse(label).unwrap_or_else(|| {
            warn!(status = %label, "Unrecognized initial status from processor, tracking as PENDING");
            PaymentState::Pending
        }),
        None => PaymentState::Pending,
    }
}
