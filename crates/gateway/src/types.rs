//! Wire types for the processor API, both directions.

use malipo_core::ledger::PaymentState;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Outbound charge request forwarded to the processor.
///
/// Field names follow the processor's API. Values arrive from the caller
/// and pass through with only the phone number rewritten.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeRequest {
    /// Subscriber phone number, normalized to the 254 form.
    pub phone_number: String,
    /// Charge amount.
    pub amount: Decimal,
    /// Processor channel the charge is billed against.
    pub channel_id: u64,
    /// Payment provider identifier, e.g. "m-pesa".
    pub provider: String,
    /// Mobile network code, when the provider requires one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_code: Option<String>,
    /// Caller-chosen reference identifying this payment attempt.
    pub external_reference: String,
    /// Name of the paying customer.
    pub customer_name: String,
    /// URL the processor reports the outcome to.
    pub callback_url: String,
    /// Caller metadata the processor echoes back in the webhook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Parsed initiation response.
///
/// Only the fields the relay acts on are lifted out; `raw` keeps the
/// processor's full answer for passthrough to the caller.
#[derive(Debug, Clone)]
pub struct InitiateResponse {
    /// Whether the processor accepted the charge. An absent flag counts
    /// as accepted, matching processors that only send it on failure.
    pub success: bool,
    /// Initial status label reported by the processor.
    pub status: Option<String>,
    /// Processor-assigned reference, when one is issued.
    pub reference: Option<String>,
    /// The processor's verbatim response body.
    pub raw: Value,
}

impl InitiateResponse {
    /// Lifts the relay-relevant fields out of a processor response body.
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        let success = body.get("success").and_then(Value::as_bool).unwrap_or(true);
        let status = body
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string);
        let reference = body
            .get("reference")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            success,
            status,
            reference,
            raw: body,
        }
    }
}

/// Extraction errors for webhook payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CallbackError {
    /// Payload carries no usable reference.
    #[error("Callback payload has no reference")]
    MissingReference,
    /// Payload carries no usable status or result code.
    #[error("Callback payload has no status or result code")]
    MissingStatus,
}

/// The event a webhook payload reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackEvent {
    /// Reference of the payment attempt the event belongs to.
    pub reference: String,
    /// State the processor reports for it.
    pub state: PaymentState,
}

/// A raw webhook payload plus the rules for reading it.
///
/// Processors disagree on shape: some send the fields at the top level,
/// some wrap them in a `response` object, and failure reports may carry a
/// numeric `ResultCode` instead of a `Status` label.
#[derive(Debug, Clone)]
pub struct CallbackEnvelope {
    body: Value,
}

impl CallbackEnvelope {
    /// Wraps a webhook body.
    #[must_use]
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Extracts the reported event.
    ///
    /// # Errors
    ///
    /// Returns a [`CallbackError`] when the payload has no usable reference
    /// or no usable status.
    pub fn extract(&self) -> Result<CallbackEvent, CallbackError> {
        let scope = self
            .body
            .get("response")
            .filter(|v| v.is_object())
            .unwrap_or(&self.body);

        let reference = scope
            .get("ExternalReference")
            .or_else(|| scope.get("reference"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(CallbackError::MissingReference)?;

        let state = scope
            .get("Status")
            .and_then(Value::as_str)
            .and_then(PaymentState::from_callback_status)
            .or_else(|| {
                scope
                    .get("ResultCode")
                    .and_then(Value::as_i64)
                    .map(PaymentState::from_result_code)
            })
            .ok_or(CallbackError::MissingStatus)?;

        Ok(CallbackEvent {
            reference: reference.to_string(),
            state,
        })
    }

    /// Consumes the envelope, returning the full raw payload.
    #[must_use]
    pub fn into_body(self) -> Value {
        self.body
    }
}
