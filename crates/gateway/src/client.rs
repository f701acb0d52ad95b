//! Processor HTTP client.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::types::{ChargeRequest, InitiateResponse};

/// Error types for processor calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The processor did not answer within the configured timeout.
    #[error("Gateway request timed out")]
    Timeout,

    /// The processor could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The processor answered with a non-2xx status.
    #[error("Gateway returned {status}: {message}")]
    Upstream {
        /// HTTP status reported by the processor.
        status: u16,
        /// Message extracted from the processor's error body.
        message: String,
    },

    /// The processor answered 2xx with a body that is not JSON.
    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(error.to_string())
        }
    }
}

/// Client abstraction over the external payment processor.
///
/// Handlers hold a `dyn PaymentGateway`, so tests substitute a scripted
/// stub and never open a socket.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Forwards a charge to the processor. Called once per initiation
    /// request; the relay never retries on its own.
    async fn initiate(&self, request: ChargeRequest) -> Result<InitiateResponse, GatewayError>;

    /// Queries the processor for the live status of a payment attempt.
    async fn transaction_status(&self, reference: &str) -> Result<Value, GatewayError>;
}

/// [`PaymentGateway`] backed by the processor's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HttpPaymentGateway {
    /// Creates a client for the configured processor endpoint.
    ///
    /// Every request carries `auth_token` verbatim in the Authorization
    /// header and is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn initiate(&self, request: ChargeRequest) -> Result<InitiateResponse, GatewayError> {
        let url = format!("{}/payments", self.base_url);
        debug!(url = %url, reference = %request.external_reference, "Forwarding charge to processor");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth_token.as_str())
            .json(&request)
            .send()
            .await?;

        let body = read_success_body(response).await?;
        Ok(InitiateResponse::from_body(body))
    }

    async fn transaction_status(&self, reference: &str) -> Result<Value, GatewayError> {
        let url = format!("{}/transaction-status", self.base_url);
        debug!(reference = %reference, "Querying processor for live status");

        let response = self
            .client
            .get(&url)
            .query(&[("reference", reference)])
            .header(AUTHORIZATION, self.auth_token.as_str())
            .send()
            .await?;

        read_success_body(response).await
    }
}

/// Reads a response body, mapping non-2xx answers and non-JSON bodies onto
/// [`GatewayError`].
async fn read_success_body(response: reqwest::Response) -> Result<Value, GatewayError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(GatewayError::Upstream {
            status: status.as_u16(),
            message: upstream_message(&text),
        });
    }

    serde_json::from_str(&text).map_err(|error| GatewayError::InvalidResponse(error.to_string()))
}

/// Pulls a human-readable message out of an upstream error body.
///
/// Processors disagree on the field name, so a few are tried before
/// falling back to the raw body.
fn upstream_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["error_message", "message", "error"] {
            if let Some(message) = json.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no response body".to_string()
    } else {
        trimmed.to_string()
    }
}
