//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing input. Rejected before anything reaches the processor.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Reference unknown to the ledger. A normal polling outcome while the
    /// webhook is still in flight, not a failure.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The processor answered with a non-2xx status.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// The processor did not answer within the configured timeout.
    #[error("Gateway request timed out")]
    GatewayTimeout,

    /// The processor could not be reached at all.
    #[error("Network error: {0}")]
    Network(String),

    /// Caller exceeded the per-client request budget.
    #[error("Too many requests")]
    RateLimited,

    /// Webhook payload missing required fields. Logged and acknowledged,
    /// never surfaced to the sender.
    #[error("Malformed callback: {0}")]
    MalformedCallback(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    ///
    /// `MalformedCallback` maps to 200: the webhook sender is always
    /// acknowledged so it does not retry against a live endpoint.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Gateway(_) | Self::Network(_) => 502,
            Self::GatewayTimeout => 504,
            Self::RateLimited => 429,
            Self::MalformedCallback(_) => 200,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::GatewayTimeout => "GATEWAY_TIMEOUT",
            Self::Network(_) => "NETWORK_ERROR",
            Self::RateLimited => "RATE_LIMITED",
            Self::MalformedCallback(_) => "MALFORMED_CALLBACK",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
