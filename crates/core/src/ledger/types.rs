//! Payment states and the record tracked per reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// State of a payment attempt.
///
/// A record moves from the non-terminal states into exactly one terminal
/// state and stays there:
/// - (absent) -> `Queued` when initiation succeeds first
/// - (absent) -> `Completed` / `Failed` when the webhook lands first
/// - `Pending` / `Queued` -> `Completed` / `Failed` via the webhook
/// - `Completed` / `Failed` -> nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentState {
    /// Tracked, but the processor has not confirmed queuing yet.
    Pending,
    /// The processor accepted the charge and queued it for the subscriber.
    Queued,
    /// The payment settled successfully (terminal).
    Completed,
    /// The payment failed or was cancelled (terminal).
    Failed,
}

impl PaymentState {
    /// Returns the wire label of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Queued => "QUEUED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// Parses a state from its wire label (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "QUEUED" => Some(Self::Queued),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns true once no further state change is allowed.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Maps a processor-reported webhook status label to a state.
    ///
    /// `Success` maps to `Completed`, labels matching an internal state pass
    /// through, and any other non-empty label is treated as a failure
    /// report. Returns `None` for empty labels.
    pub fn from_callback_status(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.eq_ignore_ascii_case("success") {
            return Some(Self::Completed);
        }
        Some(Self::parse(trimmed).unwrap_or(Self::Failed))
    }

    /// Maps a numeric processor result code to a state.
    ///
    /// Zero reports success; every other code is a failure.
    #[must_use]
    pub fn from_result_code(code: i64) -> Self {
        if code == 0 { Self::Completed } else { Self::Failed }
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Record tracked per reference in the transaction ledger.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    /// Opaque reference identifying the payment attempt. The sole key.
    pub reference: String,
    /// Last reconciled state.
    pub state: PaymentState,
    /// Raw payload of whichever event produced the current state.
    pub details: Value,
    /// When the reference was first observed.
    pub created_at: DateTime<Utc>,
    /// When the record last changed.
    pub updated_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Creates a record for a newly observed reference.
    #[must_use]
    pub fn new(reference: &str, state: PaymentState, details: Value) -> Self {
        let now = Utc::now();
        Self {
            reference: reference.to_string(),
            state,
            details,
            created_at: now,
            updated_at: now,
        }
    }
}
