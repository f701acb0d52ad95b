//! HTTP client for the external payment processor.
//!
//! The processor is treated as an opaque collaborator: bodies pass through
//! largely verbatim and only the handful of fields the relay acts on are
//! lifted out. No retries here; the processor webhook plus the caller's
//! polling make redelivery unnecessary.

pub mod client;
pub mod types;

pub use client::{GatewayError, HttpPaymentGateway, PaymentGateway};
pub use types::{CallbackEnvelope, CallbackError, CallbackEvent, ChargeRequest, InitiateResponse};
