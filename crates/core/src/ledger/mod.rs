//! Status reconciliation for payment attempts.
//!
//! Two unordered event sources write here: the synchronous initiation
//! response and the asynchronous processor webhook. The ledger merges both
//! into one record per reference that the polling path reads.

pub mod store;
pub mod types;

#[cfg(test)]
mod store_props;

pub use store::{InMemoryLedger, TransactionLedger, UpsertOutcome};
pub use types::{PaymentState, TransactionRecord};
