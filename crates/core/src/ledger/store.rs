//! The transaction ledger.
//!
//! A bounded, expiring key-value store that reconciles events from two
//! unordered sources (the initiation response and the processor webhook)
//! into one record per reference. Per-key atomicity comes from the cache's
//! entry API, so racing writers can never interleave a read-modify-write.

use moka::ops::compute::{CompResult, Op};
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use super::types::{PaymentState, TransactionRecord};

/// Default maximum number of tracked references.
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Default time-to-live for records (24 hours).
const DEFAULT_TTL_SECS: u64 = 86_400;

/// Result of a ledger upsert.
#[derive(Debug, Clone)]
pub enum UpsertOutcome {
    /// A record was created for a previously unseen reference.
    Created(Arc<TransactionRecord>),
    /// An existing record was overwritten.
    Updated(Arc<TransactionRecord>),
    /// The update was ignored because the record is already terminal.
    /// Carries the record the ledger kept.
    Rejected(Arc<TransactionRecord>),
}

impl UpsertOutcome {
    /// Returns the record the ledger holds after the operation.
    #[must_use]
    pub fn record(&self) -> &Arc<TransactionRecord> {
        match self {
            Self::Created(record) | Self::Updated(record) | Self::Rejected(record) => record,
        }
    }

    /// Returns true if the write was applied.
    #[must_use]
    pub fn was_applied(&self) -> bool {
        matches!(self, Self::Created(_) | Self::Updated(_))
    }
}

/// Keyed store of payment attempts.
///
/// Implementations must serialize writes per reference: concurrent upserts
/// of the same key behave as if applied one after the other.
pub trait TransactionLedger: Send + Sync {
    /// Inserts or overwrites the record for `reference`.
    ///
    /// Writes apply last-writer-wins while the record is non-terminal. Once
    /// terminal, a state-changing write is ignored; re-asserting the same
    /// terminal state refreshes `details` and `updated_at`.
    fn upsert(&self, reference: &str, state: PaymentState, details: Value) -> UpsertOutcome;

    /// Returns the record for `reference`, if one is tracked.
    ///
    /// `None` means unknown or not yet observed, never failed.
    fn get(&self, reference: &str) -> Option<Arc<TransactionRecord>>;

    /// Returns the number of references currently tracked.
    fn entry_count(&self) -> u64;
}

/// In-memory [`TransactionLedger`] bounded by capacity and per-record TTL.
///
/// Thread-safe and cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct InMemoryLedger {
    cache: Cache<String, Arc<TransactionRecord>>,
}

impl InMemoryLedger {
    /// Creates a ledger with default sizing.
    ///
    /// Default: 10,000 references max, 24 hour TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a ledger with custom sizing.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of references to track
    /// * `ttl_secs` - Seconds a record survives after its last update
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Runs cache maintenance tasks.
    ///
    /// Eviction bookkeeping is deferred; calling this makes `entry_count`
    /// precise.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLedger for InMemoryLedger {
    fn upsert(&self, reference: &str, state: PaymentState, details: Value) -> UpsertOutcome {
        let result = self
            .cache
            .entry(reference.to_string())
            .and_compute_with(|existing| match existing {
                None => Op::Put(Arc::new(TransactionRecord::new(reference, state, details))),
                Some(entry) => {
                    let current = entry.into_value();
                    if current.state.is_terminal() && current.state != state {
                        Op::Nop
                    } else {
                        let mut updated = (*current).clone();
                        updated.state = state;
                        updated.details = details;
                        updated.updated_at = Utc::now();
                        Op::Put(Arc::new(updated))
                    }
                }
            });

        match result {
            CompResult::Inserted(entry) => UpsertOutcome::Created(entry.into_value()),
            CompResult::ReplacedWith(entry) => UpsertOutcome::Updated(entry.into_value()),
            CompResult::Unchanged(entry) => UpsertOutcome::Rejected(entry.into_value()),
            // The closure always puts on a vacant key and never removes.
            CompResult::StillNone(_) | CompResult::Removed(_) => {
                unreachable!("ledger compute closure only puts or keeps records")
            }
        }
    }

    fn get(&self, reference: &str) -> Option<Arc<TransactionRecord>> {
        self.cache.get(reference)
    }

    fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
