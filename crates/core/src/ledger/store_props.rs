//! Property-based tests for ledger state transitions.

use proptest::prelude::*;
use serde_json::json;
use std::collections::HashMap;

use super::store::{InMemoryLedger, TransactionLedger};
use super::types::PaymentState;

fn state_strategy() -> impl Strategy<Value = PaymentState> {
    prop_oneof![
        Just(PaymentState::Pending),
        Just(PaymentState::Queued),
        Just(PaymentState::Completed),
        Just(PaymentState::Failed),
    ]
}

/// A small key space so generated sequences actually collide on keys.
fn reference_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("REF-A".to_string()),
        Just("REF-B".to_string()),
        Just("REF-C".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any sequence of upserts, each record matches a simple model:
    /// last-writer-wins until a terminal state lands, then that exact
    /// terminal state forever.
    #[test]
    fn prop_ledger_follows_transition_model(
        ops in proptest::collection::vec((reference_strategy(), state_strategy()), 1..40),
    ) {
        let ledger = InMemoryLedger::new();
        let mut model: HashMap<String, PaymentState> = HashMap::new();

        for (i, (reference, state)) in ops.iter().enumerate() {
            ledger.upsert(reference, *state, json!({"op": i}));

            let expected = model.entry(reference.clone()).or_insert(*state);
            if !expected.is_terminal() {
                *expected = *state;
            }
        }

        for (reference, expected) in &model {
            let record = ledger.get(reference);
            prop_assert!(record.is_some(), "upserted reference {} must be tracked", reference);
            prop_assert_eq!(record.unwrap().state, *expected);
        }
    }

    /// An applied write is immediately visible to a read of the same key.
    #[test]
    fn prop_applied_writes_are_read_back(
        reference in "[A-Z]{3}-[0-9]{4}",
        state in state_strategy(),
    ) {
        let ledger = InMemoryLedger::new();

        let outcome = ledger.upsert(&reference, state, json!({}));
        prop_assert!(outcome.was_applied());

        let record = ledger.get(&reference);
        prop_assert!(record.is_some());
        prop_assert_eq!(record.unwrap().state, state);
    }

    /// References never written are never reported.
    #[test]
    fn prop_unseen_references_stay_unknown(
        ops in proptest::collection::vec((reference_strategy(), state_strategy()), 0..20),
    ) {
        let ledger = InMemoryLedger::new();

        for (reference, state) in &ops {
            ledger.upsert(reference, *state, json!({}));
        }

        prop_assert!(ledger.get("REF-NEVER-SEEN").is_none());
    }
}
