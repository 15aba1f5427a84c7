//! In-memory counter store.

use std::collections::HashMap;
use std::sync::RwLock;

use billforge_core::{EngineError, EngineResult, IssuerId};
use billforge_numbering::CounterStore;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CounterKey {
    issuer: IssuerId,
    series: String,
}

/// In-memory per-issuer sequence counters.
///
/// The whole increment - including creating a missing counter at 1 - runs
/// under one write lock, so it is a single atomic step as the trait
/// requires. Intended for tests/dev and single-process deployments;
/// a multi-instance deployment needs the same contract from its database.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: RwLock<HashMap<CounterKey, u64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter without incrementing (observability only).
    pub fn peek(&self, issuer: IssuerId, series: &str) -> Option<u64> {
        let counters = self.counters.read().ok()?;
        counters
            .get(&CounterKey {
                issuer,
                series: series.to_string(),
            })
            .copied()
    }
}

impl CounterStore for InMemoryCounterStore {
    fn increment_and_fetch(&self, issuer: IssuerId, series: &str) -> EngineResult<u64> {
        let mut counters = self
            .counters
            .write()
            .map_err(|_| EngineError::allocation_failed("counter lock poisoned"))?;
        let counter = counters
            .entry(CounterKey {
                issuer,
                series: series.to_string(),
            })
            .or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}
