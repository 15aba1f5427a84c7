//! Atomic sequence counter abstraction.

use billforge_core::{EngineResult, IssuerId};

/// Per-issuer, per-series monotonic counter.
///
/// The counter is the only shared mutable state in the engine, and this
/// trait is the only way to touch it. One method, one atomic step.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - perform the increment and the read as a **single atomic operation** at
///   the storage layer (an atomic upsert-and-increment, a database sequence,
///   a counter document with `$inc`) - never a read followed by a write;
///   multiple service instances may increment the same counter concurrently
/// - atomically create a missing counter at 1 on its first increment;
///   concurrent first-ever calls must observe distinct values, never both 1
/// - never decrement and never reset: numbers are deletion-independent, so
///   a deleted invoice's number is gone for good
/// - bound the time spent talking to storage and surface failures as errors
///   (mapped to `AllocationFailed` by the allocator) rather than hanging
pub trait CounterStore: Send + Sync {
    /// Atomically add 1 to the counter for `(issuer, series)` and return the
    /// new value. The first call for a series returns 1.
    fn increment_and_fetch(&self, issuer: IssuerId, series: &str) -> EngineResult<u64>;
}

impl<S> CounterStore for std::sync::Arc<S>
where
    S: CounterStore + ?Sized,
{
    fn increment_and_fetch(&self, issuer: IssuerId, series: &str) -> EngineResult<u64> {
        (**self).increment_and_fetch(issuer, series)
    }
}
