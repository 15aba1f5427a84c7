//! Series policy and the sequence allocator.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use billforge_core::{EngineError, EngineResult, IssuerId};

use crate::counter::CounterStore;

/// How an issuer's invoice numbers are rendered.
///
/// The textual shape is `<PREFIX>-<PERIOD>-<NNNN>`; the period is the fiscal
/// year (April–March) of the issue date, so each issuer restarts a fresh
/// series every fiscal year while the counter behind any one series only
/// ever goes up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPolicy {
    pub prefix: String,
    /// Zero-pad width of the numeric component.
    pub pad_width: usize,
}

impl Default for SeriesPolicy {
    fn default() -> Self {
        Self {
            prefix: "INV".to_string(),
            pad_width: 4,
        }
    }
}

impl SeriesPolicy {
    pub fn new(prefix: impl Into<String>, pad_width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            pad_width,
        }
    }

    /// Fiscal-year series key for an issue date, e.g. `2025-26` for any date
    /// from 2025-04-01 through 2026-03-31.
    pub fn period_for(&self, issue_date: NaiveDate) -> String {
        let start_year = if issue_date.month() >= 4 {
            issue_date.year()
        } else {
            issue_date.year() - 1
        };
        format!("{}-{:02}", start_year, (start_year + 1) % 100)
    }

    fn render(&self, period: &str, sequence: u64) -> String {
        format!(
            "{}-{}-{:0width$}",
            self.prefix,
            period,
            sequence,
            width = self.pad_width
        )
    }
}

/// An allocated invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber {
    /// Rendered form, e.g. `INV-2025-26-0042`.
    pub text: String,
    /// Series key the sequence belongs to.
    pub series: String,
    /// Strictly increasing numeric component within the series.
    pub sequence: u64,
}

impl core::fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Issues unique, monotonically increasing invoice numbers per issuer.
///
/// Safe under concurrent allocation because the single mutation is the
/// store's atomic increment-and-fetch. A failed increment surfaces as
/// `AllocationFailed` and issues nothing, so the caller can retry the whole
/// creation.
#[derive(Debug, Clone)]
pub struct SequenceAllocator<C> {
    store: C,
    policy: SeriesPolicy,
}

impl<C: CounterStore> SequenceAllocator<C> {
    pub fn new(store: C, policy: SeriesPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &SeriesPolicy {
        &self.policy
    }

    /// Allocate the next number for an issuer in the series of `issue_date`.
    pub fn next(&self, issuer: IssuerId, issue_date: NaiveDate) -> EngineResult<InvoiceNumber> {
        let series = self.policy.period_for(issue_date);
        let sequence = self
            .store
            .increment_and_fetch(issuer, &series)
            .map_err(|e| match e {
                EngineError::AllocationFailed(_) => e,
                other => EngineError::allocation_failed(other.to_string()),
            })?;

        Ok(InvoiceNumber {
            text: self.policy.render(&series, sequence),
            series,
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billforge_core::EngineResult;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Test double: a correct single-process counter.
    #[derive(Default)]
    struct MapCounter {
        counters: Mutex<HashMap<(IssuerId, String), u64>>,
    }

    impl CounterStore for MapCounter {
        fn increment_and_fetch(&self, issuer: IssuerId, series: &str) -> EngineResult<u64> {
            let mut counters = self
                .counters
                .lock()
                .map_err(|_| EngineError::storage("lock poisoned"))?;
            let counter = counters.entry((issuer, series.to_string())).or_insert(0);
            *counter += 1;
            Ok(*counter)
        }
    }

    /// Test double: storage is down.
    struct DownCounter;

    impl CounterStore for DownCounter {
        fn increment_and_fetch(&self, _issuer: IssuerId, _series: &str) -> EngineResult<u64> {
            Err(EngineError::storage("counter store unavailable"))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_allocation_starts_at_one() {
        let alloc = SequenceAllocator::new(MapCounter::default(), SeriesPolicy::default());
        let n = alloc.next(IssuerId::new(), date(2025, 6, 1)).unwrap();
        assert_eq!(n.sequence, 1);
        assert_eq!(n.text, "INV-2025-26-0001");
    }

    #[test]
    fn sequences_increase_without_gaps_per_issuer() {
        let alloc = SequenceAllocator::new(MapCounter::default(), SeriesPolicy::default());
        let issuer = IssuerId::new();
        let seqs: Vec<u64> = (0..5)
            .map(|_| alloc.next(issuer, date(2025, 6, 1)).unwrap().sequence)
            .collect();
        assert_eq!(seqs, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn issuers_do_not_share_counters() {
        let alloc = SequenceAllocator::new(MapCounter::default(), SeriesPolicy::default());
        let a = alloc.next(IssuerId::new(), date(2025, 6, 1)).unwrap();
        let b = alloc.next(IssuerId::new(), date(2025, 6, 1)).unwrap();
        assert_eq!(a.sequence, 1);
        assert_eq!(b.sequence, 1);
    }

    #[test]
    fn fiscal_year_rolls_over_in_april() {
        let policy = SeriesPolicy::default();
        assert_eq!(policy.period_for(date(2025, 3, 31)), "2024-25");
        assert_eq!(policy.period_for(date(2025, 4, 1)), "2025-26");
        assert_eq!(policy.period_for(date(2026, 1, 15)), "2025-26");
    }

    #[test]
    fn new_fiscal_year_starts_a_fresh_series() {
        let alloc = SequenceAllocator::new(MapCounter::default(), SeriesPolicy::default());
        let issuer = IssuerId::new();
        let in_fy25 = alloc.next(issuer, date(2026, 3, 20)).unwrap();
        let in_fy26 = alloc.next(issuer, date(2026, 4, 2)).unwrap();
        assert_eq!(in_fy25.text, "INV-2025-26-0001");
        assert_eq!(in_fy26.text, "INV-2026-27-0001");
        assert_ne!(in_fy25.series, in_fy26.series);
    }

    #[test]
    fn storage_failure_surfaces_as_allocation_failed() {
        let alloc = SequenceAllocator::new(DownCounter, SeriesPolicy::default());
        let err = alloc.next(IssuerId::new(), date(2025, 6, 1)).unwrap_err();
        assert!(matches!(err, EngineError::AllocationFailed(_)));
    }

    #[test]
    fn custom_prefix_and_padding() {
        let alloc = SequenceAllocator::new(MapCounter::default(), SeriesPolicy::new("BOS", 6));
        let n = alloc.next(IssuerId::new(), date(2025, 11, 3)).unwrap();
        assert_eq!(n.text, "BOS-2025-26-000001");
    }
}
