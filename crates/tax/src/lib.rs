//! `billforge-tax` — deterministic tax computation.
//!
//! Two layers: [`splitter`] computes a single line (base, discount, taxable
//! value, levy split), [`aggregator`] composes it over a whole invoice with
//! one jurisdiction decision and external rate lookup. Both are pure: no
//! clock, no shared state, identical inputs give identical outputs.

pub mod aggregator;
pub mod line;
pub mod splitter;

pub use aggregator::{compute, InvoiceKind, RateLookup, TaxComputation, TaxTotals};
pub use line::{ComputedLineItem, LineItem};
pub use splitter::{split_line, untaxed_line};
