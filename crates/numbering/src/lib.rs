//! `billforge-numbering` — invoice number allocation.
//!
//! The allocator turns an atomic per-issuer counter into human-readable,
//! strictly increasing invoice numbers. All concurrency discipline lives in
//! the [`counter::CounterStore`] contract: one atomic increment-and-fetch,
//! no read-modify-write, no application-level locks around storage.

pub mod allocator;
pub mod counter;

pub use allocator::{InvoiceNumber, SequenceAllocator, SeriesPolicy};
pub use counter::CounterStore;
