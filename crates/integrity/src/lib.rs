//! `billforge-integrity` — tamper detection for issued invoices.
//!
//! A fingerprint is a SHA-256 digest over a canonical serialization of
//! exactly the fields that define an invoice's legal content. Operational
//! fields (status, payment status, notes, audit timestamps, due date) are
//! excluded so legitimate lifecycle transitions never invalidate it.
//!
//! The hasher is a pure function over an explicit borrowed snapshot - it
//! never touches a live persistence object, which is what makes it
//! independently testable and its guarantee precise: it detects tampering
//! that happened outside the normal update path.

pub mod canonical;
pub mod fingerprint;

pub use canonical::{canonical_bytes, InvoiceContent};
pub use fingerprint::{fingerprint, verify, IntegrityRecord, FINGERPRINT_ALGORITHM};
