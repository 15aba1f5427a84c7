//! `billforge-core` — shared domain foundation for the invoicing engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the engine error taxonomy, strongly-typed identifiers, party snapshots with
//! normalized jurisdiction codes, and the monetary rounding policy every
//! computation in the workspace goes through.

pub mod error;
pub mod id;
pub mod party;
pub mod rounding;

pub use error::{EngineError, EngineResult};
pub use id::{InvoiceId, IssuerId};
pub use party::{PartySnapshot, StateCode};
pub use rounding::{round_currency, split_half, CURRENCY_DP};
