//! Engine error model.
//!
//! Keep this focused on deterministic engine failures (validation, missing
//! rate data, allocation, lifecycle policy, integrity findings). Transport
//! and user-facing messaging belong to the calling layer.

use thiserror::Error;

/// Result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine-level error.
///
/// Every failure the engine can surface is one of these kinds; none of them
/// is swallowed internally. The engine never returns a result that looks
/// successful but is numerically or logically wrong - invalid input rejects
/// the whole operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A line item failed validation. Always the caller's fault; never
    /// retried automatically. Carries the 1-based line number and the reason.
    #[error("invalid line item {line}: {reason}")]
    InvalidLineItem { line: usize, reason: String },

    /// No tax rate is known for a classification code. May succeed after the
    /// external rate catalog is updated; the engine never guesses a rate.
    #[error("no tax rate for classification code '{code}'")]
    UnknownClassification { code: String },

    /// The atomic counter increment could not be performed. Transient; the
    /// whole creation is safe to retry since no number was issued.
    #[error("invoice number allocation failed: {0}")]
    AllocationFailed(String),

    /// A mutation was refused by the lifecycle guard.
    #[error("invoice is immutable: {0}")]
    ImmutableInvoice(String),

    /// The stored fingerprint does not match the recomputed one. Never
    /// auto-repaired; surfaced and logged for investigation.
    #[error("integrity violation: stored {stored}, recomputed {recomputed}")]
    IntegrityViolation { stored: String, recomputed: String },

    /// A status or payment-status transition outside the state machine.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested invoice was not found.
    #[error("not found")]
    NotFound,

    /// Storage-layer failure outside the allocation path.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn invalid_line(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidLineItem {
            line,
            reason: reason.into(),
        }
    }

    pub fn unknown_classification(code: impl Into<String>) -> Self {
        Self::UnknownClassification { code: code.into() }
    }

    pub fn allocation_failed(msg: impl Into<String>) -> Self {
        Self::AllocationFailed(msg.into())
    }

    pub fn immutable(msg: impl Into<String>) -> Self {
        Self::ImmutableInvoice(msg.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
