//! Persistence and clock seams.
//!
//! The engine reads and writes whole invoice states; everything else about
//! storage (schema, transactions, caching) belongs to the implementation.

use chrono::{DateTime, Utc};

use billforge_core::{EngineResult, InvoiceId, IssuerId};

use crate::invoice::Invoice;

/// Invoice state storage, scoped by issuer.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - enforce issuer scoping (an issuer can never load another's invoices)
/// - store writes atomically per invoice (no partially written records)
/// - bound the time spent on any call and surface failures as errors rather
///   than hanging
pub trait InvoiceStore: Send + Sync {
    /// Write the invoice state, replacing any previous state for its id.
    fn persist(&self, invoice: &Invoice) -> EngineResult<()>;

    /// Load the current state. `EngineError::NotFound` when absent.
    fn load(&self, issuer: IssuerId, invoice: InvoiceId) -> EngineResult<Invoice>;

    /// Remove the invoice. `EngineError::NotFound` when absent.
    fn remove(&self, issuer: IssuerId, invoice: InvoiceId) -> EngineResult<()>;
}

impl<S> InvoiceStore for std::sync::Arc<S>
where
    S: InvoiceStore + ?Sized,
{
    fn persist(&self, invoice: &Invoice) -> EngineResult<()> {
        (**self).persist(invoice)
    }

    fn load(&self, issuer: IssuerId, invoice: InvoiceId) -> EngineResult<Invoice> {
        (**self).load(issuer, invoice)
    }

    fn remove(&self, issuer: IssuerId, invoice: InvoiceId) -> EngineResult<()> {
        (**self).remove(issuer, invoice)
    }
}

/// Host-supplied wall clock.
///
/// Pure computations never read time; the clock is consulted only for
/// creation/update timestamping and the overdue check.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl<C> Clock for std::sync::Arc<C>
where
    C: Clock + ?Sized,
{
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
