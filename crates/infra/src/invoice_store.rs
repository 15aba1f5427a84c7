//! In-memory invoice state store.

use std::collections::HashMap;
use std::sync::RwLock;

use billforge_core::{EngineError, EngineResult, InvoiceId, IssuerId};
use billforge_invoicing::{Invoice, InvoiceStore};

/// In-memory issuer-scoped invoice storage.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceStore {
    invoices: RwLock<HashMap<(IssuerId, InvoiceId), Invoice>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.invoices.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InvoiceStore for InMemoryInvoiceStore {
    fn persist(&self, invoice: &Invoice) -> EngineResult<()> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|_| EngineError::storage("invoice lock poisoned"))?;
        invoices.insert((invoice.issuer_id(), invoice.id()), invoice.clone());
        Ok(())
    }

    fn load(&self, issuer: IssuerId, invoice: InvoiceId) -> EngineResult<Invoice> {
        let invoices = self
            .invoices
            .read()
            .map_err(|_| EngineError::storage("invoice lock poisoned"))?;
        invoices
            .get(&(issuer, invoice))
            .cloned()
            .ok_or(EngineError::NotFound)
    }

    fn remove(&self, issuer: IssuerId, invoice: InvoiceId) -> EngineResult<()> {
        let mut invoices = self
            .invoices
            .write()
            .map_err(|_| EngineError::storage("invoice lock poisoned"))?;
        invoices
            .remove(&(issuer, invoice))
            .map(|_| ())
            .ok_or(EngineError::NotFound)
    }
}
