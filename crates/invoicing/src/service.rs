//! The engine facade: create, update, delete, verify, and the lifecycle
//! operations, composed from the tax aggregator, the sequence allocator, the
//! integrity hasher, and the lifecycle guard.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use billforge_core::{EngineError, EngineResult, InvoiceId, IssuerId, PartySnapshot};
use billforge_integrity as integrity;
use billforge_numbering::{CounterStore, SequenceAllocator, SeriesPolicy};
use billforge_tax::{self as tax, InvoiceKind, LineItem, RateLookup};

use crate::invoice::{Invoice, InvoiceStatus, PaymentStatus};
use crate::lifecycle;
use crate::store::{Clock, InvoiceStore};

/// Creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInvoice {
    pub issuer_id: IssuerId,
    pub kind: InvoiceKind,
    pub items: Vec<LineItem>,
    pub seller: PartySnapshot,
    pub buyer: PartySnapshot,
    /// Defaults to today (engine clock) when absent.
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub terms: Option<String>,
}

/// Content-changing update request. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceChanges {
    pub items: Option<Vec<LineItem>>,
    pub seller: Option<PartySnapshot>,
    pub buyer: Option<PartySnapshot>,
    pub kind: Option<InvoiceKind>,
    pub due_date: Option<NaiveDate>,
}

impl InvoiceChanges {
    fn is_empty(&self) -> bool {
        self.items.is_none()
            && self.seller.is_none()
            && self.buyer.is_none()
            && self.kind.is_none()
            && self.due_date.is_none()
    }
}

/// Outcome of a verification call: a binary signal, nothing reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub valid: bool,
}

/// The invoice computation & integrity engine.
///
/// Stateless between calls apart from what the injected stores hold; safe to
/// invoke concurrently across independent requests. The counter store is the
/// only shared mutable state, and it is touched through exactly one atomic
/// operation per creation.
#[derive(Debug, Clone)]
pub struct InvoiceEngine<S, C, R, K> {
    store: S,
    allocator: SequenceAllocator<C>,
    rates: R,
    clock: K,
}

impl<S, C, R, K> InvoiceEngine<S, C, R, K>
where
    S: InvoiceStore,
    C: CounterStore,
    R: RateLookup,
    K: Clock,
{
    pub fn new(store: S, counters: C, policy: SeriesPolicy, rates: R, clock: K) -> Self {
        Self {
            store,
            allocator: SequenceAllocator::new(counters, policy),
            rates,
            clock,
        }
    }

    /// Create an invoice: validate and compute first, allocate second, then
    /// fingerprint and persist.
    ///
    /// Ordering matters: a request that fails validation or rate lookup must
    /// not consume a number. If the persist fails after allocation the
    /// number is voided - logged, never reused - and the error surfaces.
    pub fn create_invoice(&self, cmd: CreateInvoice) -> EngineResult<Invoice> {
        let computed = tax::compute(&cmd.items, &cmd.seller, &cmd.buyer, cmd.kind, &self.rates)?;

        let now = self.clock.now();
        let issue_date = cmd.issue_date.unwrap_or_else(|| now.date_naive());
        let number = self.allocator.next(cmd.issuer_id, issue_date)?;

        let fingerprint = integrity::fingerprint(&integrity::InvoiceContent {
            number: &number.text,
            issue_date,
            seller: &cmd.seller,
            buyer: &cmd.buyer,
            lines: &computed.lines,
            totals: &computed.totals,
        });

        let invoice = Invoice {
            id: InvoiceId::new(),
            issuer_id: cmd.issuer_id,
            number,
            issue_date,
            due_date: cmd.due_date,
            kind: cmd.kind,
            seller: cmd.seller,
            buyer: cmd.buyer,
            interstate: computed.interstate,
            lines: computed.lines,
            totals: computed.totals,
            status: InvoiceStatus::Draft,
            payment_status: PaymentStatus::Pending,
            fingerprint,
            notes: cmd.notes,
            terms: cmd.terms,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.store.persist(&invoice) {
            // The number was already issued; the gap is permanent and the
            // counter stays where it is. Reusing it is what must never happen.
            warn!(
                issuer = %invoice.issuer_id,
                number = %invoice.number,
                error = %e,
                "persist failed after allocation; invoice number voided"
            );
            return Err(e);
        }

        info!(
            issuer = %invoice.issuer_id,
            invoice = %invoice.id,
            number = %invoice.number,
            interstate = invoice.interstate,
            grand_total = %invoice.totals.grand_total,
            "invoice created"
        );
        Ok(invoice)
    }

    /// Apply a content-changing update, recomputing and re-fingerprinting as
    /// the change requires.
    ///
    /// Totals are recomputed only when items, kind, or the jurisdiction
    /// shape changed - a party rename on an issued invoice re-runs the
    /// hasher but must not re-price the invoice against today's catalog.
    pub fn update_invoice(
        &self,
        issuer: IssuerId,
        id: InvoiceId,
        changes: InvoiceChanges,
    ) -> EngineResult<Invoice> {
        let mut invoice = self.store.load(issuer, id)?;
        lifecycle::ensure_content_mutable(&invoice)?;

        if changes.is_empty() {
            return Ok(invoice);
        }

        let parties_changed = changes.seller.is_some() || changes.buyer.is_some();
        if let Some(seller) = changes.seller {
            invoice.seller = seller;
        }
        if let Some(buyer) = changes.buyer {
            invoice.buyer = buyer;
        }
        if let Some(kind) = changes.kind {
            invoice.kind = kind;
        }
        if let Some(due_date) = changes.due_date {
            invoice.due_date = Some(due_date);
        }

        let now_interstate = !invoice.seller.same_jurisdiction(&invoice.buyer);
        let jurisdiction_changed = now_interstate != invoice.interstate;
        let items_changed = changes.items.is_some();

        if items_changed || jurisdiction_changed || changes.kind.is_some() {
            let items = match changes.items {
                Some(items) => items,
                None => invoice.input_items(),
            };
            let computed = tax::compute(
                &items,
                &invoice.seller,
                &invoice.buyer,
                invoice.kind,
                &self.rates,
            )?;
            invoice.interstate = computed.interstate;
            invoice.lines = computed.lines;
            invoice.totals = computed.totals;
        }

        if items_changed || jurisdiction_changed || parties_changed || changes.kind.is_some() {
            invoice.fingerprint = integrity::fingerprint(&invoice.content());
        }

        invoice.updated_at = self.clock.now();
        self.store.persist(&invoice)?;

        info!(issuer = %issuer, invoice = %id, "invoice updated");
        Ok(invoice)
    }

    /// Change notes/terms only. Legal at any lifecycle point, including after
    /// payment - notes carry no tax liability and sit outside the
    /// fingerprint.
    pub fn amend_notes(
        &self,
        issuer: IssuerId,
        id: InvoiceId,
        notes: Option<String>,
        terms: Option<String>,
    ) -> EngineResult<Invoice> {
        let mut invoice = self.store.load(issuer, id)?;
        invoice.notes = notes;
        invoice.terms = terms;
        invoice.updated_at = self.clock.now();
        self.store.persist(&invoice)?;
        Ok(invoice)
    }

    /// Delete an invoice. Refused outright once fully paid. The number is
    /// not returned to the pool.
    pub fn delete_invoice(&self, issuer: IssuerId, id: InvoiceId) -> EngineResult<()> {
        let invoice = self.store.load(issuer, id)?;
        lifecycle::ensure_deletable(&invoice)?;
        self.store.remove(issuer, id)?;
        info!(issuer = %issuer, invoice = %id, number = %invoice.number, "invoice deleted");
        Ok(())
    }

    /// Recompute the fingerprint from stored content and compare.
    ///
    /// Reports a binary valid/invalid signal; a violation is logged with
    /// both digests for investigation and never repaired.
    pub fn verify_invoice(&self, issuer: IssuerId, id: InvoiceId) -> EngineResult<IntegrityReport> {
        let invoice = self.store.load(issuer, id)?;
        match integrity::verify(&invoice.content(), invoice.fingerprint()) {
            Ok(()) => Ok(IntegrityReport { valid: true }),
            Err(EngineError::IntegrityViolation { stored, recomputed }) => {
                warn!(
                    issuer = %issuer,
                    invoice = %id,
                    number = %invoice.number,
                    stored = %stored,
                    recomputed = %recomputed,
                    "integrity violation detected"
                );
                Ok(IntegrityReport { valid: false })
            }
            Err(other) => Err(other),
        }
    }

    /// Move the invoice to a new status, subject to the state machine and
    /// the payment gate. Does not touch content or the fingerprint.
    pub fn transition_status(
        &self,
        issuer: IssuerId,
        id: InvoiceId,
        to: InvoiceStatus,
    ) -> EngineResult<Invoice> {
        let mut invoice = self.store.load(issuer, id)?;
        lifecycle::ensure_status_transition(invoice.status(), to, invoice.payment_status())?;
        invoice.status = to;
        invoice.updated_at = self.clock.now();
        self.store.persist(&invoice)?;
        info!(issuer = %issuer, invoice = %id, status = ?to, "status changed");
        Ok(invoice)
    }

    /// Move the payment status forward. Content stays untouched; freezing
    /// happens implicitly once the new payment status is Paid.
    pub fn record_payment(
        &self,
        issuer: IssuerId,
        id: InvoiceId,
        to: PaymentStatus,
    ) -> EngineResult<Invoice> {
        let mut invoice = self.store.load(issuer, id)?;
        lifecycle::ensure_payment_transition(invoice.payment_status(), to)?;
        invoice.payment_status = to;
        invoice.updated_at = self.clock.now();
        self.store.persist(&invoice)?;
        info!(issuer = %issuer, invoice = %id, payment = ?to, "payment recorded");
        Ok(invoice)
    }

    /// Flag a sent invoice whose due date has passed.
    pub fn mark_overdue(&self, issuer: IssuerId, id: InvoiceId) -> EngineResult<Invoice> {
        let invoice = self.store.load(issuer, id)?;
        let today = self.clock.now().date_naive();
        match invoice.due_date() {
            Some(due) if due < today => self.transition_status(issuer, id, InvoiceStatus::Overdue),
            Some(_) => Err(EngineError::invalid_transition("invoice is not past due")),
            None => Err(EngineError::invalid_transition("invoice has no due date")),
        }
    }
}
