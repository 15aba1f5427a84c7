//! The invoice record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use billforge_core::{InvoiceId, IssuerId, PartySnapshot};
use billforge_integrity::{InvoiceContent, IntegrityRecord};
use billforge_numbering::InvoiceNumber;
use billforge_tax::{ComputedLineItem, InvoiceKind, TaxTotals};

/// Invoice status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid | Self::Cancelled)
    }
}

/// Payment status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// A persisted invoice.
///
/// Content fields (number, dates, parties, lines, totals) are written by the
/// engine's create/update paths only; the fingerprint is recomputed whenever
/// they change. Status, payment status, notes, and audit timestamps are
/// operational and outside the fingerprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub(crate) id: InvoiceId,
    pub(crate) issuer_id: IssuerId,
    pub(crate) number: InvoiceNumber,
    pub(crate) issue_date: NaiveDate,
    pub(crate) due_date: Option<NaiveDate>,
    pub(crate) kind: InvoiceKind,
    pub(crate) seller: PartySnapshot,
    pub(crate) buyer: PartySnapshot,
    pub(crate) interstate: bool,
    pub(crate) lines: Vec<ComputedLineItem>,
    pub(crate) totals: TaxTotals,
    pub(crate) status: InvoiceStatus,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) fingerprint: IntegrityRecord,
    pub(crate) notes: Option<String>,
    pub(crate) terms: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn id(&self) -> InvoiceId {
        self.id
    }

    pub fn issuer_id(&self) -> IssuerId {
        self.issuer_id
    }

    pub fn number(&self) -> &InvoiceNumber {
        &self.number
    }

    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn kind(&self) -> InvoiceKind {
        self.kind
    }

    pub fn seller(&self) -> &PartySnapshot {
        &self.seller
    }

    pub fn buyer(&self) -> &PartySnapshot {
        &self.buyer
    }

    /// The single jurisdiction decision this invoice was computed under.
    pub fn interstate(&self) -> bool {
        self.interstate
    }

    pub fn lines(&self) -> &[ComputedLineItem] {
        &self.lines
    }

    pub fn totals(&self) -> &TaxTotals {
        &self.totals
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn fingerprint(&self) -> &IntegrityRecord {
        &self.fingerprint
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn terms(&self) -> Option<&str> {
        self.terms.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// The original caller-supplied line items, recovered from the computed
    /// rows. Used when an update changes parties but not items.
    pub fn input_items(&self) -> Vec<billforge_tax::LineItem> {
        self.lines.iter().map(|row| row.item.clone()).collect()
    }

    /// Borrowed snapshot of the fields covered by the fingerprint.
    pub fn content(&self) -> InvoiceContent<'_> {
        InvoiceContent {
            number: &self.number.text,
            issue_date: self.issue_date,
            seller: &self.seller,
            buyer: &self.buyer,
            lines: &self.lines,
            totals: &self.totals,
        }
    }
}
