//! Lifecycle guard: the status and payment state machines.
//!
//! Status: `Draft → Sent → {Paid, Overdue, Cancelled}`, `Overdue → Paid`;
//! Paid and Cancelled are terminal. Payment: `Pending → Partial → Paid`,
//! `Pending → Paid`; Paid is terminal. Status may reach Paid only once the
//! payment status is Paid, and a fully paid invoice's content is frozen.

use billforge_core::{EngineError, EngineResult};

use crate::invoice::{Invoice, InvoiceStatus, PaymentStatus};

/// Check a status transition against the state machine and the payment gate.
pub fn ensure_status_transition(
    current: InvoiceStatus,
    to: InvoiceStatus,
    payment: PaymentStatus,
) -> EngineResult<()> {
    use InvoiceStatus::*;

    let allowed = matches!(
        (current, to),
        (Draft, Sent) | (Sent, Paid) | (Sent, Overdue) | (Sent, Cancelled) | (Overdue, Paid)
    );
    if !allowed {
        return Err(EngineError::invalid_transition(format!(
            "status {current:?} cannot become {to:?}"
        )));
    }
    if to == Paid && payment != PaymentStatus::Paid {
        return Err(EngineError::invalid_transition(
            "status can move to paid only once payment is received in full",
        ));
    }
    Ok(())
}

/// Check a payment-status transition.
pub fn ensure_payment_transition(current: PaymentStatus, to: PaymentStatus) -> EngineResult<()> {
    use PaymentStatus::*;

    let allowed = matches!((current, to), (Pending, Partial) | (Pending, Paid) | (Partial, Paid));
    if !allowed {
        return Err(EngineError::invalid_transition(format!(
            "payment status {current:?} cannot become {to:?}"
        )));
    }
    Ok(())
}

/// Refuse content mutation on a fully paid invoice.
///
/// Metadata irrelevant to liability (notes) goes through a separate path and
/// is not subject to this guard.
pub fn ensure_content_mutable(invoice: &Invoice) -> EngineResult<()> {
    if invoice.payment_status() == PaymentStatus::Paid {
        return Err(EngineError::immutable(
            "payment received in full; content is frozen",
        ));
    }
    if invoice.status() == InvoiceStatus::Paid {
        return Err(EngineError::immutable("invoice is paid; content is frozen"));
    }
    Ok(())
}

/// Refuse deletion of a fully paid invoice.
pub fn ensure_deletable(invoice: &Invoice) -> EngineResult<()> {
    if invoice.payment_status() == PaymentStatus::Paid || invoice.status() == InvoiceStatus::Paid {
        return Err(EngineError::immutable(
            "paid invoices are never hard-deleted",
        ));
    }
    Ok(())
}
