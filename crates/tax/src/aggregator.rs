//! Tax aggregator: whole-invoice computation.
//!
//! Decides the jurisdiction shape once for the invoice, resolves each line's
//! rate through the external catalog, runs the splitter per line, and sums
//! the rounded line values into invoice totals. No partial results: the
//! first bad line or missing rate rejects the whole computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use billforge_core::{EngineError, EngineResult, PartySnapshot};

use crate::line::{ComputedLineItem, LineItem};
use crate::splitter;

/// External tax-rate catalog: classification code → percentage.
///
/// Supplied by the calling layer. Implementations must return `None` for
/// unknown codes - the engine surfaces that as `UnknownClassification`
/// rather than defaulting to any rate.
pub trait RateLookup {
    fn rate_for(&self, hsn_sac: &str) -> Option<Decimal>;
}

impl<T> RateLookup for &T
where
    T: RateLookup + ?Sized,
{
    fn rate_for(&self, hsn_sac: &str) -> Option<Decimal> {
        (**self).rate_for(hsn_sac)
    }
}

impl<S: ::std::hash::BuildHasher> RateLookup for std::collections::HashMap<String, Decimal, S> {
    fn rate_for(&self, hsn_sac: &str) -> Option<Decimal> {
        self.get(hsn_sac).copied()
    }
}

impl<T> RateLookup for std::sync::Arc<T>
where
    T: RateLookup + ?Sized,
{
    fn rate_for(&self, hsn_sac: &str) -> Option<Decimal> {
        (**self).rate_for(hsn_sac)
    }
}

/// Invoice taxation mode. An explicit flag - never inferred from a zero
/// rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Regular tax invoice: every line is taxed at its catalog rate.
    TaxInvoice,
    /// Untaxed invoice: the splitter is bypassed, all tax fields are zero.
    BillOfSupply,
}

/// Invoice-level totals. Exact sums of rounded line values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTotals {
    /// Sum of base amounts.
    pub subtotal: Decimal,
    pub discount_total: Decimal,
    /// Sum of taxable values.
    pub taxable_amount: Decimal,
    pub cgst_total: Decimal,
    pub sgst_total: Decimal,
    pub igst_total: Decimal,
    /// Sum of all tax components.
    pub tax_total: Decimal,
    /// taxable_amount + tax_total, exactly.
    pub grand_total: Decimal,
}

/// Result of computing one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputation {
    /// The single jurisdiction decision applied to every line.
    pub interstate: bool,
    pub lines: Vec<ComputedLineItem>,
    pub totals: TaxTotals,
}

/// Compute all lines and totals for one invoice.
///
/// The interstate flag is decided once, from the normalized state codes of
/// the two party snapshots - an invoice is never part intrastate and part
/// interstate. Deterministic: no clock, no hidden state.
pub fn compute<R: RateLookup>(
    items: &[LineItem],
    seller: &PartySnapshot,
    buyer: &PartySnapshot,
    kind: InvoiceKind,
    rates: &R,
) -> EngineResult<TaxComputation> {
    if items.is_empty() {
        return Err(EngineError::invalid_line(0, "invoice must have line items"));
    }

    let interstate = !seller.same_jurisdiction(buyer);

    let mut lines = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let line_no = idx + 1;
        let row = match kind {
            InvoiceKind::TaxInvoice => {
                let pct = rates
                    .rate_for(&item.hsn_sac)
                    .ok_or_else(|| EngineError::unknown_classification(item.hsn_sac.clone()))?;
                splitter::split_line(line_no, item, pct, interstate)?
            }
            InvoiceKind::BillOfSupply => splitter::untaxed_line(line_no, item)?,
        };
        lines.push(row);
    }

    let mut totals = TaxTotals {
        subtotal: Decimal::ZERO,
        discount_total: Decimal::ZERO,
        taxable_amount: Decimal::ZERO,
        cgst_total: Decimal::ZERO,
        sgst_total: Decimal::ZERO,
        igst_total: Decimal::ZERO,
        tax_total: Decimal::ZERO,
        grand_total: Decimal::ZERO,
    };
    for row in &lines {
        totals.subtotal += row.base_amount;
        totals.discount_total += row.discount_amount;
        totals.taxable_amount += row.taxable_value;
        totals.cgst_total += row.cgst;
        totals.sgst_total += row.sgst;
        totals.igst_total += row.igst;
    }
    totals.tax_total = totals.cgst_total + totals.sgst_total + totals.igst_total;
    totals.grand_total = totals.taxable_amount + totals.tax_total;

    Ok(TaxComputation {
        interstate,
        lines,
        totals,
    })
}
