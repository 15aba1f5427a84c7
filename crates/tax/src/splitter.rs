//! Rate splitter: single-line computation and levy split.
//!
//! Rounding happens at the line level only (two places, half-up); aggregate
//! totals are exact sums of line values. Validation rejects the line before
//! any arithmetic - the engine never clamps.

use rust_decimal::Decimal;

use billforge_core::{round_currency, split_half, EngineError, EngineResult};

use crate::line::{ComputedLineItem, LineItem};

/// Upper bound accepted for quantity and rate. Values beyond this are a data
/// entry error, not a real invoice, and would start eroding `Decimal`
/// precision in the multiplications.
const MAX_MAGNITUDE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

fn validate(line_no: usize, item: &LineItem, tax_rate_pct: Decimal) -> EngineResult<()> {
    if item.quantity <= Decimal::ZERO {
        return Err(EngineError::invalid_line(line_no, "quantity must be positive"));
    }
    if item.quantity > MAX_MAGNITUDE {
        return Err(EngineError::invalid_line(line_no, "quantity out of range"));
    }
    if item.rate < Decimal::ZERO {
        return Err(EngineError::invalid_line(line_no, "rate must not be negative"));
    }
    if item.rate > MAX_MAGNITUDE {
        return Err(EngineError::invalid_line(line_no, "rate out of range"));
    }
    if item.discount_pct < Decimal::ZERO || item.discount_pct > Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid_line(
            line_no,
            "discount percentage must be between 0 and 100",
        ));
    }
    if tax_rate_pct < Decimal::ZERO {
        return Err(EngineError::invalid_line(
            line_no,
            "tax rate must not be negative",
        ));
    }
    Ok(())
}

fn base_and_taxable(item: &LineItem) -> (Decimal, Decimal, Decimal) {
    let base = round_currency(item.quantity * item.rate);
    let discount = round_currency(base * item.discount_pct / Decimal::ONE_HUNDRED);
    let taxable = base - discount;
    (base, discount, taxable)
}

/// Compute one taxed line.
///
/// `interstate` selects the levy shape: a single IGST component across
/// jurisdictions, or two CGST/SGST halves within one. The halves always sum
/// exactly to the rounded tax amount; an odd cent lands on CGST.
pub fn split_line(
    line_no: usize,
    item: &LineItem,
    tax_rate_pct: Decimal,
    interstate: bool,
) -> EngineResult<ComputedLineItem> {
    validate(line_no, item, tax_rate_pct)?;

    let (base_amount, discount_amount, taxable_value) = base_and_taxable(item);
    let tax = round_currency(taxable_value * tax_rate_pct / Decimal::ONE_HUNDRED);

    let (cgst, sgst, igst) = if interstate {
        (Decimal::ZERO, Decimal::ZERO, tax)
    } else {
        let (central, state) = split_half(tax);
        (central, state, Decimal::ZERO)
    };

    Ok(ComputedLineItem {
        line_no,
        item: item.clone(),
        tax_rate_pct,
        base_amount,
        discount_amount,
        taxable_value,
        cgst,
        sgst,
        igst,
        line_total: taxable_value + tax,
    })
}

/// Compute one line of an untaxed invoice (bill of supply).
///
/// Same validation and discount arithmetic as the taxed path; every tax
/// component is zero and the line total equals the taxable value.
pub fn untaxed_line(line_no: usize, item: &LineItem) -> EngineResult<ComputedLineItem> {
    validate(line_no, item, Decimal::ZERO)?;

    let (base_amount, discount_amount, taxable_value) = base_and_taxable(item);

    Ok(ComputedLineItem {
        line_no,
        item: item.clone(),
        tax_rate_pct: Decimal::ZERO,
        base_amount,
        discount_amount,
        taxable_value,
        cgst: Decimal::ZERO,
        sgst: Decimal::ZERO,
        igst: Decimal::ZERO,
        line_total: taxable_value,
    })
}
