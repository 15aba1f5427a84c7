//! Invoice line items: caller input and computed rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line as supplied by the caller.
///
/// Immutable once the invoice is issued except through the full
/// recompute-and-reissue update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    /// Classification code used for rate lookup (HSN for goods, SAC for
    /// services).
    pub hsn_sac: String,
    /// Quantity in `unit`s. Must be > 0; fractional quantities are fine.
    pub quantity: Decimal,
    pub unit: String,
    /// Per-unit price. Must be >= 0.
    pub rate: Decimal,
    /// Discount percentage on the base amount, in [0, 100].
    pub discount_pct: Decimal,
}

impl LineItem {
    pub fn new(
        description: impl Into<String>,
        hsn_sac: impl Into<String>,
        quantity: Decimal,
        unit: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            description: description.into(),
            hsn_sac: hsn_sac.into(),
            quantity,
            unit: unit.into(),
            rate,
            discount_pct: Decimal::ZERO,
        }
    }

    pub fn with_discount(mut self, discount_pct: Decimal) -> Self {
        self.discount_pct = discount_pct;
        self
    }
}

/// A line item plus everything derived from it. Never mutated independently;
/// produced only by the splitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedLineItem {
    /// 1-based position on the invoice.
    pub line_no: usize,
    pub item: LineItem,
    /// Tax rate percentage applied to this line (zero on untaxed invoices).
    pub tax_rate_pct: Decimal,
    /// quantity × rate, rounded.
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    /// base − discount; what the tax applies to.
    pub taxable_value: Decimal,
    /// Central half of an intrastate levy.
    pub cgst: Decimal,
    /// State half of an intrastate levy.
    pub sgst: Decimal,
    /// Single interstate levy.
    pub igst: Decimal,
    /// taxable value + all tax components.
    pub line_total: Decimal,
}

impl ComputedLineItem {
    /// Sum of the line's tax components. By construction exactly one of
    /// cgst+sgst or igst is non-zero (never both).
    pub fn tax_amount(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}
