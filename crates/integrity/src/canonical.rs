//! Canonical serialization of invoice content.
//!
//! The byte form is versioned and deterministic: fields are written in a
//! fixed, explicit order (never the insertion order of an ambient map),
//! free-text fields are length-prefixed so no delimiter collision can forge
//! a boundary, and decimals are normalized so `90` and `90.00` canonicalize
//! identically regardless of how a value round-tripped through storage.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use billforge_core::PartySnapshot;
use billforge_tax::{ComputedLineItem, TaxTotals};

/// Format tag written at the head of the canonical byte stream. Bump it if
/// the field set or encoding ever changes.
pub const CANONICAL_VERSION: &str = "bf1";

/// Borrowed snapshot of the fields that define an invoice's legal content.
///
/// This is the hasher's entire input. Status, payment status, due date,
/// notes, and audit timestamps are deliberately absent.
#[derive(Debug, Clone, Copy)]
pub struct InvoiceContent<'a> {
    pub number: &'a str,
    pub issue_date: NaiveDate,
    pub seller: &'a PartySnapshot,
    pub buyer: &'a PartySnapshot,
    pub lines: &'a [ComputedLineItem],
    pub totals: &'a TaxTotals,
}

struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    fn new() -> Self {
        let mut buf = Vec::with_capacity(512);
        buf.extend_from_slice(CANONICAL_VERSION.as_bytes());
        buf.push(b'\n');
        Self { buf }
    }

    /// Free text: `name=<byte len>:<bytes>` - length prefix, not escaping.
    fn text(&mut self, name: &str, value: &str) {
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.push(b'=');
        self.buf
            .extend_from_slice(value.len().to_string().as_bytes());
        self.buf.push(b':');
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(b'\n');
    }

    /// Optional free text: absent fields write a bare `name\n` marker, which
    /// cannot collide with the length-prefixed present form.
    fn opt_text(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) => self.text(name, v),
            None => {
                self.buf.extend_from_slice(name.as_bytes());
                self.buf.push(b'\n');
            }
        }
    }

    /// Decimal, normalized (trailing zeros stripped) - scale-insensitive.
    fn dec(&mut self, name: &str, value: Decimal) {
        self.raw(name, &value.normalize().to_string());
    }

    fn date(&mut self, name: &str, value: NaiveDate) {
        self.raw(name, &value.format("%Y-%m-%d").to_string());
    }

    fn uint(&mut self, name: &str, value: usize) {
        self.raw(name, &value.to_string());
    }

    // Restricted charsets (digits, dashes, dots) - no prefix needed.
    fn raw(&mut self, name: &str, value: &str) {
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.push(b'=');
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(b'\n');
    }

    fn party(&mut self, label: &str, party: &PartySnapshot) {
        self.text(label, &party.name);
        self.opt_text("address", party.address.as_deref());
        self.opt_text("city", party.city.as_deref());
        self.text("state", party.state_code.as_str());
        self.opt_text("reg", party.tax_registration.as_deref());
    }

    fn line(&mut self, row: &ComputedLineItem) {
        self.uint("line", row.line_no);
        self.text("desc", &row.item.description);
        self.text("code", &row.item.hsn_sac);
        self.dec("qty", row.item.quantity);
        self.text("unit", &row.item.unit);
        self.dec("rate", row.item.rate);
        self.dec("discount_pct", row.item.discount_pct);
        self.dec("tax_pct", row.tax_rate_pct);
        self.dec("base", row.base_amount);
        self.dec("discount", row.discount_amount);
        self.dec("taxable", row.taxable_value);
        self.dec("cgst", row.cgst);
        self.dec("sgst", row.sgst);
        self.dec("igst", row.igst);
        self.dec("total", row.line_total);
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Serialize invoice content into its canonical byte form.
pub fn canonical_bytes(content: &InvoiceContent<'_>) -> Vec<u8> {
    let mut w = CanonicalWriter::new();

    w.text("number", content.number);
    w.date("issue_date", content.issue_date);
    w.party("seller", content.seller);
    w.party("buyer", content.buyer);

    w.uint("lines", content.lines.len());
    for row in content.lines {
        w.line(row);
    }

    let t = content.totals;
    w.dec("subtotal", t.subtotal);
    w.dec("discount_total", t.discount_total);
    w.dec("taxable_amount", t.taxable_amount);
    w.dec("cgst_total", t.cgst_total);
    w.dec("sgst_total", t.sgst_total);
    w.dec("igst_total", t.igst_total);
    w.dec("tax_total", t.tax_total);
    w.dec("grand_total", t.grand_total);

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use billforge_core::StateCode;
    use billforge_tax::{compute, InvoiceKind, LineItem};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn fixture() -> (PartySnapshot, PartySnapshot, Vec<ComputedLineItem>, TaxTotals) {
        let seller = PartySnapshot::new("Acme Traders", StateCode::new("MH"));
        let buyer = PartySnapshot::new("Bharat Retail", StateCode::new("KA"));
        let mut rates = HashMap::new();
        rates.insert("8471".to_string(), dec!(18));
        let out = compute(
            &[LineItem::new("Laptop", "8471", dec!(2), "NOS", dec!(45000))],
            &seller,
            &buyer,
            InvoiceKind::TaxInvoice,
            &rates,
        )
        .unwrap();
        (seller, buyer, out.lines, out.totals)
    }

    #[test]
    fn byte_form_is_stable_across_calls() {
        let (seller, buyer, lines, totals) = fixture();
        let content = InvoiceContent {
            number: "INV-2025-26-0001",
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            seller: &seller,
            buyer: &buyer,
            lines: &lines,
            totals: &totals,
        };
        assert_eq!(canonical_bytes(&content), canonical_bytes(&content));
    }

    #[test]
    fn decimal_scale_does_not_change_canonical_form() {
        let (seller, buyer, lines, totals) = fixture();
        let mut rescaled = lines.clone();
        // 90 and 90.00 are the same value; the canonical form must agree.
        for row in &mut rescaled {
            row.igst = row.igst.normalize();
        }
        let a = InvoiceContent {
            number: "INV-2025-26-0001",
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            seller: &seller,
            buyer: &buyer,
            lines: &lines,
            totals: &totals,
        };
        let b = InvoiceContent { lines: &rescaled, ..a };
        assert_eq!(canonical_bytes(&a), canonical_bytes(&b));
    }

    #[test]
    fn every_content_field_moves_the_bytes() {
        let (seller, buyer, lines, totals) = fixture();
        let base = InvoiceContent {
            number: "INV-2025-26-0001",
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            seller: &seller,
            buyer: &buyer,
            lines: &lines,
            totals: &totals,
        };
        let baseline = canonical_bytes(&base);

        let renumbered = InvoiceContent {
            number: "INV-2025-26-0002",
            ..base
        };
        assert_ne!(canonical_bytes(&renumbered), baseline);

        let redated = InvoiceContent {
            issue_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            ..base
        };
        assert_ne!(canonical_bytes(&redated), baseline);

        let mut tampered_lines = lines.clone();
        tampered_lines[0].taxable_value += dec!(0.01);
        let tampered = InvoiceContent {
            lines: &tampered_lines,
            ..base
        };
        assert_ne!(canonical_bytes(&tampered), baseline);
    }

    #[test]
    fn delimiter_lookalike_text_cannot_forge_boundaries() {
        let (_, buyer, lines, totals) = fixture();
        // A party name containing the writer's own separators must hash
        // differently from the split fields it imitates.
        let tricky = PartySnapshot::new("Acme\naddress=5:Pune!", StateCode::new("MH"));
        let honest = {
            let mut p = PartySnapshot::new("Acme", StateCode::new("MH"));
            p.address = Some("Pune!".to_string());
            p
        };
        let make = |seller: &PartySnapshot| {
            canonical_bytes(&InvoiceContent {
                number: "INV-2025-26-0001",
                issue_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                seller,
                buyer: &buyer,
                lines: &lines,
                totals: &totals,
            })
        };
        assert_ne!(make(&tricky), make(&honest));
    }
}
