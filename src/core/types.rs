use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One sold line as entered on the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonetaryLine {
    /// Unit price, IGV included for taxed lines.
    pub unit_price: Decimal,
    /// Quantity sold (must be positive).
    pub quantity: Decimal,
    /// Tax affectation of the line.
    pub affectation: TaxAffectation,
    /// IGV rate in percent. Ignored for exempt and unaffected lines.
    pub tax_rate: Decimal,
}

/// Catalogue 07: IGV affectation of a line (onerous operations only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxAffectation {
    /// 10: Taxed, onerous operation.
    Taxed,
    /// 20: Exempt, onerous operation.
    Exempt,
    /// 30: Unaffected, onerous operation.
    Unaffected,
}

impl TaxAffectation {
    /// Catalogue 07 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Taxed => "10",
            Self::Exempt => "20",
            Self::Unaffected => "30",
        }
    }

    /// Parse from a catalogue 07 code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "10" => Some(Self::Taxed),
            "20" => Some(Self::Exempt),
            "30" => Some(Self::Unaffected),
            _ => None,
        }
    }
}

/// Subtotal / tax / total of one line, in two-decimal fixed point.
///
/// `subtotal + tax == total` always holds exactly: the tax is derived from
/// the other two and never rounded on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDecomposition {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Document amounts when every line carries the same IGV rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceAmounts {
    /// Taxable base (operaciones gravadas).
    pub subtotal: Decimal,
    /// IGV.
    pub tax: Decimal,
    /// Amount payable.
    pub total: Decimal,
}

/// Subtotal / tax / total of a group of taxed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxedBucket {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Total of a group of lines that carry no IGV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UntaxedBucket {
    pub total: Decimal,
}

/// Document amounts for documents mixing affectations and IGV rates.
///
/// Top-level `subtotal` is the sum of the bucket subtotals (exempt and
/// unaffected totals count as subtotal), top-level `tax` is the taxed
/// bucket's tax and top-level `total` is the sum of the bucket totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MixedInvoiceAmounts {
    /// All taxed lines, across rates.
    pub taxed: TaxedBucket,
    /// Exempt lines.
    pub exempt: UntaxedBucket,
    /// Unaffected lines.
    pub unaffected: UntaxedBucket,
    /// Taxed lines split by IGV rate, ordered by rate.
    pub tax_breakdown: BTreeMap<Decimal, TaxedBucket>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}
