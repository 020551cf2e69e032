use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::decompose::{check_line, check_rate, divisor, line_total, round2};
use super::error::ComprobanteError;
use super::types::*;

impl InvoiceAmounts {
    /// Derive subtotal and IGV from a tax-inclusive total at a single rate.
    ///
    /// `subtotal = round2(total / (1 + rate/100))`, `tax = total - subtotal`.
    /// A negative rate is rejected.
    pub fn from_total(total: Decimal, rate: Decimal) -> Result<Self, ComprobanteError> {
        check_rate(rate)?;
        let total = round2(total);
        let subtotal = round2(total / divisor(rate));
        Ok(Self {
            subtotal,
            tax: total - subtotal,
            total,
        })
    }
}

/// Aggregate a document whose lines all share one IGV rate.
///
/// Line totals are summed and the subtotal is derived once from the sum,
/// so per-line rounding never compounds. The rate and every line are
/// checked first; a single bad line rejects the whole document.
pub fn aggregate_single_rate(
    lines: &[MonetaryLine],
    rate: Decimal,
) -> Result<InvoiceAmounts, ComprobanteError> {
    check_rate(rate)?;
    check_lines(lines)?;

    let mut total = Decimal::ZERO;
    for (i, line) in lines.iter().enumerate() {
        line_total(line).and_then(|t| accumulate(&mut total, t)).map_err(|e| e.at_line(i + 1))?;
    }
    let amounts = InvoiceAmounts::from_total(total, rate)?;

    debug!(
        lines = lines.len(),
        rate = %rate,
        subtotal = %amounts.subtotal,
        tax = %amounts.tax,
        total = %amounts.total,
        "single-rate amounts aggregated"
    );
    Ok(amounts)
}

/// Aggregate a document mixing taxed, exempt and unaffected lines, and
/// possibly several IGV rates among the taxed ones.
///
/// Each rate bucket keeps the exact sum of its line totals and an unrounded
/// running sum of line subtotals; the subtotal is rounded once per bucket
/// and the bucket's IGV is derived as `total - subtotal`.
pub fn aggregate_mixed(lines: &[MonetaryLine]) -> Result<MixedInvoiceAmounts, ComprobanteError> {
    check_lines(lines)?;

    // rate -> (sum of line totals, unrounded sum of line subtotals)
    let mut by_rate: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();
    let mut exempt = Decimal::ZERO;
    let mut unaffected = Decimal::ZERO;
    // Bounds every bucket and document sum computed below.
    let mut grand_total = Decimal::ZERO;

    for (i, line) in lines.iter().enumerate() {
        let mut sum_line = || -> Result<(), ComprobanteError> {
            let total = line_total(line)?;
            accumulate(&mut grand_total, total)?;
            match line.affectation {
                TaxAffectation::Taxed => {
                    let entry = by_rate
                        .entry(line.tax_rate.normalize())
                        .or_insert((Decimal::ZERO, Decimal::ZERO));
                    accumulate(&mut entry.0, total)?;
                    accumulate(&mut entry.1, total / divisor(line.tax_rate))?;
                }
                TaxAffectation::Exempt => accumulate(&mut exempt, total)?,
                TaxAffectation::Unaffected => accumulate(&mut unaffected, total)?,
            }
            Ok(())
        };
        sum_line().map_err(|e| e.at_line(i + 1))?;
    }

    let mut taxed = TaxedBucket::default();
    let mut tax_breakdown = BTreeMap::new();
    for (rate, (total, raw_subtotal)) in by_rate {
        let total = round2(total);
        let subtotal = round2(raw_subtotal);
        let bucket = TaxedBucket {
            subtotal,
            tax: total - subtotal,
            total,
        };
        taxed.subtotal += bucket.subtotal;
        taxed.tax += bucket.tax;
        taxed.total += bucket.total;
        tax_breakdown.insert(rate, bucket);
    }

    let exempt = UntaxedBucket {
        total: round2(exempt),
    };
    let unaffected = UntaxedBucket {
        total: round2(unaffected),
    };

    let amounts = MixedInvoiceAmounts {
        subtotal: round2(taxed.subtotal + exempt.total + unaffected.total),
        tax: round2(taxed.tax),
        total: round2(taxed.total + exempt.total + unaffected.total),
        taxed: TaxedBucket {
            subtotal: round2(taxed.subtotal),
            tax: round2(taxed.tax),
            total: round2(taxed.total),
        },
        exempt,
        unaffected,
        tax_breakdown,
    };

    debug!(
        lines = lines.len(),
        rates = amounts.tax_breakdown.len(),
        subtotal = %amounts.subtotal,
        tax = %amounts.tax,
        total = %amounts.total,
        "mixed amounts aggregated"
    );
    Ok(amounts)
}

fn check_lines(lines: &[MonetaryLine]) -> Result<(), ComprobanteError> {
    for (i, line) in lines.iter().enumerate() {
        check_line(line).map_err(|e| e.at_line(i + 1))?;
    }
    Ok(())
}

fn accumulate(sum: &mut Decimal, value: Decimal) -> Result<(), ComprobanteError> {
    *sum = sum
        .checked_add(value)
        .ok_or_else(|| ComprobanteError::invalid_line("document total overflows"))?;
    Ok(())
}
