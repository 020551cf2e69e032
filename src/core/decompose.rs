use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::trace;

use super::error::ComprobanteError;
use super::types::*;

/// Split one line's tax-inclusive amount into subtotal, IGV and total.
///
/// `total = round2(unit_price * quantity)`. For taxed lines the subtotal is
/// `round2(total / (1 + rate/100))` and the IGV is `total - subtotal`.
/// Exempt and unaffected lines carry no IGV.
///
/// ```
/// use comprobante::core::*;
/// use rust_decimal_macros::dec;
///
/// let line = MonetaryLineBuilder::new(dec!(118), dec!(1)).build();
/// let d = decompose(&line).unwrap();
/// assert_eq!(d.subtotal, dec!(100.00));
/// assert_eq!(d.tax, dec!(18.00));
/// assert_eq!(d.total, dec!(118.00));
/// ```
pub fn decompose(line: &MonetaryLine) -> Result<LineDecomposition, ComprobanteError> {
    check_line(line)?;

    let total = line_total(line)?;
    let decomposition = match line.affectation {
        TaxAffectation::Taxed => {
            let subtotal = round2(total / divisor(line.tax_rate));
            LineDecomposition {
                subtotal,
                tax: total - subtotal,
                total,
            }
        }
        TaxAffectation::Exempt | TaxAffectation::Unaffected => LineDecomposition {
            subtotal: total,
            tax: Decimal::ZERO,
            total,
        },
    };

    trace!(
        affectation = line.affectation.code(),
        rate = %line.tax_rate,
        subtotal = %decomposition.subtotal,
        tax = %decomposition.tax,
        total = %decomposition.total,
        "line decomposed"
    );
    Ok(decomposition)
}

/// Reject lines that cannot be computed.
pub(crate) fn check_line(line: &MonetaryLine) -> Result<(), ComprobanteError> {
    if line.unit_price < Decimal::ZERO {
        return Err(ComprobanteError::invalid_line(format!(
            "unit price must not be negative, got {}",
            line.unit_price
        )));
    }
    if line.quantity <= Decimal::ZERO {
        return Err(ComprobanteError::invalid_line(format!(
            "quantity must be positive, got {}",
            line.quantity
        )));
    }
    if line.affectation == TaxAffectation::Taxed && line.tax_rate < Decimal::ZERO {
        return Err(ComprobanteError::invalid_line(format!(
            "tax rate must not be negative, got {}",
            line.tax_rate
        )));
    }
    Ok(())
}

/// Reject a document-level IGV rate below zero.
pub(crate) fn check_rate(rate: Decimal) -> Result<(), ComprobanteError> {
    if rate < Decimal::ZERO {
        return Err(ComprobanteError::InvalidAmount(format!(
            "tax rate must not be negative, got {rate}"
        )));
    }
    Ok(())
}

/// `round2(unit_price * quantity)`, rejecting products that overflow.
pub(crate) fn line_total(line: &MonetaryLine) -> Result<Decimal, ComprobanteError> {
    line.unit_price
        .checked_mul(line.quantity)
        .map(round2)
        .ok_or_else(|| {
            ComprobanteError::invalid_line(format!(
                "line amount overflows: {} x {}",
                line.unit_price, line.quantity
            ))
        })
}

/// `1 + rate/100`.
pub(crate) fn divisor(rate: Decimal) -> Decimal {
    Decimal::ONE + rate / dec!(100)
}

/// Round to two decimal places, half away from zero (commercial rounding).
///
/// The result always carries scale 2 so amounts render as `100.00`.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
