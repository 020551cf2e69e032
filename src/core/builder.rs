use rust_decimal::Decimal;

use super::config::{ComprobanteConfig, REDUCED_IGV_RATE, STANDARD_IGV_RATE};
use super::types::*;

/// Builder for [`MonetaryLine`].
///
/// Lines default to taxed at the standard IGV rate. [`from_config`] takes the
/// standard and reduced rates from a [`ComprobanteConfig`] instead of the
/// statutory constants.
///
/// [`from_config`]: MonetaryLineBuilder::from_config
///
/// ```
/// use comprobante::core::*;
/// use rust_decimal_macros::dec;
///
/// let line = MonetaryLineBuilder::new(dec!(59), dec!(2)).build();
/// assert_eq!(line.affectation, TaxAffectation::Taxed);
/// assert_eq!(line.tax_rate, dec!(18));
///
/// let exempt = MonetaryLineBuilder::new(dec!(12.50), dec!(4)).exempt().build();
/// assert_eq!(exempt.tax_rate, dec!(0));
///
/// let config = ComprobanteConfig::default().with_standard_rate(dec!(16));
/// let line = MonetaryLineBuilder::from_config(dec!(116), dec!(1), &config).build();
/// assert_eq!(line.tax_rate, dec!(16));
/// ```
pub struct MonetaryLineBuilder {
    unit_price: Decimal,
    quantity: Decimal,
    affectation: TaxAffectation,
    tax_rate: Decimal,
    reduced_rate: Decimal,
}

impl MonetaryLineBuilder {
    pub fn new(unit_price: Decimal, quantity: Decimal) -> Self {
        Self {
            unit_price,
            quantity,
            affectation: TaxAffectation::Taxed,
            tax_rate: STANDARD_IGV_RATE,
            reduced_rate: REDUCED_IGV_RATE,
        }
    }

    /// Taxed at `config.standard_rate`; [`reduced`](Self::reduced) uses `config.reduced_rate`.
    pub fn from_config(unit_price: Decimal, quantity: Decimal, config: &ComprobanteConfig) -> Self {
        Self {
            tax_rate: config.standard_rate,
            reduced_rate: config.reduced_rate,
            ..Self::new(unit_price, quantity)
        }
    }

    /// Taxed at the given rate (percent).
    pub fn taxed(mut self, rate: Decimal) -> Self {
        self.affectation = TaxAffectation::Taxed;
        self.tax_rate = rate;
        self
    }

    /// Taxed at the reduced rate.
    pub fn reduced(self) -> Self {
        let rate = self.reduced_rate;
        self.taxed(rate)
    }

    pub fn exempt(mut self) -> Self {
        self.affectation = TaxAffectation::Exempt;
        self.tax_rate = Decimal::ZERO;
        self
    }

    pub fn unaffected(mut self) -> Self {
        self.affectation = TaxAffectation::Unaffected;
        self.tax_rate = Decimal::ZERO;
        self
    }

    pub fn build(self) -> MonetaryLine {
        MonetaryLine {
            unit_price: self.unit_price,
            quantity: self.quantity,
            affectation: self.affectation,
            tax_rate: self.tax_rate,
        }
    }
}
