//! Jurisdiction constants and caller-tunable settings.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Standard IGV rate in percent.
pub const STANDARD_IGV_RATE: Decimal = dec!(18);

/// Reduced IGV rate in percent (restaurants, hotels, catering).
pub const REDUCED_IGV_RATE: Decimal = dec!(10);

/// Operation amount below which no detraction applies, whatever the category.
pub const DETRACTION_GLOBAL_MINIMUM: Decimal = dec!(700);

/// Default upper bound on the number of lines in one document.
pub const MAX_DOCUMENT_LINES: usize = 10_000;

/// Digits in the sequential part of a correlative number.
pub const CORRELATIVE_WIDTH: usize = 8;

/// What to do when a detraction category code is not in the rule table.
///
/// There is no implicit default in the classifier: the free function
/// `classify_detraction` rejects, and any other behaviour must be chosen here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Surface `ComprobanteError::UnknownCategory` to the caller.
    #[default]
    Reject,
    /// Treat the line as not subject to detraction.
    NoWithholding,
}

/// Settings shared by the computation components.
///
/// Deserializes with every field optional, so a partial settings file
/// only overrides what it names:
///
/// ```
/// use comprobante::core::*;
/// use rust_decimal_macros::dec;
///
/// let config = ComprobanteConfig::default()
///     .with_tax_id_checksum(true)
///     .with_unknown_category_policy(UnknownCategoryPolicy::NoWithholding);
///
/// assert_eq!(config.standard_rate, dec!(18));
/// assert!(config.verify_tax_id_checksum);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprobanteConfig {
    /// IGV rate given to lines built with `MonetaryLineBuilder::from_config`.
    pub standard_rate: Decimal,
    /// Rate applied by `MonetaryLineBuilder::reduced` on config-built lines.
    pub reduced_rate: Decimal,
    /// Global detraction threshold.
    pub detraction_minimum: Decimal,
    /// Handling of detraction codes missing from the table.
    pub unknown_detraction_category: UnknownCategoryPolicy,
    /// Verify the modulus-11 check digit of tax IDs.
    pub verify_tax_id_checksum: bool,
    /// Attempts made by the correlative issuer before giving up on write conflicts.
    pub max_issue_attempts: u32,
    /// Documents with more lines than this are refused at finalization.
    pub max_document_lines: usize,
}

impl Default for ComprobanteConfig {
    fn default() -> Self {
        Self {
            standard_rate: STANDARD_IGV_RATE,
            reduced_rate: REDUCED_IGV_RATE,
            detraction_minimum: DETRACTION_GLOBAL_MINIMUM,
            unknown_detraction_category: UnknownCategoryPolicy::Reject,
            verify_tax_id_checksum: false,
            max_issue_attempts: 5,
            max_document_lines: MAX_DOCUMENT_LINES,
        }
    }
}

impl ComprobanteConfig {
    pub fn with_standard_rate(mut self, rate: Decimal) -> Self {
        self.standard_rate = rate;
        self
    }

    pub fn with_reduced_rate(mut self, rate: Decimal) -> Self {
        self.reduced_rate = rate;
        self
    }

    pub fn with_detraction_minimum(mut self, minimum: Decimal) -> Self {
        self.detraction_minimum = minimum;
        self
    }

    pub fn with_unknown_category_policy(mut self, policy: UnknownCategoryPolicy) -> Self {
        self.unknown_detraction_category = policy;
        self
    }

    pub fn with_tax_id_checksum(mut self, verify: bool) -> Self {
        self.verify_tax_id_checksum = verify;
        self
    }

    /// Set the retry budget for counter write conflicts (at least one attempt is always made).
    pub fn with_max_issue_attempts(mut self, attempts: u32) -> Self {
        self.max_issue_attempts = attempts.max(1);
        self
    }

    pub fn with_max_document_lines(mut self, lines: usize) -> Self {
        self.max_document_lines = lines;
        self
    }
}
