use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::table::find_detraction_rule;
use crate::core::{
    ComprobanteConfig, ComprobanteError, DETRACTION_GLOBAL_MINIMUM, UnknownCategoryPolicy,
};

/// Result of a detraction lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetractionVerdict {
    /// Whether the payer must withhold.
    pub applies: bool,
    /// Rate of the matched category, zero if the code was unknown.
    pub rate_percent: Decimal,
    /// Amount to deposit, in whole currency units; zero when not applying.
    pub withheld_amount: Decimal,
    /// Matched catalogue code, `None` if unknown and downgraded by policy.
    pub code: Option<String>,
}

impl DetractionVerdict {
    fn none(code: Option<String>, rate_percent: Decimal) -> Self {
        Self {
            applies: false,
            rate_percent,
            withheld_amount: Decimal::ZERO,
            code,
        }
    }
}

/// Detraction lookup with a caller-chosen threshold and unknown-code policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetractionClassifier {
    global_minimum: Decimal,
    unknown: UnknownCategoryPolicy,
}

impl Default for DetractionClassifier {
    fn default() -> Self {
        Self {
            global_minimum: DETRACTION_GLOBAL_MINIMUM,
            unknown: UnknownCategoryPolicy::Reject,
        }
    }
}

impl DetractionClassifier {
    pub fn new(global_minimum: Decimal, unknown: UnknownCategoryPolicy) -> Self {
        Self {
            global_minimum,
            unknown,
        }
    }

    pub fn from_config(config: &ComprobanteConfig) -> Self {
        Self::new(config.detraction_minimum, config.unknown_detraction_category)
    }

    pub fn global_minimum(&self) -> Decimal {
        self.global_minimum
    }

    /// Decide whether an operation of `amount` in category `code` is subject to detraction.
    ///
    /// Applies when `amount` reaches the global minimum and, if the category
    /// has its own minimum, that one too.
    pub fn classify(&self, code: &str, amount: Decimal) -> Result<DetractionVerdict, ComprobanteError> {
        let Some(rule) = find_detraction_rule(code) else {
            return match self.unknown {
                UnknownCategoryPolicy::Reject => {
                    Err(ComprobanteError::UnknownCategory(code.trim().to_string()))
                }
                UnknownCategoryPolicy::NoWithholding => {
                    warn!(code, "unknown detraction category treated as no withholding");
                    Ok(DetractionVerdict::none(None, Decimal::ZERO))
                }
            };
        };

        let above_global = amount >= self.global_minimum;
        let above_category = rule.minimum_amount.is_none_or(|min| amount >= min);
        let applies = above_global && above_category;

        let verdict = if applies {
            DetractionVerdict {
                applies,
                rate_percent: rule.rate_percent,
                withheld_amount: (amount * rule.rate_percent / dec!(100))
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                code: Some(rule.code.to_string()),
            }
        } else {
            DetractionVerdict::none(Some(rule.code.to_string()), rule.rate_percent)
        };

        debug!(
            code = rule.code,
            amount = %amount,
            applies,
            withheld = %verdict.withheld_amount,
            "detraction classified"
        );
        Ok(verdict)
    }
}

/// Classify with the default global minimum, rejecting unknown codes.
///
/// ```
/// use comprobante::detraction::classify_detraction;
/// use rust_decimal_macros::dec;
///
/// let v = classify_detraction("019", dec!(1000)).unwrap();
/// assert!(v.applies);
/// assert_eq!(v.rate_percent, dec!(10));
/// assert_eq!(v.withheld_amount, dec!(100));
///
/// assert!(!classify_detraction("027", dec!(350)).unwrap().applies);
/// assert!(classify_detraction("999", dec!(1000)).is_err());
/// ```
pub fn classify_detraction(code: &str, amount: Decimal) -> Result<DetractionVerdict, ComprobanteError> {
    DetractionClassifier::default().classify(code, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_global_minimum() {
        let v = classify_detraction("037", dec!(699.99)).unwrap();
        assert!(!v.applies);
        assert_eq!(v.rate_percent, dec!(12));
        assert_eq!(v.withheld_amount, Decimal::ZERO);
        assert_eq!(v.code.as_deref(), Some("037"));
    }

    #[test]
    fn at_global_minimum() {
        let v = classify_detraction("037", dec!(700)).unwrap();
        assert!(v.applies);
        assert_eq!(v.withheld_amount, dec!(84));
    }

    #[test]
    fn category_minimum_also_required() {
        // Global threshold lowered so only the category minimum of 400 decides.
        let c = DetractionClassifier::new(dec!(100), UnknownCategoryPolicy::Reject);
        assert!(!c.classify("027", dec!(350)).unwrap().applies);
        assert!(!c.classify("027", dec!(399.99)).unwrap().applies);
        assert!(c.classify("027", dec!(400)).unwrap().applies);
        // Categories without their own minimum follow the global one.
        assert!(c.classify("019", dec!(350)).unwrap().applies);
    }

    #[test]
    fn withheld_amount_rounds_to_units() {
        // 1234.56 * 12% = 148.1472
        let v = classify_detraction("022", dec!(1234.56)).unwrap();
        assert_eq!(v.withheld_amount, dec!(148));
        // 1187.50 * 4% = 47.50
        let v = classify_detraction("030", dec!(1187.50)).unwrap();
        assert_eq!(v.withheld_amount, dec!(48));
    }

    #[test]
    fn unknown_rejected_by_default() {
        let err = classify_detraction("099", dec!(5000)).unwrap_err();
        assert!(matches!(err, ComprobanteError::UnknownCategory(ref c) if c == "099"));
    }

    #[test]
    fn unknown_downgraded_when_asked() {
        let c = DetractionClassifier::new(dec!(700), UnknownCategoryPolicy::NoWithholding);
        let v = c.classify("099", dec!(5000)).unwrap();
        assert!(!v.applies);
        assert_eq!(v.code, None);
        assert_eq!(v.rate_percent, Decimal::ZERO);
    }

    #[test]
    fn from_config_carries_settings() {
        let config = ComprobanteConfig::default()
            .with_detraction_minimum(dec!(1000))
            .with_unknown_category_policy(UnknownCategoryPolicy::NoWithholding);
        let c = DetractionClassifier::from_config(&config);
        assert_eq!(c.global_minimum(), dec!(1000));
        assert!(!c.classify("037", dec!(900)).unwrap().applies);
        assert!(c.classify("999", dec!(900)).is_ok());
    }
}
