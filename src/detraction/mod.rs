//! Detraction (SPOT withholding) classification.
//!
//! Looks up a category code in the static rule table and decides whether
//! the operation amount triggers withholding. What happens with codes
//! missing from the table is the caller's choice, via
//! [`UnknownCategoryPolicy`](crate::core::UnknownCategoryPolicy).

mod classify;
mod table;

pub use classify::{DetractionClassifier, DetractionVerdict, classify_detraction};
pub use table::{DetractionCategory, DetractionRule, detraction_rules, find_detraction_rule};
