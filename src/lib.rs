//! # comprobante
//!
//! Amounts and identifiers for IGV fiscal documents (facturas, boletas,
//! purchase orders): per-line tax decomposition, mixed-rate totals that never
//! lose a cent, detraction classification, counterparty identity checks, the
//! legal amount in words and fixed-width correlative numbers.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Every computation is pure and synchronous; the only shared state is the
//! correlative counter, reached through [`core::CounterStore`].
//!
//! ## Quick Start
//!
//! ```rust
//! use comprobante::core::*;
//! use rust_decimal_macros::dec;
//!
//! let lines = vec![
//!     MonetaryLineBuilder::new(dec!(59), dec!(2)).build(),
//!     MonetaryLineBuilder::new(dec!(22), dec!(1)).taxed(dec!(10)).build(),
//!     MonetaryLineBuilder::new(dec!(15), dec!(1)).exempt().build(),
//! ];
//!
//! let amounts = aggregate_mixed(&lines).unwrap();
//! assert_eq!(amounts.total, dec!(155.00));
//! assert_eq!(amounts.subtotal + amounts.tax, amounts.total);
//! assert_eq!(next_correlative("F001", 99).unwrap(), "F001-00000100");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Line decomposition, aggregation, correlatives, config |
//! | `identity` | DNI / RUC / CE / passport validation |
//! | `detraction` | Detraction rule table and classifier |
//! | `words` | Amount in words for printed documents |
//! | `document` | End-to-end document finalization |
//! | `all` (default) | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "identity")]
pub mod identity;

#[cfg(feature = "detraction")]
pub mod detraction;

#[cfg(feature = "words")]
pub mod words;

#[cfg(feature = "document")]
pub mod document;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
