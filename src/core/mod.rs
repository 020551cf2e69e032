//! Core amounts, errors, configuration and document numbering.
//!
//! Line decomposition, single- and mixed-rate aggregation and the
//! correlative generator. Everything here is pure except the counter store.

mod builder;
mod config;
mod decompose;
mod error;
mod numbering;
mod totals;
mod types;

pub use builder::*;
pub use config::*;
pub use decompose::{decompose, round2};
pub use error::*;
pub use numbering::*;
pub use totals::*;
pub use types::*;
