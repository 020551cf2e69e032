//! Legal amount-in-words rendering.
//!
//! Printed fiscal documents carry the total spelled out in Spanish
//! ("SON: MIL CIENTO OCHENTA CON 00/100 SOLES") to prevent tampering with
//! the numeric figure. The output is consumed verbatim by the layout layer.

mod render;

pub use render::{to_legal_words, to_legal_words_with_currency};
