//! Document finalization.
//!
//! Runs the computation steps in the order a fiscal document needs them
//! and mints the correlative last, inside the caller's commit, so a
//! failed write never burns a number.

mod builder;

pub use builder::{
    DocumentBuilder, DocumentDraft, DocumentKind, DraftLine, FinalizedDocument, LineDetraction,
};
