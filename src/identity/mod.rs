//! Counterparty identity document validation.
//!
//! Checks a document number against its declared type (DNI, RUC, carné de
//! extranjería, passport). An invalid number is an ordinary outcome, so the
//! validator returns a verdict instead of an error.
//!
//! # Example
//!
//! ```
//! use comprobante::identity::*;
//!
//! assert!(validate_identity(IdentityDocumentType::TaxId, "20123456789").valid);
//! assert!(!validate_identity(IdentityDocumentType::NationalId, "1234567").valid);
//!
//! // Opt in to the RUC check digit
//! let strict = IdentityOptions::default().verify_tax_id_checksum(true);
//! assert!(!validate_identity_with(&strict, IdentityDocumentType::TaxId, "20123456789").valid);
//! assert!(validate_identity_with(&strict, IdentityDocumentType::TaxId, "20100070970").valid);
//! ```

mod checksum;
mod document;

pub use checksum::tax_id_check_digit;
pub use document::{
    IdentityDocument, IdentityDocumentType, IdentityOptions, IdentityVerdict, validate_identity,
    validate_identity_with,
};
