use serde::{Deserialize, Serialize};

use super::checksum::has_valid_check_digit;

/// Catalogue 06: identity document types accepted for a counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentityDocumentType {
    /// 1: DNI, national identity document.
    NationalId,
    /// 6: RUC, taxpayer registry number.
    TaxId,
    /// 4: Carné de extranjería.
    ForeignResidentCard,
    /// 7: Passport.
    Passport,
}

impl IdentityDocumentType {
    /// Catalogue 06 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NationalId => "1",
            Self::TaxId => "6",
            Self::ForeignResidentCard => "4",
            Self::Passport => "7",
        }
    }

    /// Parse from a catalogue 06 code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Self::NationalId),
            "6" => Some(Self::TaxId),
            "4" => Some(Self::ForeignResidentCard),
            "7" => Some(Self::Passport),
            _ => None,
        }
    }

    /// Short label printed on documents.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NationalId => "DNI",
            Self::TaxId => "RUC",
            Self::ForeignResidentCard => "CE",
            Self::Passport => "PASAPORTE",
        }
    }
}

/// A counterparty's identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDocument {
    pub doc_type: IdentityDocumentType,
    pub number: String,
}

impl IdentityDocument {
    pub fn new(doc_type: IdentityDocumentType, number: impl Into<String>) -> Self {
        Self {
            doc_type,
            number: number.into(),
        }
    }

    /// Validate with default options.
    pub fn validate(&self) -> IdentityVerdict {
        validate_identity(self.doc_type, &self.number)
    }

    pub fn validate_with(&self, options: &IdentityOptions) -> IdentityVerdict {
        validate_identity_with(options, self.doc_type, &self.number)
    }
}

/// Outcome of an identity check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityVerdict {
    pub valid: bool,
    /// Human-readable outcome, suitable for form feedback.
    pub message: String,
}

impl IdentityVerdict {
    fn ok(doc_type: IdentityDocumentType) -> Self {
        Self {
            valid: true,
            message: format!("valid {}", doc_type.label()),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Knobs for identity validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityOptions {
    /// Verify the RUC modulus-11 check digit. Off by default.
    pub verify_tax_id_checksum: bool,
}

impl IdentityOptions {
    pub fn verify_tax_id_checksum(mut self, verify: bool) -> Self {
        self.verify_tax_id_checksum = verify;
        self
    }
}

/// Validate a document number against its type with default options.
pub fn validate_identity(doc_type: IdentityDocumentType, number: &str) -> IdentityVerdict {
    validate_identity_with(&IdentityOptions::default(), doc_type, number)
}

/// Validate a document number against its type.
///
/// - DNI: exactly 8 digits.
/// - RUC: exactly 11 digits starting with 1 or 2, plus the check digit
///   when `options.verify_tax_id_checksum` is set.
/// - Carné de extranjería: 9 to 12 characters.
/// - Passport: 5 to 12 characters.
///
/// Surrounding whitespace is ignored.
pub fn validate_identity_with(
    options: &IdentityOptions,
    doc_type: IdentityDocumentType,
    number: &str,
) -> IdentityVerdict {
    let number = number.trim();
    let label = doc_type.label();
    if number.is_empty() {
        return IdentityVerdict::invalid(format!("{label} number is required"));
    }

    let all_digits = number.bytes().all(|b| b.is_ascii_digit());
    let len = number.chars().count();

    match doc_type {
        IdentityDocumentType::NationalId => {
            if len != 8 || !all_digits {
                return IdentityVerdict::invalid("DNI must have exactly 8 digits");
            }
        }
        IdentityDocumentType::TaxId => {
            if len != 11 || !all_digits {
                return IdentityVerdict::invalid("RUC must have exactly 11 digits");
            }
            if !matches!(number.as_bytes()[0], b'1' | b'2') {
                return IdentityVerdict::invalid("RUC must start with 1 or 2");
            }
            if options.verify_tax_id_checksum && !has_valid_check_digit(number) {
                return IdentityVerdict::invalid("RUC check digit does not match");
            }
        }
        IdentityDocumentType::ForeignResidentCard => {
            if !(9..=12).contains(&len) {
                return IdentityVerdict::invalid(
                    "carné de extranjería must have between 9 and 12 characters",
                );
            }
        }
        IdentityDocumentType::Passport => {
            if !(5..=12).contains(&len) {
                return IdentityVerdict::invalid("passport must have between 5 and 12 characters");
            }
        }
    }

    IdentityVerdict::ok(doc_type)
}
