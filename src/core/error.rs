use thiserror::Error;

/// Errors that can occur while computing document amounts or issuing numbers.
///
/// An invalid identity document is not an error: see
/// `IdentityVerdict` for the verdict type returned by the identity validator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComprobanteError {
    /// A line was rejected before any computation took place.
    #[error("invalid line{}: {reason}", .index.map(|i| format!(" {i}")).unwrap_or_default())]
    InvalidLine {
        /// Position of the offending line within the document, when known.
        index: Option<usize>,
        /// Why the line was rejected.
        reason: String,
    },

    /// Detraction category code not present in the rule table.
    #[error("unknown detraction category '{0}'")]
    UnknownCategory(String),

    /// Amount outside the domain of the operation (e.g. negative total).
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Correlative formatting or counter error.
    #[error("numbering error: {0}")]
    Numbering(String),

    /// Optimistic write conflict on the counter for `prefix`.
    #[error("write conflict on correlative counter '{prefix}'")]
    CounterConflict {
        /// Series prefix whose counter was concurrently modified.
        prefix: String,
    },

    /// Document-level validation failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The caller's persistence commit failed; no number was consumed.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl ComprobanteError {
    pub(crate) fn invalid_line(reason: impl Into<String>) -> Self {
        Self::InvalidLine {
            index: None,
            reason: reason.into(),
        }
    }

    /// Attach the line position to an `InvalidLine` error; other variants pass through.
    pub(crate) fn at_line(self, position: usize) -> Self {
        match self {
            Self::InvalidLine { reason, .. } => Self::InvalidLine {
                index: Some(position),
                reason,
            },
            other => other,
        }
    }
}
