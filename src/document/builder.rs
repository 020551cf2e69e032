use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::*;
use crate::detraction::{DetractionClassifier, DetractionVerdict};
use crate::identity::{IdentityDocument, IdentityDocumentType, IdentityOptions};
use crate::words::to_legal_words_with_currency;

/// Kind of commercial document being issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    /// 01: Factura. The counterparty must be identified by RUC.
    Invoice,
    /// 03: Boleta de venta.
    Receipt,
    /// Purchase order (internal document, no catalogue code).
    PurchaseOrder,
}

impl DocumentKind {
    /// Catalogue 01 code, if the document is a fiscal receipt.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Invoice => Some("01"),
            Self::Receipt => Some("03"),
            Self::PurchaseOrder => None,
        }
    }
}

/// A line as entered, with its optional detraction category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    pub line: MonetaryLine,
    pub detraction_code: Option<String>,
}

/// Detraction outcome for one line of a finalized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDetraction {
    /// 1-based line position.
    pub line: usize,
    pub verdict: DetractionVerdict,
}

/// A document with its number and every computed amount embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedDocument {
    pub kind: DocumentKind,
    /// Correlative, e.g. "F001-00000042".
    pub number: String,
    pub counterparty: IdentityDocument,
    pub lines: Vec<DraftLine>,
    /// One decomposition per line, in line order.
    pub decompositions: Vec<LineDecomposition>,
    pub amounts: MixedInvoiceAmounts,
    /// Total in words, printed verbatim.
    pub amount_in_words: String,
    /// Verdicts for lines that carried a detraction code.
    pub detractions: Vec<LineDetraction>,
}

impl FinalizedDocument {
    /// Sum of all detraction deposits on the document.
    pub fn withheld_total(&self) -> Decimal {
        self.detractions
            .iter()
            .map(|d| d.verdict.withheld_amount)
            .sum()
    }

    /// Amount the seller actually receives once detractions are deposited.
    pub fn net_payable(&self) -> Decimal {
        self.amounts.total - self.withheld_total()
    }
}

/// Builder for a document awaiting its number.
///
/// ```
/// use comprobante::core::*;
/// use comprobante::document::*;
/// use comprobante::identity::*;
/// use rust_decimal_macros::dec;
///
/// let draft = DocumentBuilder::new(DocumentKind::Invoice, "F001")
///     .counterparty(IdentityDocument::new(IdentityDocumentType::TaxId, "20123456789"))
///     .add_line(MonetaryLineBuilder::new(dec!(118), dec!(10)).build())
///     .build()
///     .unwrap();
///
/// let issuer = CorrelativeIssuer::new(InMemoryCounterStore::new());
/// let doc = draft
///     .finalize(&ComprobanteConfig::default(), &issuer, |_| Ok(()))
///     .unwrap();
///
/// assert_eq!(doc.number, "F001-00000001");
/// assert_eq!(doc.amounts.tax, dec!(180.00));
/// assert_eq!(doc.amount_in_words, "MIL CIENTO OCHENTA CON 00/100 SOLES");
/// ```
pub struct DocumentBuilder {
    kind: DocumentKind,
    series: String,
    counterparty: Option<IdentityDocument>,
    lines: Vec<DraftLine>,
    currency: String,
}

impl DocumentBuilder {
    pub fn new(kind: DocumentKind, series: impl Into<String>) -> Self {
        Self {
            kind,
            series: series.into(),
            counterparty: None,
            lines: Vec::new(),
            currency: "SOLES".to_string(),
        }
    }

    pub fn counterparty(mut self, document: IdentityDocument) -> Self {
        self.counterparty = Some(document);
        self
    }

    pub fn add_line(mut self, line: MonetaryLine) -> Self {
        self.lines.push(DraftLine {
            line,
            detraction_code: None,
        });
        self
    }

    /// Add a line subject to detraction classification under `code`.
    pub fn add_line_with_detraction(mut self, line: MonetaryLine, code: impl Into<String>) -> Self {
        self.lines.push(DraftLine {
            line,
            detraction_code: Some(code.into()),
        });
        self
    }

    /// Currency name appended to the amount in words (default "SOLES").
    pub fn currency_name(mut self, name: impl Into<String>) -> Self {
        self.currency = name.into();
        self
    }

    pub fn build(self) -> Result<DocumentDraft, ComprobanteError> {
        let counterparty = self
            .counterparty
            .ok_or_else(|| ComprobanteError::Validation("counterparty is required".into()))?;

        if self.series.trim().is_empty() {
            return Err(ComprobanteError::Validation("series is required".into()));
        }
        if self.lines.is_empty() {
            return Err(ComprobanteError::Validation(
                "at least one line is required".into(),
            ));
        }

        Ok(DocumentDraft {
            kind: self.kind,
            series: self.series.trim().to_string(),
            counterparty,
            lines: self.lines,
            currency: self.currency,
        })
    }
}

/// A complete document without a number yet.
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    kind: DocumentKind,
    series: String,
    counterparty: IdentityDocument,
    lines: Vec<DraftLine>,
    currency: String,
}

impl DocumentDraft {
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn lines(&self) -> &[DraftLine] {
        &self.lines
    }

    /// Compute every amount, then mint the number and commit.
    ///
    /// Order: line count against `config.max_document_lines`, counterparty
    /// check, one decomposition per line, mixed aggregation, amount in words,
    /// per-line detraction, and last the correlative. `persist` receives the finished document and must write
    /// it; the series counter advances only if `persist` succeeds. Any
    /// failure before that point leaves the counter untouched.
    pub fn finalize<S, F>(
        self,
        config: &ComprobanteConfig,
        issuer: &CorrelativeIssuer<S>,
        mut persist: F,
    ) -> Result<FinalizedDocument, ComprobanteError>
    where
        S: CounterStore,
        F: FnMut(&FinalizedDocument) -> Result<(), ComprobanteError>,
    {
        if self.lines.len() > config.max_document_lines {
            return Err(ComprobanteError::Validation(format!(
                "document has {} lines, at most {} allowed",
                self.lines.len(),
                config.max_document_lines
            )));
        }
        self.check_counterparty(config)?;

        let decompositions = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, d)| decompose(&d.line).map_err(|e| e.at_line(i + 1)))
            .collect::<Result<Vec<_>, _>>()?;

        let monetary: Vec<MonetaryLine> = self.lines.iter().map(|d| d.line.clone()).collect();
        let amounts = aggregate_mixed(&monetary)?;
        let amount_in_words = to_legal_words_with_currency(amounts.total, &self.currency)?;

        let classifier = DetractionClassifier::from_config(config);
        let mut detractions = Vec::new();
        for (i, (draft, decomposition)) in self.lines.iter().zip(&decompositions).enumerate() {
            if let Some(code) = &draft.detraction_code {
                let verdict = classifier.classify(code, decomposition.total)?;
                detractions.push(LineDetraction {
                    line: i + 1,
                    verdict,
                });
            }
        }

        let issued = issuer.issue(&self.series, |number| {
            let document = FinalizedDocument {
                kind: self.kind,
                number: number.to_string(),
                counterparty: self.counterparty.clone(),
                lines: self.lines.clone(),
                decompositions: decompositions.clone(),
                amounts: amounts.clone(),
                amount_in_words: amount_in_words.clone(),
                detractions: detractions.clone(),
            };
            persist(&document)?;
            Ok(document)
        })?;

        debug!(
            number = %issued.number,
            lines = issued.value.lines.len(),
            total = %issued.value.amounts.total,
            "document finalized"
        );
        Ok(issued.value)
    }

    fn check_counterparty(&self, config: &ComprobanteConfig) -> Result<(), ComprobanteError> {
        let options =
            IdentityOptions::default().verify_tax_id_checksum(config.verify_tax_id_checksum);
        let verdict = self.counterparty.validate_with(&options);
        if !verdict.valid {
            return Err(ComprobanteError::Validation(format!(
                "counterparty: {}",
                verdict.message
            )));
        }
        if self.kind == DocumentKind::Invoice
            && self.counterparty.doc_type != IdentityDocumentType::TaxId
        {
            return Err(ComprobanteError::Validation(
                "counterparty: an invoice requires a RUC".into(),
            ));
        }
        Ok(())
    }
}
