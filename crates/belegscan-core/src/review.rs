//! The editable invoice review state.
//!
//! A single-writer container over at most one [`InvoiceData`] at a time.
//! All mutation funnels through [`InvoiceReview::begin`],
//! [`InvoiceReview::install`], [`InvoiceReview::reset`], and
//! [`InvoiceReview::correct_account`]; presentation code only ever reads.

use tracing::{debug, warn};

use crate::EncodedDocument;
use crate::error::ExtractionError;
use crate::models::invoice::InvoiceData;

/// Token identifying one upload attempt.
///
/// An extraction is not cancellable once issued, so a result may arrive
/// after the upload it belongs to was discarded. Such a result presents a
/// stale token and is dropped instead of resurrecting discarded data.
pub type Generation = u64;

/// Observable phase of the review state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewPhase {
    /// No document loaded.
    Empty,
    /// Document encoded, extraction in flight.
    Pending,
    /// Invoice data present and editable.
    Ready,
    /// Extraction failed; the document preview stays visible.
    Failed,
}

enum State {
    Empty,
    Pending {
        document: EncodedDocument,
    },
    Ready {
        document: EncodedDocument,
        invoice: InvoiceData,
    },
    Failed {
        document: EncodedDocument,
        message: String,
    },
}

/// Review state machine: Empty → Pending → Ready | Failed, with explicit
/// reset back to Empty from anywhere.
pub struct InvoiceReview {
    state: State,
    generation: Generation,
}

impl InvoiceReview {
    pub fn new() -> Self {
        Self {
            state: State::Empty,
            generation: 0,
        }
    }

    pub fn phase(&self) -> ReviewPhase {
        match self.state {
            State::Empty => ReviewPhase::Empty,
            State::Pending { .. } => ReviewPhase::Pending,
            State::Ready { .. } => ReviewPhase::Ready,
            State::Failed { .. } => ReviewPhase::Failed,
        }
    }

    /// The invoice under review, when Ready.
    pub fn invoice(&self) -> Option<&InvoiceData> {
        match &self.state {
            State::Ready { invoice, .. } => Some(invoice),
            _ => None,
        }
    }

    /// The user-facing error message, when Failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            State::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The current document, in any phase that has one.
    pub fn document(&self) -> Option<&EncodedDocument> {
        match &self.state {
            State::Empty => None,
            State::Pending { document }
            | State::Ready { document, .. }
            | State::Failed { document, .. } => Some(document),
        }
    }

    /// The token the next [`install`](Self::install) must present.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new upload.
    ///
    /// Unconditionally discards any prior state (full reset, not
    /// incremental), enters Pending, and hands out the generation token for
    /// this attempt.
    pub fn begin(&mut self, document: EncodedDocument) -> Generation {
        self.generation += 1;
        self.state = State::Pending { document };
        debug!(generation = self.generation, "upload started");
        self.generation
    }

    /// Install the outcome of the extraction started by `begin`.
    ///
    /// A result tagged with anything but the current generation belongs to a
    /// discarded upload and is dropped without touching state.
    pub fn install(
        &mut self,
        generation: Generation,
        result: Result<InvoiceData, ExtractionError>,
    ) {
        if generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "discarding stale extraction result"
            );
            return;
        }

        let document = match &self.state {
            State::Pending { document } => document.clone(),
            _ => {
                warn!("install called outside Pending; ignoring");
                return;
            }
        };

        self.state = match result {
            Ok(invoice) => {
                debug!(
                    generation,
                    line_items = invoice.line_items.len(),
                    "invoice installed"
                );
                State::Ready { document, invoice }
            }
            Err(err) => {
                warn!(generation, error = ?err, "extraction failed");
                State::Failed {
                    document,
                    message: err.to_string(),
                }
            }
        };
    }

    /// Discard everything and return to Empty. Unconditional; any result
    /// still in flight becomes stale.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = State::Empty;
    }

    /// Replace the suggested account of one line item.
    ///
    /// Every other field of every line item, and all invoice-level totals,
    /// stay untouched; totals are never recomputed. The account number is
    /// taken verbatim, even when it is not in the chart. Ignored with a
    /// warning when no invoice is loaded or the index is out of range.
    pub fn correct_account(&mut self, item_index: usize, account_number: &str) {
        let State::Ready { invoice, .. } = &mut self.state else {
            warn!(item_index, "correct_account with no invoice loaded; ignoring");
            return;
        };

        let Some(item) = invoice.line_items.get_mut(item_index) else {
            warn!(
                item_index,
                line_items = invoice.line_items.len(),
                "correct_account index out of range; ignoring"
            );
            return;
        };

        item.suggested_account_number = account_number.to_string();
    }
}

impl Default for InvoiceReview {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::InvoiceLineItem;
    use belegscan_classify::ClassifyError;
    use pretty_assertions::assert_eq;

    fn sample_document() -> EncodedDocument {
        EncodedDocument::from_bytes(b"jpeg bytes", "image/jpeg")
    }

    fn sample_invoice() -> InvoiceData {
        InvoiceData {
            invoice_number: "RE-1001".to_string(),
            invoice_date: "01.03.2024".to_string(),
            total_net: 100.00,
            total_tax: 7.00,
            total_gross: 107.00,
            line_items: vec![InvoiceLineItem {
                pos: 1,
                article_number: None,
                description: "Lahmacun".to_string(),
                quantity: 2.0,
                unit_price: 5.00,
                total_price: 10.00,
                tax_rate: 7.0,
                suggested_account_number: "5309".to_string(),
            }],
        }
    }

    fn failure() -> ExtractionError {
        ExtractionError::Classifier(ClassifyError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        })
    }

    #[test]
    fn successful_pipeline_reaches_ready() {
        let mut review = InvoiceReview::new();
        assert_eq!(review.phase(), ReviewPhase::Empty);

        let generation = review.begin(sample_document());
        assert_eq!(review.phase(), ReviewPhase::Pending);

        review.install(generation, Ok(sample_invoice()));
        assert_eq!(review.phase(), ReviewPhase::Ready);
        assert_eq!(review.invoice(), Some(&sample_invoice()));
        assert!(review.document().is_some());
    }

    #[test]
    fn failed_extraction_keeps_document_and_message() {
        let mut review = InvoiceReview::new();
        let generation = review.begin(sample_document());

        review.install(generation, Err(failure()));

        assert_eq!(review.phase(), ReviewPhase::Failed);
        assert_eq!(
            review.error(),
            Some("Failed to analyze the invoice. The AI model could not process the request.")
        );
        // Preview stays visible alongside the error banner.
        assert_eq!(review.document(), Some(&sample_document()));
        assert_eq!(review.invoice(), None);
    }

    #[test]
    fn correct_account_changes_exactly_one_field() {
        let mut review = InvoiceReview::new();
        let generation = review.begin(sample_document());
        review.install(generation, Ok(sample_invoice()));

        review.correct_account(0, "5300");

        let mut expected = sample_invoice();
        expected.line_items[0].suggested_account_number = "5300".to_string();
        assert_eq!(review.invoice(), Some(&expected));
    }

    #[test]
    fn correct_account_accepts_numbers_outside_the_chart() {
        let mut review = InvoiceReview::new();
        let generation = review.begin(sample_document());
        review.install(generation, Ok(sample_invoice()));

        review.correct_account(0, "4711");

        assert_eq!(
            review.invoice().unwrap().line_items[0].suggested_account_number,
            "4711"
        );
    }

    #[test]
    fn correct_account_without_invoice_is_a_no_op() {
        let mut review = InvoiceReview::new();
        review.correct_account(0, "5300");
        assert_eq!(review.phase(), ReviewPhase::Empty);

        let generation = review.begin(sample_document());
        review.install(generation, Err(failure()));
        review.correct_account(0, "5300");
        assert_eq!(review.phase(), ReviewPhase::Failed);
    }

    #[test]
    fn correct_account_out_of_range_is_a_no_op() {
        let mut review = InvoiceReview::new();
        let generation = review.begin(sample_document());
        review.install(generation, Ok(sample_invoice()));

        review.correct_account(5, "5300");

        assert_eq!(review.invoice(), Some(&sample_invoice()));
    }

    #[test]
    fn reset_from_every_phase_yields_empty() {
        let mut review = InvoiceReview::new();

        let generation = review.begin(sample_document());
        review.reset();
        assert_eq!(review.phase(), ReviewPhase::Empty);
        assert!(review.document().is_none());

        let generation2 = review.begin(sample_document());
        assert_ne!(generation, generation2);
        review.install(generation2, Ok(sample_invoice()));
        review.reset();
        assert_eq!(review.phase(), ReviewPhase::Empty);
        assert!(review.invoice().is_none());

        let generation3 = review.begin(sample_document());
        review.install(generation3, Err(failure()));
        review.reset();
        assert_eq!(review.phase(), ReviewPhase::Empty);
        assert!(review.error().is_none());
    }

    #[test]
    fn stale_result_after_reset_is_discarded() {
        let mut review = InvoiceReview::new();
        let generation = review.begin(sample_document());

        // User resets while the request is still in flight.
        review.reset();

        // The late response must not resurrect discarded data.
        review.install(generation, Ok(sample_invoice()));
        assert_eq!(review.phase(), ReviewPhase::Empty);
        assert_eq!(review.invoice(), None);
    }

    #[test]
    fn stale_result_after_new_upload_is_discarded() {
        let mut review = InvoiceReview::new();
        let first = review.begin(sample_document());
        let second = review.begin(sample_document());

        review.install(first, Ok(sample_invoice()));
        assert_eq!(review.phase(), ReviewPhase::Pending);

        review.install(second, Err(failure()));
        assert_eq!(review.phase(), ReviewPhase::Failed);
    }

    #[test]
    fn new_upload_replaces_invoice_wholly() {
        let mut review = InvoiceReview::new();
        let generation = review.begin(sample_document());
        review.install(generation, Ok(sample_invoice()));
        review.correct_account(0, "5300");

        // Starting over discards the prior record and its pending edits.
        let generation2 = review.begin(sample_document());
        assert_eq!(review.phase(), ReviewPhase::Pending);
        review.install(generation2, Ok(sample_invoice()));

        assert_eq!(
            review.invoice().unwrap().line_items[0].suggested_account_number,
            "5309"
        );
    }
}
