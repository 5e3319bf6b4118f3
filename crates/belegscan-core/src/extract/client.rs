//! The extraction client: single dispatch plus strict response validation.

use tracing::{debug, info};

use belegscan_classify::Classifier;

use crate::EncodedDocument;
use crate::accounts::AccountChart;
use crate::error::ExtractionError;
use crate::extract::request::build_request;
use crate::models::invoice::InvoiceData;

/// Extracts structured invoice data from an encoded document through a
/// classifier backend.
pub struct InvoiceExtractor<C> {
    classifier: C,
    chart: AccountChart,
}

impl<C: Classifier> InvoiceExtractor<C> {
    pub fn new(classifier: C, chart: AccountChart) -> Self {
        Self { classifier, chart }
    }

    /// The chart this extractor suggests accounts from.
    pub fn chart(&self) -> &AccountChart {
        &self.chart
    }

    /// Run one extraction.
    ///
    /// A single request, no retries; a failed attempt is terminal for this
    /// upload and needs a new user-initiated one. The response text must
    /// parse as schema-conformant JSON in full: a missing required field or
    /// a mistyped value rejects the whole response, never a partial record.
    pub async fn extract(
        &self,
        document: &EncodedDocument,
    ) -> Result<InvoiceData, ExtractionError> {
        let request = build_request(document, &self.chart);

        debug!(mime_type = %document.mime_type, "dispatching extraction request");

        let text = self
            .classifier
            .request(&request.instruction, &request.document, &request.schema)
            .await
            .map_err(ExtractionError::Classifier)?;

        let invoice: InvoiceData =
            serde_json::from_str(&text).map_err(ExtractionError::Schema)?;

        info!(
            invoice_number = %invoice.invoice_number,
            line_items = invoice.line_items.len(),
            "extraction complete"
        );

        Ok(invoice)
    }
}
