//! Invoice data model matching the classifier's declared output schema.
//!
//! The wire shape is camelCase JSON with monetary values as plain numbers
//! using `.` as the decimal separator regardless of source locale (an
//! invoice showing `644,63` comes back as `644.63`). Deserialization is
//! strict: a missing required field or a mistyped value rejects the whole
//! response.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A structured invoice as returned by one successful extraction.
///
/// Exactly one instance is live at a time; a new upload replaces it wholly,
/// never merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    /// Invoice number (Rg.-Nummer).
    pub invoice_number: String,

    /// Invoice date in DD.MM.YYYY format.
    pub invoice_date: String,

    /// Total net amount (Netto).
    pub total_net: f64,

    /// Total tax amount (MwSt.).
    pub total_tax: f64,

    /// Total gross amount (Brutto).
    pub total_gross: f64,

    /// All line items, in invoice order.
    pub line_items: Vec<InvoiceLineItem>,
}

/// One billable entry on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    /// 1-based position on the invoice (Pos).
    pub pos: u32,

    /// Article number (A.Nr), when the invoice prints one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,

    /// Article description (Artikelbezeichnung).
    pub description: String,

    /// Quantity (Menge).
    pub quantity: f64,

    /// Price per unit (Preis).
    pub unit_price: f64,

    /// Total price for the line (Betrag).
    pub total_price: f64,

    /// Tax rate percentage (S%).
    pub tax_rate: f64,

    /// Suggested account number from the chart of accounts. Passed through
    /// verbatim; an unknown number renders as an unselected choice.
    pub suggested_account_number: String,
}

impl InvoiceData {
    /// Parse the invoice date the classifier was instructed to format as
    /// DD.MM.YYYY. `None` when the classifier ignored the instruction.
    pub fn invoice_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.invoice_date, "%d.%m.%Y").ok()
    }
}
