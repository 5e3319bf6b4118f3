//! Extraction request building: instruction text and output schema.

use serde_json::{Value, json};

use crate::EncodedDocument;
use crate::accounts::AccountChart;

/// A fully composed classification request.
///
/// Construction is pure and deterministic: identical inputs yield an
/// identical request.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    /// Natural-language task instruction, including the serialized chart.
    pub instruction: String,

    /// The encoded document payload.
    pub document: EncodedDocument,

    /// JSON output schema the response must conform to. This is the binding
    /// contract with the classifier, not advisory prose.
    pub schema: Value,
}

/// Compose the classification request for one encoded document.
pub fn build_request(document: &EncodedDocument, chart: &AccountChart) -> ExtractionRequest {
    ExtractionRequest {
        instruction: build_instruction(chart),
        document: document.clone(),
        schema: response_schema(),
    }
}

fn build_instruction(chart: &AccountChart) -> String {
    format!(
        "You are an expert AI assistant for accounting, specialized in parsing German \
         invoices and categorizing line items.\n\
         Your task is to analyze the provided invoice document (image or PDF) and do the following:\n\
         1. Extract key invoice details: invoice number (Rg.-Nummer), invoice date (Rg.-Datum), \
         total net amount (Netto), total tax amount (MwSt. EUR), and total gross amount \
         (RG Betrag -Euro or Brutto).\n\
         2. Extract all line items. For each item, capture the position (Pos), article number \
         (A.Nr), description (Artikelbezeichnung), quantity (Menge), unit price (Preis), \
         total price (Betrag), and tax rate (S%).\n\
         3. For each line item, suggest the most appropriate accounting account number from the \
         chart of accounts provided below. Base your suggestion on the item's description. \
         For example, if an item is 'Döner ekmegi', suggest '5308' (Dönerbrot). If an item is \
         'lahmacun', suggest '5309' (Lahmacun).\n\
         4. Return all extracted data in a single, valid JSON object that adheres to the \
         provided schema. Ensure all monetary values are numbers (e.g., 644,63 becomes 644.63).\n\
         \n\
         Chart of Accounts:\n\
         {}",
        chart.context_json()
    )
}

/// The declared output schema: an object requiring the invoice-level fields
/// and an array of line items with per-item required fields. `articleNumber`
/// is the only optional item field.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "invoiceNumber": { "type": "STRING", "description": "The invoice number." },
            "invoiceDate": { "type": "STRING", "description": "The invoice date in DD.MM.YYYY format." },
            "totalNet": { "type": "NUMBER", "description": "The total net amount." },
            "totalTax": { "type": "NUMBER", "description": "The total tax amount (MwSt.)." },
            "totalGross": { "type": "NUMBER", "description": "The total gross amount (Brutto)." },
            "lineItems": {
                "type": "ARRAY",
                "description": "An array of all line items from the invoice.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "pos": { "type": "INTEGER", "description": "The position number of the line item." },
                        "articleNumber": { "type": "STRING", "description": "The article number (A.Nr), if available." },
                        "description": { "type": "STRING", "description": "The description of the article (Artikelbezeichnung)." },
                        "quantity": { "type": "NUMBER", "description": "The quantity (Menge) of the item." },
                        "unitPrice": { "type": "NUMBER", "description": "The price per unit (Preis)." },
                        "totalPrice": { "type": "NUMBER", "description": "The total price for the line item (Betrag)." },
                        "taxRate": { "type": "NUMBER", "description": "The tax rate percentage (S%) for the item." },
                        "suggestedAccountNumber": { "type": "STRING", "description": "The suggested accounting account number from the provided list." }
                    },
                    "required": [
                        "pos", "description", "quantity", "unitPrice",
                        "totalPrice", "taxRate", "suggestedAccountNumber"
                    ]
                }
            }
        },
        "required": [
            "invoiceNumber", "invoiceDate", "totalNet",
            "totalTax", "totalGross", "lineItems"
        ]
    })
}
