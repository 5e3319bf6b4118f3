//! Schema-constrained invoice extraction.
//!
//! `request` composes the instruction and the binding output schema;
//! `client` dispatches it through a [`Classifier`](crate::Classifier)
//! backend and validates the response strictly against the typed model.

mod client;
mod request;

pub use client::InvoiceExtractor;
pub use request::{ExtractionRequest, build_request, response_schema};
