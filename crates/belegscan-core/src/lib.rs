//! Core library for belegscan invoice processing.
//!
//! This crate provides:
//! - the fixed chart of bookkeeping accounts used for categorization
//! - document encoding for classifier transport
//! - schema-constrained extraction request building and the extraction client
//! - the editable invoice review state

pub mod accounts;
pub mod document;
pub mod error;
pub mod extract;
pub mod models;
pub mod review;

pub use accounts::{AccountChart, AccountingAccount};
pub use document::{encode_file, mime_for_extension};
pub use error::{EncodingError, ExtractionError};
pub use extract::{ExtractionRequest, InvoiceExtractor, build_request, response_schema};
pub use models::config::ScanConfig;
pub use models::invoice::{InvoiceData, InvoiceLineItem};
pub use review::{Generation, InvoiceReview, ReviewPhase};

/// Re-export classifier types.
pub use belegscan_classify::{Classifier, ClassifyError, EncodedDocument, GeminiClassifier};
