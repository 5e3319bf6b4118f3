//! Error types for the belegscan-core library.
//!
//! Each pipeline stage fails with its own enum: the encoder with
//! [`EncodingError`], the extraction client with [`ExtractionError`]. The
//! review state consumes `ExtractionError` directly, so there is no umbrella
//! type above these.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while encoding a document for transport.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// The document file could not be read. Terminal for the upload.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while extracting invoice data from a document.
///
/// Both variants display the fixed user-facing message; the original cause
/// stays reachable through `source()` for diagnostics.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The classifier call itself failed (unreachable, API error, empty
    /// response).
    #[error("Failed to analyze the invoice. The AI model could not process the request.")]
    Classifier(#[source] belegscan_classify::ClassifyError),

    /// The classifier answered, but the text was not schema-conformant:
    /// invalid JSON, a missing required field, or a mistyped value.
    #[error("Failed to analyze the invoice. The AI model could not process the request.")]
    Schema(#[source] serde_json::Error),
}
