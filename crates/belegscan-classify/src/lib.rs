//! Classifier abstraction layer for belegscan.
//!
//! This crate provides a unified interface for schema-constrained document
//! classification:
//! - [`Classifier`], the trait every backend satisfies: instruction text plus
//!   an inline document and a declared JSON output schema in, raw response
//!   text out
//! - [`GeminiClassifier`], the Google Gemini `generateContent` backend
//! - [`EncodedDocument`], the transport payload shared with callers

mod backend;
mod document;
mod error;

pub use backend::Classifier;
pub use backend::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClassifier};
pub use document::EncodedDocument;
pub use error::ClassifyError;

/// Result type for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;
