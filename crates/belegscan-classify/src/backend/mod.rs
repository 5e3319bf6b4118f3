//! Classifier backend implementations.

pub mod gemini;

use serde_json::Value;

use crate::{EncodedDocument, Result};

/// Trait for schema-constrained classifier backends.
///
/// A backend takes an instruction, an inline document, and a JSON output
/// schema the response must conform to, and returns the raw response text.
/// The caller parses that text against its own typed model. Any service with
/// this shape can stand in for another; tests substitute a deterministic
/// stub.
pub trait Classifier {
    /// Issue a single classification request.
    ///
    /// One shot: no retry, backoff, or timeout. A failed attempt is terminal
    /// for the caller's current pipeline run.
    fn request(
        &self,
        instruction: &str,
        document: &EncodedDocument,
        schema: &Value,
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}
