//! Inline document payload shared between the encoder and the backends.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// A document encoded for transport to a classifier backend.
///
/// `data` is the standard base64 encoding of the raw document bytes, with no
/// data-URL envelope or other prefix. Decoding it reproduces the original
/// bytes exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedDocument {
    /// Base64-encoded document bytes.
    pub data: String,

    /// Media type of the original file (e.g. "image/png").
    pub mime_type: String,
}

impl EncodedDocument {
    /// Encode raw bytes with the standard base64 alphabet.
    ///
    /// The media type string is preserved untouched; no type filtering
    /// happens here.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: STANDARD.encode(bytes),
            mime_type: mime_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_round_trips_exact_bytes() {
        let original: Vec<u8> = (0u8..=255).collect();
        let doc = EncodedDocument::from_bytes(&original, "application/pdf");

        assert_eq!(doc.mime_type, "application/pdf");
        assert!(!doc.data.starts_with("data:"));
        assert_eq!(STANDARD.decode(&doc.data).unwrap(), original);
    }

    #[test]
    fn empty_input_encodes_to_empty_string() {
        let doc = EncodedDocument::from_bytes(&[], "image/png");
        assert_eq!(doc.data, "");
    }

    #[test]
    fn mime_type_is_preserved_verbatim() {
        // The encoder never filters or normalizes; that is the caller's job.
        let doc = EncodedDocument::from_bytes(b"x", "application/x-whatever");
        assert_eq!(doc.mime_type, "application/x-whatever");
    }
}
