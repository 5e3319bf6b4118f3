//! Document encoding for classifier transport.

use std::path::Path;

use tracing::debug;

use crate::EncodedDocument;
use crate::error::EncodingError;

/// Media type for a file extension accepted by the pipeline.
///
/// Returns `None` for anything that is not a PNG, JPEG, WEBP, or PDF.
/// Filtering is the presentation layer's job; the encoder itself accepts
/// any bytes with any media-type string.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Read a file fully and encode it for transport.
///
/// The media type is passed through untouched. A read failure surfaces as
/// [`EncodingError::Read`] and halts the pipeline; there is no retry.
pub fn encode_file(path: &Path, mime_type: &str) -> Result<EncodedDocument, EncodingError> {
    let bytes = std::fs::read(path).map_err(|source| EncodingError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        size = bytes.len(),
        mime_type,
        "encoded document"
    );

    Ok(EncodedDocument::from_bytes(&bytes, mime_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use std::io::Write as _;

    #[test]
    fn accepted_extensions_map_to_media_types() {
        assert_eq!(mime_for_extension("png"), Some("image/png"));
        assert_eq!(mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("webp"), Some("image/webp"));
        assert_eq!(mime_for_extension("pdf"), Some("application/pdf"));
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        assert_eq!(mime_for_extension("txt"), None);
        assert_eq!(mime_for_extension("docx"), None);
        assert_eq!(mime_for_extension(""), None);
    }

    #[test]
    fn file_contents_round_trip_through_encoding() {
        let payload = b"\x89PNG\r\n\x1a\nnot really a png but bytes are bytes";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(payload).unwrap();

        let doc = encode_file(file.path(), "image/png").unwrap();

        assert_eq!(doc.mime_type, "image/png");
        assert_eq!(STANDARD.decode(&doc.data).unwrap(), payload);
    }

    #[test]
    fn unreadable_file_reports_encoding_error() {
        let err = encode_file(Path::new("/no/such/file.png"), "image/png").unwrap_err();
        let EncodingError::Read { path, .. } = err;
        assert_eq!(path, Path::new("/no/such/file.png"));
    }
}
