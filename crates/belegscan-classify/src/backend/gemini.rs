//! Google Gemini `generateContent` backend.
//!
//! Speaks the v1beta REST API: one request carrying a text part, an inline
//! document part, and a `generationConfig` that pins the response to
//! `application/json` under the declared schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::Classifier;
use crate::{ClassifyError, EncodedDocument, Result};

/// Default public API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for invoice analysis.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Classifier backed by the Gemini REST API.
pub struct GeminiClassifier {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClassifier {
    /// Create a backend with the default model and endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Use a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point at a different endpoint (e.g. a local stub server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClassifier {
    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_body<'a>(
        instruction: &'a str,
        document: &'a EncodedDocument,
        schema: &'a Value,
    ) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: Some(instruction),
                        inline_data: None,
                    },
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: &document.mime_type,
                            data: &document.data,
                        }),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        }
    }

    /// Pull the concatenated candidate text out of a response body.
    ///
    /// A body that is not the expected envelope is a
    /// [`ClassifyError::MalformedResponse`]; an envelope without any
    /// candidate text is [`ClassifyError::EmptyResponse`].
    fn candidate_text(body: &str) -> Result<String> {
        let envelope: GenerateResponse = serde_json::from_str(body)?;

        let text: String = envelope
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(ClassifyError::EmptyResponse);
        }
        Ok(text)
    }
}

impl Classifier for GeminiClassifier {
    async fn request(
        &self,
        instruction: &str,
        document: &EncodedDocument,
        schema: &Value,
    ) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(ClassifyError::Config("API key is empty".to_string()));
        }

        let body = Self::build_body(instruction, document, schema);

        debug!(
            model = %self.model,
            mime_type = %document.mime_type,
            payload_bytes = document.data.len(),
            "dispatching generateContent request"
        );

        let response = self.http.post(self.endpoint()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let text = Self::candidate_text(&body)?;

        debug!(response_bytes = text.len(), "received candidate text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn request_body_has_text_and_inline_data_parts() {
        let document = EncodedDocument {
            data: "aGVsbG8=".to_string(),
            mime_type: "image/jpeg".to_string(),
        };
        let schema = json!({"type": "OBJECT"});

        let body = GeminiClassifier::build_body("analyze this", &document, &schema);
        let wire = serde_json::to_value(&body).unwrap();

        assert_eq!(
            wire,
            json!({
                "contents": [{
                    "parts": [
                        {"text": "analyze this"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "aGVsbG8="}},
                    ]
                }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "OBJECT"},
                }
            })
        );
    }

    #[test]
    fn endpoint_includes_model_and_key() {
        let backend = GeminiClassifier::new("secret")
            .with_model("gemini-2.5-flash")
            .with_base_url("http://localhost:9090/");

        assert_eq!(
            backend.endpoint(),
            "http://localhost:9090/v1beta/models/gemini-2.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn response_text_is_concatenated_across_parts() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "{\"a\":"},
                        {"text": "1}"},
                    ]
                }
            }]
        })
        .to_string();

        let text = GeminiClassifier::candidate_text(&body).unwrap();
        assert_eq!(text, "{\"a\":1}");
    }

    #[test]
    fn non_envelope_body_is_a_malformed_response() {
        let err = GeminiClassifier::candidate_text("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, ClassifyError::MalformedResponse(_)));
    }

    #[test]
    fn envelope_without_candidate_text_is_an_empty_response() {
        for body in ["{}", r#"{"candidates": [{"content": {"parts": []}}]}"#] {
            let err = GeminiClassifier::candidate_text(body).unwrap_err();
            assert!(matches!(err, ClassifyError::EmptyResponse));
        }
    }
}
