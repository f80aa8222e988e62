//! Generative Model Port
//!
//! Abstract interface for one `generateContent` call, together with the
//! wire shapes it exchanges.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Credential, GenerationRequest, LifecycleError, RequestPayload};

// ============================================
// Request Types
// ============================================

/// `{contents:[{parts:[...]}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A single content part: text or inline binary data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl From<&GenerationRequest> for GenerateContentRequest {
    fn from(request: &GenerationRequest) -> Self {
        let parts = match &request.payload {
            RequestPayload::Text(text) => vec![Part::Text { text: text.clone() }],
            RequestPayload::TextWithImage { text, image } => vec![
                Part::Text { text: text.clone() },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            ],
        };

        Self {
            contents: vec![Content { parts }],
        }
    }
}

// ============================================
// Response Types
// ============================================

/// `{candidates:[{content:{parts:[{text}]}}]}`, every level optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Response carrying a single candidate with one text part
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![ResponsePart {
                        text: Some(text.into()),
                    }]),
                }),
            }]),
        }
    }

    /// Text of the first candidate's first part, if non-empty
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }
}

// ============================================
// Port
// ============================================

/// Generative endpoint interface
///
/// Implementations map network failures to `LifecycleError::Transport` and
/// non-success statuses or undecodable bodies to `LifecycleError::Protocol`.
/// A decodable body with missing fields is returned as-is; deciding what a
/// missing candidate means is left to the caller.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one `generateContent` call against `model`
    async fn generate_content(
        &self,
        model: &str,
        credential: &Credential,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LifecycleError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str {
        "google"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContentKind, ImageAttachment};

    #[test]
    fn test_text_request_wire_shape() {
        let request = GenerateContentRequest::from(&GenerationRequest::text("tea", ContentKind::Email));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{ "parts": [{ "text": "Create a email about: tea" }] }]
            })
        );
    }

    #[test]
    fn test_image_request_wire_shape() {
        let image = ImageAttachment::from_data_uri("data:image/jpeg;base64,QUJD", "image/png");
        let request = GenerateContentRequest::from(&GenerationRequest::image(image));
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert!(parts[0]["text"].as_str().unwrap().starts_with("Analyze this image"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "QUJD");
    }

    #[test]
    fn test_first_text_takes_first_candidate_first_part() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "hello" }, { "text": "ignored" }] } },
                { "content": { "parts": [{ "text": "second" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("hello"));
    }

    #[test]
    fn test_first_text_missing_fields() {
        let empty: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.first_text(), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{}}]}"#).unwrap();
        assert_eq!(no_parts.first_text(), None);

        let blank: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#)
                .unwrap();
        assert_eq!(blank.first_text(), None);
    }
}
