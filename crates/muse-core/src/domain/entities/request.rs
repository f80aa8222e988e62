//! Request Entity
//!
//! Value object built at submit time and discarded after the response.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::domain::errors::LifecycleError;
use crate::domain::value_objects::ContentKind;

/// Fixed instruction sent alongside every analyzed image
pub const IMAGE_ANALYSIS_INSTRUCTION: &str = "Analyze this image in detail. Describe what you see, identify objects, people, colors, composition, and provide insights about the image.";

/// Image body ready to be sent as inline data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Base64 body without any `data:...;base64,` prefix
    pub data: String,
}

impl ImageAttachment {
    /// Encode raw image bytes
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: BASE64_STANDARD.encode(bytes),
        }
    }

    /// Accept either a data URI or a bare base64 body.
    ///
    /// Everything up to and including the first comma is dropped, and the
    /// MIME type is taken from the prefix when one is present.
    pub fn from_data_uri(input: &str, fallback_mime: &str) -> Self {
        match input.split_once(',') {
            Some((prefix, body)) => {
                let mime_type = prefix
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or(fallback_mime);
                Self {
                    mime_type: mime_type.to_string(),
                    data: body.to_string(),
                }
            }
            None => Self {
                mime_type: fallback_mime.to_string(),
                data: input.to_string(),
            },
        }
    }

    /// Read an image file and encode it, guessing the MIME type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, LifecycleError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(LifecycleError::validation(format!(
                "Not an image file: {}",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            LifecycleError::validation(format!("Failed to read {}: {}", path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(LifecycleError::validation("Image file is empty"));
        }

        Ok(Self::from_bytes(mime.essence_str(), &bytes))
    }

    /// Decoded size in bytes
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.chars().rev().take_while(|c| *c == '=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// Payload of a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    Text(String),
    TextWithImage { text: String, image: ImageAttachment },
}

/// One call's worth of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub payload: RequestPayload,
    pub content_kind: Option<ContentKind>,
}

impl GenerationRequest {
    /// Text generation: kind and prompt folded into one instruction
    pub fn text(prompt: &str, kind: ContentKind) -> Self {
        Self {
            payload: RequestPayload::Text(format!("Create a {} about: {}", kind, prompt)),
            content_kind: Some(kind),
        }
    }

    /// Image analysis with the fixed instruction
    pub fn image(image: ImageAttachment) -> Self {
        Self {
            payload: RequestPayload::TextWithImage {
                text: IMAGE_ANALYSIS_INSTRUCTION.to_string(),
                image,
            },
            content_kind: None,
        }
    }

    /// Chat turn: the user's text as-is
    pub fn chat(message: &str) -> Self {
        Self {
            payload: RequestPayload::Text(message.to_string()),
            content_kind: None,
        }
    }

    pub fn instruction(&self) -> &str {
        match &self.payload {
            RequestPayload::Text(text) => text,
            RequestPayload::TextWithImage { text, .. } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_prefix_is_stripped() {
        let raw = BASE64_STANDARD.encode(b"\x89PNG fake");
        let uri = format!("data:image/png;base64,{}", raw);

        let image = ImageAttachment::from_data_uri(&uri, "application/octet-stream");

        assert_eq!(image.data, raw);
        assert_eq!(image.mime_type, "image/png");
        assert!(!image.data.contains("base64,"));
    }

    #[test]
    fn test_bare_base64_passes_through() {
        let image = ImageAttachment::from_data_uri("aGVsbG8=", "image/jpeg");
        assert_eq!(image.data, "aGVsbG8=");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.decoded_len(), 5);
    }

    #[test]
    fn test_text_request_combines_kind_and_prompt() {
        let request = GenerationRequest::text("autumn in Kyoto", ContentKind::Blog);
        assert_eq!(request.instruction(), "Create a blog about: autumn in Kyoto");
        assert_eq!(request.content_kind, Some(ContentKind::Blog));
    }

    #[tokio::test]
    async fn test_from_path_encodes_file_without_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let image = ImageAttachment::from_path(&path).await.unwrap();

        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, BASE64_STANDARD.encode(b"not really a png"));
    }

    #[tokio::test]
    async fn test_from_path_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let err = ImageAttachment::from_path(&path).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(_)));
    }
}
