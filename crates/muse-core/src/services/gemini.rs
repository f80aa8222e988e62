//! Gemini HTTP adapter for the `GenerativeModel` port.
//!
//! Calls `POST {base_url}/{model}:generateContent?key={api_key}`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Credential, LifecycleError};
use crate::ports::{GenerateContentRequest, GenerateContentResponse, GenerativeModel};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_VISION_MODEL: &str = "gemini-2.5-flash";

/// Model names used by each feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub text_model: String,
    pub vision_model: String,
    pub chat_model: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            chat_model: DEFAULT_TEXT_MODEL.to_string(),
        }
    }
}

/// reqwest-backed Gemini client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at another endpoint (proxies, test servers)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model)
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        credential: &Credential,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LifecycleError> {
        let parts: usize = request.contents.iter().map(|c| c.parts.len()).sum();
        debug!(provider = self.provider_name(), model = %model, parts, "Calling generateContent");

        let response = self
            .client
            .post(self.endpoint(model))
            .query(&[("key", credential.expose())])
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let body = response
            .text()
            .await
            .map_err(transport_error)?;

        serde_json::from_str::<GenerateContentResponse>(&body).map_err(|err| {
            warn!(error = %err, "Gemini response body could not be decoded");
            LifecycleError::protocol(Some(status.as_u16()), format!("Failed to parse response: {}", err))
        })
    }
}

/// The request URL carries the API key, so it never reaches the message
fn transport_error(err: reqwest::Error) -> LifecycleError {
    LifecycleError::Transport(err.without_url().to_string())
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn map_http_error(status: StatusCode, body: String) -> LifecycleError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    LifecycleError::protocol(Some(status.as_u16()), message)
}
