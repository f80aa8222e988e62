//! Image Analyzer
//!
//! Sends the selected image with a fixed analysis instruction.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::domain::{GenerationRequest, ImageAttachment, LifecycleError, LifecycleState};
use crate::ports::{GenerateContentRequest, GenerativeModel, OutputSink};
use crate::services::credential_store::CredentialStore;
use crate::services::gemini::DEFAULT_VISION_MODEL;
use crate::services::lifecycle::{RequestLifecycle, Submission};

/// Result text when the response carries no candidate text
pub const ANALYSIS_FALLBACK: &str = "No analysis generated";

pub struct ImageAnalyzer {
    credentials: Arc<CredentialStore>,
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    lifecycle: RequestLifecycle,
    selected: Mutex<Option<ImageAttachment>>,
}

impl ImageAnalyzer {
    pub fn new(credentials: Arc<CredentialStore>, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            credentials,
            model,
            model_name: DEFAULT_VISION_MODEL.to_string(),
            lifecycle: RequestLifecycle::new("image_analyzer"),
            selected: Mutex::new(None),
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Choose the image the next `analyze` call sends
    pub fn select(&self, image: ImageAttachment) {
        debug!(mime_type = %image.mime_type, bytes = image.decoded_len(), "Image selected");
        if let Ok(mut slot) = self.selected.lock() {
            *slot = Some(image);
        }
    }

    pub fn selected(&self) -> Option<ImageAttachment> {
        self.selected.lock().ok().and_then(|slot| slot.clone())
    }

    /// Drop the selection and the previous analysis
    pub fn clear(&self) {
        if let Ok(mut slot) = self.selected.lock() {
            *slot = None;
        }
        self.lifecycle.reset();
    }

    /// Analyze the selected image
    pub async fn analyze(&self) -> Result<Submission, LifecycleError> {
        let credential = self.credentials.get();
        let image = self.selected();

        self.lifecycle
            .submit(
                || {
                    if image.is_none() {
                        return Err(LifecycleError::validation("Please select an image first"));
                    }
                    if !credential.is_set() {
                        return Err(LifecycleError::MissingCredential);
                    }
                    Ok(())
                },
                || async {
                    let Some(image) = image.clone() else {
                        return Err(LifecycleError::validation("Please select an image first"));
                    };
                    let request = GenerateContentRequest::from(&GenerationRequest::image(image));
                    let response = self
                        .model
                        .generate_content(&self.model_name, &credential, &request)
                        .await?;
                    Ok(response
                        .first_text()
                        .unwrap_or(ANALYSIS_FALLBACK)
                        .to_string())
                },
                |_| {},
            )
            .await
    }

    /// Select `image` and analyze it in one step
    pub async fn analyze_image(&self, image: ImageAttachment) -> Result<Submission, LifecycleError> {
        if self.lifecycle.is_pending() {
            return Ok(Submission::Ignored);
        }
        self.select(image);
        self.analyze().await
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn analysis(&self) -> Option<String> {
        self.lifecycle.last_output()
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    /// Best-effort hand-off of the analysis text to a sink
    pub fn export(&self, sink: &dyn OutputSink) -> bool {
        let Some(text) = self.analysis() else {
            return false;
        };
        match sink.deliver(&text, None) {
            Ok(()) => {
                info!(sink = sink.name(), "Analysis exported");
                true
            }
            Err(e) => {
                warn!(sink = sink.name(), error = %e, "Export failed");
                false
            }
        }
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IMAGE_ANALYSIS_INSTRUCTION;
    use crate::ports::MemoryCredentialStorage;
    use crate::services::testing::ScriptedModel;

    fn analyzer(model: Arc<ScriptedModel>, key: &str) -> ImageAnalyzer {
        let store = Arc::new(CredentialStore::load(Arc::new(MemoryCredentialStorage::default())));
        store.set(key);
        ImageAnalyzer::new(store, model)
    }

    fn png() -> ImageAttachment {
        ImageAttachment::from_data_uri("data:image/png;base64,iVBORw0KGgo=", "image/png")
    }

    #[tokio::test]
    async fn test_no_image_selected_makes_no_call() {
        let model = Arc::new(ScriptedModel::replying("unused"));
        let analyzer = analyzer(model.clone(), "abc");

        let err = analyzer.analyze().await.unwrap_err();

        assert!(matches!(err, LifecycleError::Validation(_)));
        assert_eq!(analyzer.state(), LifecycleState::Idle);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let model = Arc::new(ScriptedModel::replying("unused"));
        let analyzer = analyzer(model.clone(), "");

        let err = analyzer.analyze_image(png()).await.unwrap_err();

        assert_eq!(err, LifecycleError::MissingCredential);
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_sends_instruction_and_raw_base64() {
        let model = Arc::new(ScriptedModel::replying("a cat on a sofa"));
        let analyzer = analyzer(model.clone(), "abc");

        let submission = analyzer.analyze_image(png()).await.unwrap();

        assert_eq!(
            submission,
            Submission::Settled(LifecycleState::Succeeded("a cat on a sofa".to_string()))
        );
        let sent = model.last_request().unwrap();
        assert_eq!(sent.model, DEFAULT_VISION_MODEL);
        assert_eq!(sent.text().as_deref(), Some(IMAGE_ANALYSIS_INSTRUCTION));
        let inline = sent.inline_data().unwrap();
        assert_eq!(inline.data, "iVBORw0KGgo=");
        assert_eq!(inline.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_missing_candidates_with_success_status_falls_back() {
        let model = Arc::new(ScriptedModel::with_body(serde_json::json!({ "candidates": [] })));
        let analyzer = analyzer(model, "abc");

        analyzer.analyze_image(png()).await.unwrap();

        assert_eq!(analyzer.state(), LifecycleState::Succeeded(ANALYSIS_FALLBACK.to_string()));
    }

    #[tokio::test]
    async fn test_non_success_status_fails() {
        let model = Arc::new(ScriptedModel::failing(LifecycleError::protocol(
            Some(403),
            "PERMISSION_DENIED: key revoked",
        )));
        let analyzer = analyzer(model, "abc");

        analyzer.analyze_image(png()).await.unwrap();

        let LifecycleState::Failed(message) = analyzer.state() else {
            panic!("expected Failed");
        };
        assert!(!message.contains("PERMISSION_DENIED"));
        assert!(!analyzer.is_pending());
    }

    #[tokio::test]
    async fn test_clear_drops_selection_and_analysis() {
        let model = Arc::new(ScriptedModel::replying("done"));
        let analyzer = analyzer(model, "abc");
        analyzer.analyze_image(png()).await.unwrap();

        analyzer.clear();

        assert!(analyzer.selected().is_none());
        assert!(analyzer.analysis().is_none());
        assert_eq!(analyzer.state(), LifecycleState::Idle);
    }
}
