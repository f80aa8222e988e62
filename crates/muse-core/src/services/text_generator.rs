//! Text Generator
//!
//! Prompt + content kind in, generated text out.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::domain::{ContentKind, GenerationRequest, LifecycleError, LifecycleState};
use crate::ports::{GenerateContentRequest, GenerativeModel, OutputSink};
use crate::services::credential_store::CredentialStore;
use crate::services::gemini::DEFAULT_TEXT_MODEL;
use crate::services::lifecycle::{RequestLifecycle, Submission};

/// Result text when the response carries no candidate text
pub const TEXT_FALLBACK: &str = "No content generated";

pub struct TextGenerator {
    credentials: Arc<CredentialStore>,
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    lifecycle: RequestLifecycle,
    output_kind: Mutex<Option<ContentKind>>,
}

impl TextGenerator {
    pub fn new(credentials: Arc<CredentialStore>, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            credentials,
            model,
            model_name: DEFAULT_TEXT_MODEL.to_string(),
            lifecycle: RequestLifecycle::new("text_generator"),
            output_kind: Mutex::new(None),
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Generate content of `kind` about `prompt`
    pub async fn generate(&self, prompt: &str, kind: ContentKind) -> Result<Submission, LifecycleError> {
        let credential = self.credentials.get();

        self.lifecycle
            .submit(
                || {
                    if prompt.trim().is_empty() {
                        return Err(LifecycleError::validation("Please enter a prompt"));
                    }
                    if !credential.is_set() {
                        return Err(LifecycleError::MissingCredential);
                    }
                    Ok(())
                },
                || async {
                    let request = GenerateContentRequest::from(&GenerationRequest::text(prompt, kind));
                    self.model
                        .generate_content(&self.model_name, &credential, &request)
                        .await
                        .map(|response| response.first_text().unwrap_or(TEXT_FALLBACK).to_string())
                },
                |outcome| {
                    if outcome.is_ok() {
                        if let Ok(mut slot) = self.output_kind.lock() {
                            *slot = Some(kind);
                        }
                    }
                },
            )
            .await
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Last generated text, kept across failed cycles
    pub fn output(&self) -> Option<String> {
        self.lifecycle.last_output()
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    /// Hand the current output to a sink (clipboard, file).
    ///
    /// Best-effort: returns whether the sink accepted it.
    pub fn export(&self, sink: &dyn OutputSink) -> bool {
        let Some(text) = self.output() else {
            return false;
        };
        let kind = self.output_kind.lock().ok().and_then(|slot| *slot);

        match sink.deliver(&text, kind) {
            Ok(()) => {
                info!(sink = sink.name(), "Generated text exported");
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
