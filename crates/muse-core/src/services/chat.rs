//! Chat Session
//!
//! Two-phase conversation update: the user's message is appended before the
//! call is dispatched, and exactly one assistant message is appended once it
//! settles. Failures become an apologetic assistant message instead of an
//! error returned to the caller.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::{
    Conversation, ConversationMessage, GenerationRequest, LifecycleError, LifecycleState, Sender,
    CHAT_ERROR_REPLY,
};
use crate::ports::{GenerateContentRequest, GenerativeModel};
use crate::services::credential_store::CredentialStore;
use crate::services::gemini::DEFAULT_TEXT_MODEL;
use crate::services::lifecycle::{RequestLifecycle, Submission};

/// Assistant text when the response carries no candidate text
pub const CHAT_FALLBACK: &str = "No response generated";

pub struct ChatSession {
    credentials: Arc<CredentialStore>,
    model: Arc<dyn GenerativeModel>,
    model_name: String,
    lifecycle: RequestLifecycle,
    conversation: Mutex<Conversation>,
}

impl ChatSession {
    pub fn new(credentials: Arc<CredentialStore>, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            credentials,
            model,
            model_name: DEFAULT_TEXT_MODEL.to_string(),
            lifecycle: RequestLifecycle::new("chat"),
            conversation: Mutex::new(Conversation::new()),
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Send one user message.
    ///
    /// Blank input and a missing credential are returned as errors with the
    /// conversation untouched. Anything that goes wrong after dispatch is
    /// reported as an assistant message.
    pub async fn send(&self, input: &str) -> Result<Submission, LifecycleError> {
        let credential = self.credentials.get();

        self.lifecycle
            .submit(
                || {
                    if input.trim().is_empty() {
                        return Err(LifecycleError::validation("Please enter a message"));
                    }
                    if !credential.is_set() {
                        return Err(LifecycleError::MissingCredential);
                    }
                    Ok(())
                },
                || async {
                    self.conversation().append(Sender::User, input);

                    let request = GenerateContentRequest::from(&GenerationRequest::chat(input));
                    self.model
                        .generate_content(&self.model_name, &credential, &request)
                        .await
                        .map(|response| response.first_text().unwrap_or(CHAT_FALLBACK).to_string())
                },
                |outcome| {
                    let reply = match outcome {
                        Ok(text) => text.as_str(),
                        Err(_) => CHAT_ERROR_REPLY,
                    };
                    self.conversation().append(Sender::Assistant, reply);
                },
            )
            .await
    }

    /// Snapshot of the conversation so far
    pub fn messages(&self) -> Vec<ConversationMessage> {
        self.conversation().messages().to_vec()
    }

    pub fn last_message(&self) -> Option<ConversationMessage> {
        self.conversation().last().cloned()
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    pub fn teardown(&self) {
        self.lifecycle.teardown();
    }

    fn conversation(&self) -> MutexGuard<'_, Conversation> {
        match self.conversation.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
