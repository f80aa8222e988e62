//! Test doubles shared by the feature tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::{ContentKind, Credential, LifecycleError};
use crate::ports::{
    GenerateContentRequest, GenerateContentResponse, GenerativeModel, InlineData, OutputSink, Part,
    SinkError,
};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub api_key: String,
    pub request: GenerateContentRequest,
}

impl RecordedCall {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.request.contents.iter().flat_map(|c| c.parts.iter())
    }

    pub fn text(&self) -> Option<String> {
        self.parts().find_map(|part| match part {
            Part::Text { text } => Some(text.clone()),
            _ => None,
        })
    }

    pub fn inline_data(&self) -> Option<InlineData> {
        self.parts().find_map(|part| match part {
            Part::InlineData { inline_data } => Some(inline_data.clone()),
            _ => None,
        })
    }
}

/// `GenerativeModel` that answers every call with the same scripted outcome.
///
/// With a gate installed, each call signals `started` and then waits for
/// `release` before answering.
pub struct ScriptedModel {
    outcome: Result<GenerateContentResponse, LifecycleError>,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
    gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Self {
        Self::from_outcome(Ok(GenerateContentResponse::with_text(text)))
    }

    pub fn with_body(body: serde_json::Value) -> Self {
        Self::from_outcome(Ok(serde_json::from_value(body).expect("scripted body")))
    }

    pub fn failing(error: LifecycleError) -> Self {
        Self::from_outcome(Err(error))
    }

    fn from_outcome(outcome: Result<GenerateContentResponse, LifecycleError>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every call until `release` is notified; `started` fires on entry
    pub fn gated(mut self, started: Arc<Notify>, release: Arc<Notify>) -> Self {
        self.gate = Some((started, release));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedCall> {
        self.recorded.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_content(
        &self,
        model: &str,
        credential: &Credential,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, LifecycleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            api_key: credential.expose().to_string(),
            request: request.clone(),
        });

        if let Some((started, release)) = &self.gate {
            started.notify_one();
            release.notified().await;
        }

        self.outcome.clone()
    }
}

/// Sink that records deliveries, or always fails when broken
#[derive(Default)]
pub struct CollectingSink {
    broken: bool,
    delivered: Mutex<Vec<(String, Option<ContentKind>)>>,
}

impl CollectingSink {
    pub fn broken() -> Self {
        Self {
            broken: true,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn delivered(&self) -> Vec<(String, Option<ContentKind>)> {
        self.delivered.lock().unwrap().clone()
    }
}

impl OutputSink for CollectingSink {
    fn name(&self) -> &str {
        "collecting"
    }

    fn deliver(&self, text: &str, kind: Option<ContentKind>) -> Result<(), SinkError> {
        if self.broken {
            return Err(SinkError::unavailable("sink unavailable"));
        }
        self.delivered.lock().unwrap().push((text.to_string(), kind));
        Ok(())
    }
}
