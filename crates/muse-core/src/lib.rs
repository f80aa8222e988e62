//! Muse Domain Library
//!
//! Credential-scoped request lifecycle over the Gemini generative API.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Pure types and rules
//!   - `entities/`: Credential, GenerationRequest, ConversationMessage, PromptTemplate
//!   - `value_objects/`: Immutable value types (ContentKind, Sender, LifecycleState)
//!   - `errors/`: Lifecycle error taxonomy
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `services/`: Generative model, credential storage, output sinks
//!
//! - **Services** (`services/`): Credential store, request lifecycle, the three
//!   features, and the Gemini HTTP adapter
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use muse_core::{ContentKind, CredentialStore, GeminiClient, MemoryCredentialStorage, TextGenerator};
//!
//! let credentials = Arc::new(CredentialStore::load(Arc::new(MemoryCredentialStorage::default())));
//! credentials.set("my-key");
//! let generator = TextGenerator::new(credentials, Arc::new(GeminiClient::new()));
//! let submission = generator.generate("a lighthouse keeper", ContentKind::Story).await?;
//! ```

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types
pub use domain::{
    ContentKind, ConversationMessage, Credential, GenerationRequest, ImageAttachment,
    LifecycleError, LifecycleState, PromptTemplate, Sender, TemplateCatalog,
};
pub use ports::{
    Candidate, CandidateContent, Content, CredentialStorage, GenerateContentRequest,
    GenerateContentResponse, GenerativeModel, InlineData, MemoryCredentialStorage, OutputSink,
    Part, SinkError, StorageError,
};
pub use services::{
    ChatSession, CredentialStore, GeminiClient, ImageAnalyzer, ModelSettings, RequestLifecycle,
    Submission, TextGenerator,
};
