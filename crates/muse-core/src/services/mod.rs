//! Services
//!
//! The credential store, the request lifecycle controller, the three
//! features built on it, and the Gemini HTTP adapter.

pub mod chat;
pub mod credential_store;
pub mod gemini;
pub mod image_analyzer;
pub mod lifecycle;
pub mod text_generator;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{ChatSession, CHAT_FALLBACK};
pub use credential_store::CredentialStore;
pub use gemini::{GeminiClient, ModelSettings};
pub use image_analyzer::{ImageAnalyzer, ANALYSIS_FALLBACK};
pub use lifecycle::{RequestLifecycle, Submission};
pub use text_generator::{TextGenerator, TEXT_FALLBACK};
