//! Domain Errors
//!
//! Error taxonomy for one request lifecycle cycle.

use thiserror::Error;

/// Errors raised while submitting or running a request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Input rejected before dispatch (empty prompt, no image selected)
    #[error("Validation error: {0}")]
    Validation(String),

    /// No credential configured; nothing was sent
    #[error("API key required")]
    MissingCredential,

    /// Network failure, timeout, or abort
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success status or a body that could not be decoded
    #[error("Protocol error ({}): {message}", .status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()))]
    Protocol {
        status: Option<u16>,
        message: String,
    },
}

impl LifecycleError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    pub fn protocol<T: Into<String>>(status: Option<u16>, message: T) -> Self {
        Self::Protocol {
            status,
            message: message.into(),
        }
    }

    /// Text safe to show to the user.
    ///
    /// Transport and protocol details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::MissingCredential => "Please set your Gemini API key first".to_string(),
            Self::Transport(_) | Self::Protocol { .. } => {
                "Request failed. Please check your API key and try again.".to_string()
            }
        }
    }

    /// Whether the error was raised before anything reached the network
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::MissingCredential)
    }
}
