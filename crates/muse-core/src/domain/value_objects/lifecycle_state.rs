//! LifecycleState - Where a feature is in its submit/settle cycle

use serde::{Deserialize, Serialize};

/// State of one feature's request lifecycle
///
/// `Failed` carries the user-facing message, never the raw cause.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

impl LifecycleState {
    pub fn is_pending(&self) -> bool {
        matches!(self, LifecycleState::Pending)
    }

    /// Whether a new submission would be accepted
    pub fn accepts_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            LifecycleState::Succeeded(text) => Some(text),
            _ => None,
        }
    }
}
