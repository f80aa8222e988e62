//! Credential Storage Port
//!
//! Durable key-value slot holding the API credential.

use std::sync::Mutex;

use thiserror::Error;

/// Key the credential is stored under
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage format error: {0}")]
    Format(String),
}

/// Durable storage for a single credential
///
/// `load` returning `Ok(None)` means nothing was ever stored.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;

    fn save(&self, value: &str) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}

/// Process-local storage, used for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryCredentialStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryCredentialStorage {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(value.into())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, StorageError> {
        self.slot
            .lock()
            .map_err(|_| StorageError::Unavailable("credential slot poisoned".to_string()))
    }
}

impl CredentialStorage for MemoryCredentialStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        *self.lock()? = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.lock()? = None;
        Ok(())
    }
}
