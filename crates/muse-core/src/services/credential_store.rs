//! Credential Store
//!
//! Single source of truth for the API key, injected into every feature.
//! Persistence is best-effort: a failed write is logged and the in-memory
//! value is updated anyway.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::domain::Credential;
use crate::ports::CredentialStorage;

pub struct CredentialStore {
    current: RwLock<Credential>,
    storage: Arc<dyn CredentialStorage>,
}

impl CredentialStore {
    /// Build the store, loading any previously persisted value
    pub fn load(storage: Arc<dyn CredentialStorage>) -> Self {
        let initial = match storage.load() {
            Ok(Some(value)) => Credential::new(value),
            Ok(None) => Credential::unset(),
            Err(e) => {
                warn!(error = %e, "Failed to load persisted credential, starting unset");
                Credential::unset()
            }
        };
        debug!(has_credential = initial.is_set(), "Credential store initialized");

        Self {
            current: RwLock::new(initial),
            storage,
        }
    }

    /// Current value; unset when nothing is configured
    pub fn get(&self) -> Credential {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the credential and persist it; empty clears the stored value
    pub fn set(&self, value: impl Into<String>) {
        let credential = Credential::new(value);

        let persisted = if credential.is_set() {
            self.storage.save(credential.expose())
        } else {
            self.storage.clear()
        };
        if let Err(e) = persisted {
            warn!(error = %e, "Failed to persist credential, keeping in-memory value");
        }

        match self.current.write() {
            Ok(mut guard) => *guard = credential,
            Err(poisoned) => *poisoned.into_inner() = credential,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.get().is_set()
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("current", &self.get())
            .finish()
    }
}
