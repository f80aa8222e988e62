//! Config-file backed credential storage

use std::path::PathBuf;

use muse_core::{CredentialStorage, StorageError};

use crate::config::Config;

/// Keeps the credential under `gemini_api_key` in config.toml
pub struct ConfigCredentialStorage {
    path: PathBuf,
}

impl ConfigCredentialStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Config, StorageError> {
        Config::load_from(&self.path).map_err(|e| StorageError::Format(format!("{:#}", e)))
    }

    fn write(&self, config: &Config) -> Result<(), StorageError> {
        config
            .save_to(&self.path)
            .map_err(|e| StorageError::Unavailable(format!("{:#}", e)))
    }
}

impl CredentialStorage for ConfigCredentialStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.read()?.gemini_api_key.filter(|key| !key.is_empty()))
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        let mut config = self.read()?;
        config.gemini_api_key = Some(value.to_string());
        self.write(&config)
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut config = self.read()?;
        if config.gemini_api_key.is_none() {
            return Ok(());
        }
        config.gemini_api_key = None;
        self.write(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muse_core::ports::CREDENTIAL_KEY;
    use muse_core::CredentialStore;
    use std::sync::Arc;

    #[test]
    fn test_store_persists_through_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let store = CredentialStore::load(Arc::new(ConfigCredentialStorage::new(&path)));
        assert!(!store.has_credential());
        store.set("abc");

        let reopened = CredentialStore::load(Arc::new(ConfigCredentialStorage::new(&path)));
        assert_eq!(reopened.get().expose(), "abc");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(CREDENTIAL_KEY));
    }

    #[test]
    fn test_clear_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.gemini_api_key = Some("abc".to_string());
        config.text_model = "custom-model".to_string();
        config.save_to(&path).unwrap();

        let storage = ConfigCredentialStorage::new(&path);
        storage.clear().unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert!(reloaded.gemini_api_key.is_none());
        assert_eq!(reloaded.text_model, "custom-model");
    }

    #[test]
    fn test_empty_key_in_file_reads_as_unset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "gemini_api_key = \"\"\n").unwrap();

        assert_eq!(ConfigCredentialStorage::new(&path).load().unwrap(), None);
    }
}
