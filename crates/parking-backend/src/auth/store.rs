use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

const SERVICE_NAME: &str = "parking-spot";

/// Fixed storage key for the bearer token
pub const TOKEN_KEY: &str = "auth_token";

/// Token store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No token stored")]
    NoToken,
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Trait for token storage operations
///
/// This abstraction allows easy mocking of token storage in tests.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Saves the bearer token
    async fn save(&self, token: &str) -> Result<()>;

    /// Loads the stored bearer token
    async fn load(&self) -> Result<String, StoreError>;

    /// Deletes the stored token
    async fn delete(&self) -> Result<()>;

    /// Checks if a token is stored
    async fn has_token(&self) -> bool;
}

/// Token storage using a plain file with a keyring entry as secondary store
///
/// The file is read first; the keyring is consulted only when the file is missing.
pub struct FileTokenStore {
    keyring_entry: Option<keyring::Entry>,
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a token store under the application config directory
    pub fn new() -> Result<Self> {
        let config_dir = crate::config::ConfigManager::config_dir()?;
        std::fs::create_dir_all(&config_dir)?;

        Ok(Self {
            keyring_entry: keyring::Entry::new(SERVICE_NAME, TOKEN_KEY).ok(),
            path: config_dir.join(TOKEN_KEY),
        })
    }

    /// Creates a file-only token store at a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            keyring_entry: None,
            path,
        }
    }
}

fn non_empty(token: String) -> Result<String, StoreError> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        Err(StoreError::NoToken)
    } else {
        Ok(trimmed.to_string())
    }
}

#[async_trait]
impl TokenStorage for FileTokenStore {
    async fn save(&self, token: &str) -> Result<()> {
        std::fs::write(&self.path, token).context("Failed to write token file")?;

        if let Some(ref entry) = self.keyring_entry {
            if let Err(e) = entry.set_password(token) {
                tracing::debug!("Keyring unavailable, token kept in file only: {}", e);
            }
        }

        Ok(())
    }

    async fn load(&self) -> Result<String, StoreError> {
        if self.path.exists() {
            let data = std::fs::read_to_string(&self.path)
                .map_err(|e| StoreError::Storage(e.into()))?;
            return non_empty(data);
        }

        if let Some(ref entry) = self.keyring_entry {
            if let Ok(data) = entry.get_password() {
                return non_empty(data);
            }
        }

        Err(StoreError::NoToken)
    }

    async fn delete(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to delete token file")?;
        }

        if let Some(ref entry) = self.keyring_entry {
            let _ = entry.delete_credential();
        }

        Ok(())
    }

    async fn has_token(&self) -> bool {
        self.load().await.is_ok()
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MemoryTokenStore;
    use super::*;

    // === MemoryTokenStore tests ===

    #[tokio::test]
    async fn memory_store_save_and_load() {
        let store = MemoryTokenStore::new();

        store.save("abc123").await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, "abc123");
    }

    #[tokio::test]
    async fn memory_store_load_empty_returns_error() {
        let store = MemoryTokenStore::new();
        let result = store.load().await;

        assert!(matches!(result, Err(StoreError::NoToken)));
    }

    #[tokio::test]
    async fn memory_store_empty_string_is_no_token() {
        let store = MemoryTokenStore::with_token("");
        assert!(matches!(store.load().await, Err(StoreError::NoToken)));
        assert!(!store.has_token().await);
    }

    #[tokio::test]
    async fn memory_store_delete_removes_token() {
        let store = MemoryTokenStore::with_token("abc123");

        assert!(store.has_token().await);

        store.delete().await.unwrap();

        assert!(!store.has_token().await);
        assert!(matches!(store.load().await, Err(StoreError::NoToken)));
    }

    #[tokio::test]
    async fn broken_store_reports_storage_error() {
        let store = MemoryTokenStore::broken();
        assert!(matches!(store.load().await, Err(StoreError::Storage(_))));
    }

    // === FileTokenStore tests (with temp files) ===

    #[tokio::test]
    async fn file_store_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::with_path(temp_dir.path().join(TOKEN_KEY));

        store.save("jwt.token.value").await.unwrap();

        assert_eq!(store.load().await.unwrap(), "jwt.token.value");
    }

    #[tokio::test]
    async fn file_store_trims_surrounding_whitespace() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(TOKEN_KEY);
        std::fs::write(&path, "  tok\n").unwrap();

        let store = FileTokenStore::with_path(path);
        assert_eq!(store.load().await.unwrap(), "tok");
    }

    #[tokio::test]
    async fn file_store_load_nonexistent_returns_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::with_path(temp_dir.path().join("nonexistent"));

        assert!(matches!(store.load().await, Err(StoreError::NoToken)));
    }

    #[tokio::test]
    async fn file_store_delete_removes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(TOKEN_KEY);

        let store = FileTokenStore::with_path(path.clone());
        store.save("abc").await.unwrap();

        assert!(path.exists());

        store.delete().await.unwrap();

        assert!(!path.exists());
        assert!(!store.has_token().await);
    }

    #[tokio::test]
    async fn file_store_has_token() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::with_path(temp_dir.path().join(TOKEN_KEY));

        assert!(!store.has_token().await);

        store.save("abc").await.unwrap();

        assert!(store.has_token().await);
    }
}
