use crate::domain_model::AccessToken;
use crate::domain_port::{StoreError, TokenStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedSlot {
    access_token: Option<String>,
}

/// Token slot backed by a JSON file so the credential survives process
/// restarts within the same session. The file is read once, lazily, on
/// first access and written through on every mutation.
pub struct FileTokenStore {
    path: PathBuf,
    // Outer None means the file has not been read yet.
    cache: Mutex<Option<Option<AccessToken>>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    async fn load(&self) -> Result<Option<AccessToken>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let slot: PersistedSlot = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Store(format!("corrupt token file: {e}")))?;
                Ok(slot.access_token.map(AccessToken))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Store(e.to_string())),
        }
    }

    async fn persist(&self, slot: &Option<AccessToken>) -> Result<(), StoreError> {
        let record = PersistedSlot {
            access_token: slot.as_ref().map(|t| t.0.clone()),
        };
        let bytes =
            serde_json::to_vec(&record).map_err(|e| StoreError::Store(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Store(e.to_string()))?;
        }
        fs::write(&self.path, bytes)
            .await
            .map_err(|e| StoreError::Store(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<AccessToken>, StoreError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await?);
        }
        Ok(cache.clone().flatten())
    }

    async fn set(&self, token: AccessToken) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().await;
        let slot = Some(token);
        self.persist(&slot).await?;
        *cache = Some(slot);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().await;
        self.persist(&None).await?;
        *cache = Some(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir()
            .join("turnstile-tests")
            .join(format!("{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn a_fresh_slot_is_empty() {
        let store = FileTokenStore::new(scratch_path());
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn the_slot_survives_a_reopen() {
        let path = scratch_path();

        let store = FileTokenStore::new(&path);
        store.set(AccessToken("persisted".into())).await.unwrap();
        drop(store);

        let reopened = FileTokenStore::new(&path);
        assert_eq!(
            reopened.get().await.unwrap(),
            Some(AccessToken("persisted".into()))
        );

        reopened.clear().await.unwrap();
        drop(reopened);

        let cleared = FileTokenStore::new(&path);
        assert_eq!(cleared.get().await.unwrap(), None);

        let _ = fs::remove_file(&path).await;
    }
}
