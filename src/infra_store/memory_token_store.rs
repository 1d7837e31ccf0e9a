use crate::domain_model::AccessToken;
use crate::domain_port::{StoreError, TokenStore};
use std::sync::{Mutex, MutexGuard};

/// Process-local token slot. Used by tests and by callers that do not
/// need the credential to survive a restart.
pub struct MemoryTokenStore {
    slot: Mutex<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn with_token(token: AccessToken) -> Self {
        Self {
            slot: Mutex::new(Some(token)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<AccessToken>> {
        self.slot.lock().expect("token slot lock poisoned")
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<AccessToken>, StoreError> {
        Ok(self.lock().clone())
    }

    async fn set(&self, token: AccessToken) -> Result<(), StoreError> {
        *self.lock() = Some(token);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_clear_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().await.unwrap(), None);

        store.set(AccessToken("t1".into())).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(AccessToken("t1".into())));

        // Last writer wins on the single slot.
        store.set(AccessToken("t2".into())).await.unwrap();
        assert_eq!(store.get().await.unwrap(), Some(AccessToken("t2".into())));

        store.clear().await.unwrap();
        assert_eq!(store.get().await.unwrap(), None);
    }
}
