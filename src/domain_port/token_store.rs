use crate::domain_model::AccessToken;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Store(String),
}

/// Single scalar slot holding the current access token. Last-writer-wins
/// is acceptable: the only writers are the refresh coordinator (on
/// success) and the session terminator (on clear); dispatchers only read.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<AccessToken>, StoreError>;
    async fn set(&self, token: AccessToken) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}
