use crate::domain_model::AccessToken;

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// The endpoint answered with an error status: the refresh credential
    /// itself is dead.
    #[error("refresh rejected with status {0}")]
    Rejected(u16),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed refresh response: {0}")]
    Malformed(String),
}

/// The backend's token-reissue endpoint, treated as a black box. The call
/// carries only ambient credentials (a cookie on the shared HTTP client),
/// no parameters. Any error settles the whole waiting cohort as invalid.
#[async_trait::async_trait]
pub trait RefreshGateway: Send + Sync {
    async fn refresh(&self) -> Result<AccessToken, RefreshError>;
}
