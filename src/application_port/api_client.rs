use crate::domain_model::{ApiRequest, ApiResponse};
use crate::domain_port::{StoreError, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure; no response was received. Not retried.
    #[error("network error: {0}")]
    Network(String),
    /// 401 persisted after a successful refresh and one replay. Terminal.
    #[error("authentication rejected")]
    Auth,
    /// Refresh failed, or the session was torn down while this request
    /// waited on it. The caller is being redirected to login.
    #[error("session invalid")]
    SessionInvalid,
    /// Non-401 error status, passed through untouched.
    #[error("server returned {status}")]
    Server { status: u16, body: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        match error {
            TransportError::Network(message) => ApiError::Network(message),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Internal(error.to_string())
    }
}

/// Caller-facing seam: CRUD screens, the CV builder, and the chat widget
/// all talk to the backend through this trait and never see the token.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    /// Send one authenticated request. At most one refresh round-trip and
    /// one replay happen internally; everything else surfaces as an error.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}
