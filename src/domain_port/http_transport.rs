use crate::domain_model::{AccessToken, ApiRequest, ApiResponse};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response was received at all. Surfaced to the caller as-is;
    /// transport failures never enter the refresh path.
    #[error("network error: {0}")]
    Network(String),
}

/// Raw request execution. Deciding which credential to attach is the
/// dispatcher's job; the transport only carries it.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse, TransportError>;
}
