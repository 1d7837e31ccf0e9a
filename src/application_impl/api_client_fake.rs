use crate::application_port::*;
use crate::domain_model::*;

#[derive(Debug)]
pub struct FakeApiClient;

impl FakeApiClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FakeApiClient {
    fn default() -> Self {
        Self::new()
    }
}

// Minimal fake implementation for basic use only.
// Extend to simulate auth failures and configurable responses when needed.
#[async_trait::async_trait]
impl ApiClient for FakeApiClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        Ok(ApiResponse {
            status: 200,
            body: serde_json::json!({
                "method": request.method.as_str(),
                "path": request.path,
            })
            .to_string(),
        })
    }
}

#[async_trait::async_trait]
impl SessionControl for FakeApiClient {
    async fn logout(&self) {}
}
