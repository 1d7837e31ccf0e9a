use crate::domain_model::AccessToken;
use crate::domain_port::{RefreshError, RefreshGateway};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
}

/// POSTs to the refresh endpoint with an empty body; the refresh
/// credential is ambient (a cookie on the shared client), never a
/// parameter.
pub struct ReqwestRefreshGateway {
    client: Client,
    refresh_url: String,
}

impl ReqwestRefreshGateway {
    pub fn new(client: Client, base_url: &str, refresh_path: &str) -> Self {
        Self {
            client,
            refresh_url: format!("{}{}", base_url.trim_end_matches('/'), refresh_path),
        }
    }
}

#[async_trait::async_trait]
impl RefreshGateway for ReqwestRefreshGateway {
    async fn refresh(&self) -> Result<AccessToken, RefreshError> {
        let response = self
            .client
            .post(&self.refresh_url)
            .send()
            .await
            .map_err(|e| RefreshError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RefreshError::Rejected(response.status().as_u16()));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| RefreshError::Malformed(e.to_string()))?;
        Ok(AccessToken(body.access_token))
    }
}
