use crate::domain_model::{AccessToken, ApiRequest, ApiResponse, HttpMethod};
use crate::domain_port::{HttpTransport, TransportError};
use reqwest::{Client, Method, header};
use std::time::Duration;

/// Build the one client shared by the transport and the refresh gateway,
/// with a cookie store so the refresh endpoint's ambient credential rides
/// on both.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).cookie_store(true).build()
}

pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Patch => Method::PATCH,
        }
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &ApiRequest,
        token: Option<&AccessToken>,
    ) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(Self::method(request.method), self.url(&request.path));
        if let Some(token) = token {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.as_str()),
            );
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}
