use crate::application_impl::RefreshCoordinator;
use crate::application_port::{ApiClient, ApiError, SessionControl};
use crate::domain_model::{ApiRequest, ApiResponse, RefreshOutcome};
use crate::domain_port::{HttpTransport, TokenStore};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const STATUS_UNAUTHORIZED: u16 = 401;

/// The real dispatcher: reads the current token, attaches it, sends, and
/// inspects the response. A first 401 is handed to the coordinator; its
/// settlement decides between one replay with the refreshed token and a
/// terminal rejection. Non-auth responses pass through untouched.
pub struct HttpApiClient {
    transport: Arc<dyn HttpTransport>,
    token_store: Arc<dyn TokenStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl HttpApiClient {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        token_store: Arc<dyn TokenStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            transport,
            token_store,
            coordinator,
        }
    }

    // Only 4xx/5xx read as failures at the call site; informational and
    // redirect classes pass through as responses (a 304 on a conditional
    // GET is an answer, not an error).
    fn settle(response: ApiResponse) -> Result<ApiResponse, ApiError> {
        if response.status < 400 {
            Ok(response)
        } else {
            Err(ApiError::Server {
                status: response.status,
                body: response.body,
            })
        }
    }
}

#[async_trait::async_trait]
impl ApiClient for HttpApiClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request_id = Uuid::new_v4();

        // Absence of a token is not an error here: the request goes out
        // unauthenticated and the server decides.
        let token = self.token_store.get().await?;
        let response = self.transport.execute(&request, token.as_ref()).await?;
        if response.status != STATUS_UNAUTHORIZED {
            return Self::settle(response);
        }

        debug!(%request_id, path = %request.path, "credential rejected, deferring to refresh");
        match self.coordinator.coordinate().await {
            RefreshOutcome::Retry(token) => {
                let replay = self.transport.execute(&request, Some(&token)).await?;
                if replay.status == STATUS_UNAUTHORIZED {
                    // One replay only; a second rejection is terminal.
                    return Err(ApiError::Auth);
                }
                debug!(%request_id, "replayed with refreshed token");
                Self::settle(replay)
            }
            RefreshOutcome::Invalid => Err(ApiError::SessionInvalid),
        }
    }
}

#[async_trait::async_trait]
impl SessionControl for HttpApiClient {
    async fn logout(&self) {
        self.coordinator.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application_impl::SessionTerminator;
    use crate::domain_model::AccessToken;
    use crate::domain_port::{LoginBoundary, RefreshError, RefreshGateway, TransportError};
    use crate::infra_store::MemoryTokenStore;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Transport fed from a script of canned results; records the token
    /// attached to each attempt.
    struct ScriptedTransport {
        script: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
        seen_tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedTransport {
        fn new(script: Vec<Result<ApiResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                seen_tokens: Mutex::new(Vec::new()),
            })
        }

        fn attempts(&self) -> usize {
            self.seen_tokens.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(
            &self,
            _request: &ApiRequest,
            token: Option<&AccessToken>,
        ) -> Result<ApiResponse, TransportError> {
            self.seen_tokens
                .lock()
                .unwrap()
                .push(token.map(|t| t.0.clone()));
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport script exhausted")
        }
    }

    struct ScriptedGateway {
        calls: AtomicUsize,
        issue: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl RefreshGateway for ScriptedGateway {
        async fn refresh(&self) -> Result<AccessToken, RefreshError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.issue {
                Some(token) => Ok(AccessToken(token.into())),
                None => Err(RefreshError::Rejected(403)),
            }
        }
    }

    struct CountingBoundary {
        redirects: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl LoginBoundary for CountingBoundary {
        async fn redirect_to_login(&self) {
            self.redirects.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn ok(status: u16) -> Result<ApiResponse, TransportError> {
        Ok(ApiResponse {
            status,
            body: String::new(),
        })
    }

    fn client(
        transport: Arc<ScriptedTransport>,
        issue: Option<&'static str>,
    ) -> (HttpApiClient, Arc<ScriptedGateway>, Arc<CountingBoundary>) {
        let store = Arc::new(MemoryTokenStore::with_token(AccessToken("stale".into())));
        let gateway = Arc::new(ScriptedGateway {
            calls: AtomicUsize::new(0),
            issue,
        });
        let boundary = Arc::new(CountingBoundary {
            redirects: AtomicUsize::new(0),
        });
        let terminator = Arc::new(SessionTerminator::new(store.clone(), boundary.clone()));
        let coordinator = Arc::new(RefreshCoordinator::new(
            gateway.clone(),
            store.clone(),
            terminator,
        ));
        (
            HttpApiClient::new(transport, store, coordinator),
            gateway,
            boundary,
        )
    }

    #[tokio::test]
    async fn attaches_the_current_token_and_passes_success_through() {
        let transport = ScriptedTransport::new(vec![ok(200)]);
        let (client, gateway, _) = client(transport.clone(), Some("fresh"));

        let response = client.send(ApiRequest::get("/jobs")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            *transport.seen_tokens.lock().unwrap(),
            vec![Some("stale".to_string())]
        );
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_auth_errors_bypass_the_refresh_machinery() {
        let transport = ScriptedTransport::new(vec![ok(503)]);
        let (client, gateway, _) = client(transport.clone(), Some("fresh"));

        let error = client.send(ApiRequest::get("/jobs")).await.unwrap_err();
        assert!(matches!(error, ApiError::Server { status: 503, .. }));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn redirect_class_statuses_pass_through_as_responses() {
        let transport = ScriptedTransport::new(vec![ok(304)]);
        let (client, gateway, _) = client(transport.clone(), Some("fresh"));

        let response = client.send(ApiRequest::get("/jobs")).await.unwrap();
        assert_eq!(response.status, 304);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn transport_failures_surface_immediately() {
        let transport =
            ScriptedTransport::new(vec![Err(TransportError::Network("refused".into()))]);
        let (client, gateway, _) = client(transport.clone(), Some("fresh"));

        let error = client.send(ApiRequest::get("/jobs")).await.unwrap_err();
        assert!(matches!(error, ApiError::Network(_)));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn a_rejected_credential_is_refreshed_and_replayed_once() {
        let transport = ScriptedTransport::new(vec![ok(401), ok(200)]);
        let (client, gateway, _) = client(transport.clone(), Some("fresh"));

        let response = client.send(ApiRequest::get("/jobs")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *transport.seen_tokens.lock().unwrap(),
            vec![Some("stale".to_string()), Some("fresh".to_string())]
        );
    }

    #[tokio::test]
    async fn a_second_rejection_is_terminal_after_two_attempts() {
        let transport = ScriptedTransport::new(vec![ok(401), ok(401)]);
        let (client, gateway, _) = client(transport.clone(), Some("fresh"));

        let error = client.send(ApiRequest::get("/jobs")).await.unwrap_err();
        assert!(matches!(error, ApiError::Auth));
        // Original attempt plus exactly one replay, and no second refresh.
        assert_eq!(transport.attempts(), 2);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_failed_refresh_rejects_the_caller_and_redirects() {
        let transport = ScriptedTransport::new(vec![ok(401)]);
        let (client, _, boundary) = client(transport.clone(), None);

        let error = client.send(ApiRequest::get("/jobs")).await.unwrap_err();
        assert!(matches!(error, ApiError::SessionInvalid));
        assert_eq!(transport.attempts(), 1);
        assert_eq!(boundary.redirects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_missing_token_still_sends_unauthenticated() {
        let transport = ScriptedTransport::new(vec![ok(200)]);
        let store = Arc::new(MemoryTokenStore::new());
        let gateway = Arc::new(ScriptedGateway {
            calls: AtomicUsize::new(0),
            issue: None,
        });
        let boundary = Arc::new(CountingBoundary {
            redirects: AtomicUsize::new(0),
        });
        let terminator = Arc::new(SessionTerminator::new(store.clone(), boundary));
        let coordinator = Arc::new(RefreshCoordinator::new(gateway, store.clone(), terminator));
        let client = HttpApiClient::new(transport.clone(), store, coordinator);

        client.send(ApiRequest::get("/public")).await.unwrap();
        assert_eq!(*transport.seen_tokens.lock().unwrap(), vec![None]);
    }
}
