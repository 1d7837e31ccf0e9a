use crate::domain_port::{LoginBoundary, TokenStore};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Tears the session down: clears the token slot and signals the login
/// boundary. One-shot per session; when several followers fail together
/// the clear and the redirect still happen exactly once. A new session
/// (after re-login) gets a freshly constructed terminator.
pub struct SessionTerminator {
    token_store: Arc<dyn TokenStore>,
    login_boundary: Arc<dyn LoginBoundary>,
    fired: AtomicBool,
}

impl SessionTerminator {
    pub fn new(token_store: Arc<dyn TokenStore>, login_boundary: Arc<dyn LoginBoundary>) -> Self {
        Self {
            token_store,
            login_boundary,
            fired: AtomicBool::new(false),
        }
    }

    pub async fn terminate(&self) {
        if self.fired.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = self.token_store.clear().await {
            warn!("failed to clear token slot during termination: {e}");
        }
        self.login_boundary.redirect_to_login().await;
    }

    pub fn terminated(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}
