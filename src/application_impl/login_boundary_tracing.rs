use crate::domain_port::LoginBoundary;
use tracing::info;

/// Boundary for headless callers: records the redirect instead of
/// navigating. Frontends supply their own implementation.
#[derive(Debug)]
pub struct TracingLoginBoundary;

#[async_trait::async_trait]
impl LoginBoundary for TracingLoginBoundary {
    async fn redirect_to_login(&self) {
        info!("session terminated, redirecting to login");
    }
}
