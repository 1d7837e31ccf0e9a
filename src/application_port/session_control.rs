#[async_trait::async_trait]
pub trait SessionControl: Send + Sync {
    /// Explicit logout. Followers waiting on an in-flight refresh are
    /// settled as invalid rather than left hanging, the token slot is
    /// cleared, and the login boundary is signalled.
    async fn logout(&self);
}
