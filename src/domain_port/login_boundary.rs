/// Application boundary notified exactly once when the session dies. The
/// concrete navigation mechanism lives with the caller.
#[async_trait::async_trait]
pub trait LoginBoundary: Send + Sync {
    async fn redirect_to_login(&self);
}
