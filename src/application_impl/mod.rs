mod api_client_fake;
mod api_client_impl;
mod login_boundary_tracing;
mod refresh_coordinator;
mod retry_queue;
mod session_terminator;

pub use api_client_fake::*;
pub use api_client_impl::*;
pub use login_boundary_tracing::*;
pub use refresh_coordinator::*;
pub use retry_queue::*;
pub use session_terminator::*;
