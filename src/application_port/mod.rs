mod api_client;
mod session_control;

pub use api_client::*;
pub use session_control::*;
