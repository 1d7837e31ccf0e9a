// store

mod token_store;

pub use token_store::*;

// collaborators

mod http_transport;
mod login_boundary;
mod refresh_gateway;

pub use http_transport::*;
pub use login_boundary::*;
pub use refresh_gateway::*;
