mod reqwest_refresh_gateway;
mod reqwest_transport;

pub use reqwest_refresh_gateway::*;
pub use reqwest_transport::*;
