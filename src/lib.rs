pub mod logger;
pub mod settings;

pub mod application_port;
pub mod application_impl;
pub mod domain_model;
pub mod domain_port;
pub mod infra_http;
pub mod infra_store;
