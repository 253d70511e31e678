//! Networking: configuration, transport middleware, and the server lifecycle.

pub mod config;
pub mod middleware;
pub mod module;

pub use config::*;
pub use middleware::build_http_layers;
pub use module::GatewayModule;
