//! Tower middleware layers for the gateway chain.
//!
//! - [`auth`]: Credential checks and principal resolution
//! - [`body_limit`]: Request body ceiling
//! - [`latency`]: Per-route latency samples
//! - [`static_assets`]: Dashboard asset fallback
//! - [`pipeline`]: Composes all layers into a single router

pub mod auth;
pub mod body_limit;
pub mod latency;
pub mod pipeline;
pub mod static_assets;

pub use auth::{AuthLayer, Authenticator};
pub use body_limit::BodyLimitLayer;
pub use latency::{LatencyLayer, LatencySink, MetricsLatencySink};
pub use pipeline::build_gateway_router;
pub use static_assets::with_static_assets;
