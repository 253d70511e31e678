//! Pipeline composition: assembles the gateway's request chain.

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use super::auth::{AuthLayer, Authenticator};
use super::body_limit::BodyLimitLayer;
use super::latency::{LatencyLayer, LatencySink};
use super::static_assets::with_static_assets;
use crate::service::config::GatewayConfig;
use crate::service::error::BuildError;
use crate::service::router::{RouteDispatch, RouteTable};

/// Wraps the route table with the gateway middleware.
///
/// Layer order (outermost to innermost):
/// 1. `AuthLayer` -- only when an authenticator is supplied; public prefixes pass
/// 2. static assets -- serves the dashboard prefix, forwards everything else
/// 3. `BodyLimitLayer` -- rejects oversized bodies before any operation runs
/// 4. `LatencyLayer` -- times registered routes, never the catch-all
/// 5. `RouteDispatch` -- resolves the path and runs the operation
///
/// # Errors
///
/// Returns [`BuildError`] if the static asset prefix is invalid.
pub fn build_gateway_router(
    table: Arc<RouteTable>,
    config: &GatewayConfig,
    sink: Arc<dyn LatencySink>,
    auth: Option<Arc<Authenticator>>,
) -> Result<Router, BuildError> {
    let api = ServiceBuilder::new()
        .layer(BodyLimitLayer::new(config.max_body_bytes))
        .layer(LatencyLayer::new(Arc::clone(&table), sink))
        .service(RouteDispatch::new(table));

    let router = with_static_assets(api, &config.static_assets)?;
    Ok(match auth {
        Some(auth) => router.layer(AuthLayer::new(auth)),
        None => router,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
