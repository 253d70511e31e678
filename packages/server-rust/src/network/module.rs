//! Gateway module with deferred startup lifecycle.
//!
//! Implements the deferred startup pattern: `new()` assembles the route
//! table and middleware chain, `start()` binds the TCP listener, and
//! `serve()` starts accepting connections. The embedding node can read the
//! bound port between `start()` and `serve()`.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use noderpc_core::CredentialStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::middleware::build_http_layers;
use crate::service::capability::WalletCapability;
use crate::service::config::GatewayConfig;
use crate::service::domain::NodeServices;
use crate::service::error::BuildError;
use crate::service::middleware::auth::Authenticator;
use crate::service::middleware::latency::LatencySink;
use crate::service::middleware::pipeline::build_gateway_router;
use crate::service::routes::build_route_table;

/// Owns the assembled RPC router and its listener.
///
/// Follows the deferred startup pattern:
/// 1. `new()` -- builds the route table and the gateway chain
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the shutdown future resolves
pub struct GatewayModule {
    config: NetworkConfig,
    router: Router,
    listener: Option<TcpListener>,
}

impl GatewayModule {
    /// Assembles the gateway without binding any port.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the route table or static asset mount is
    /// invalid, or if authentication is enabled without a credential store.
    pub fn new(
        config: NetworkConfig,
        gateway: &GatewayConfig,
        services: &NodeServices,
        wallet: &WalletCapability,
        sink: Arc<dyn LatencySink>,
        credentials: Option<Arc<dyn CredentialStore>>,
    ) -> Result<Self, BuildError> {
        let table = build_route_table(services, wallet)?;
        let routes = table.len();

        let auth = if gateway.auth.enabled {
            let store = credentials.ok_or(BuildError::MissingCredentialStore)?;
            Some(Arc::new(Authenticator::new(store, &gateway.auth_settings())))
        } else {
            warn!("authentication disabled, every caller is anonymous");
            None
        };

        let router = build_gateway_router(Arc::new(table), gateway, sink, auth)?;
        info!(
            routes,
            wallet = wallet.is_available(),
            auth = gateway.auth.enabled,
            "gateway assembled"
        );

        Ok(Self {
            config,
            router,
            listener: None,
        })
    }

    /// The gateway chain without transport layers.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let port = listener.local_addr()?.port();

        info!("RPC listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until `shutdown` resolves, then lets in-flight
    /// requests finish.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server
    /// hits a fatal I/O error.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .context("start() must be called before serve()")?;
        let router = self.router.layer(build_http_layers(&self.config));

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .context("RPC server failed")?;

        info!("RPC server stopped");
        Ok(())
    }
}
