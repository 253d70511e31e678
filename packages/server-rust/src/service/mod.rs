//! Route assembly and request execution.
//!
//! A request travels through these pieces in order:
//!
//! 1. **Middleware** (`middleware`): authentication, static assets, body limit, latency
//! 2. **Routing** (`router`): path lookup in the frozen [`RouteTable`], with a not-found catch-all
//! 3. **Adapter** (`handler`): JSON decode, operation call, JSON encode
//! 4. **Operations** (`domain`): thin calls into node collaborators
//!
//! [`routes`] holds the catalog and the wallet capability gate decides which
//! part of it is registered.

pub mod capability;
pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod operation;
pub mod router;
pub mod routes;

// Re-export key types for convenient access.
pub use capability::{WalletCapability, WalletHandles};
pub use config::{AuthConfig, GatewayArgs, GatewayConfig, StaticAssetsConfig};
pub use domain::NodeServices;
pub use error::{ApiError, BuildError, ErrorBody, ErrorKind};
pub use handler::{JsonHandler, Shape};
pub use operation::OperationContext;
pub use router::{RouteDispatch, RouteTable, RouteTableBuilder};
pub use routes::{build_route_table, WALLET_ROUTES};
