use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args};

use super::middleware::body_limit::DEFAULT_MAX_BODY_BYTES;
use crate::network::config::{NetworkConfig, DEFAULT_PORT};

/// Gateway-level configuration: everything between the transport and the
/// route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
    pub static_assets: StaticAssetsConfig,
    pub auth: AuthConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            static_assets: StaticAssetsConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Authentication settings with the static asset prefix always public,
    /// whatever `auth.public_prefixes` lists.
    #[must_use]
    pub fn auth_settings(&self) -> AuthConfig {
        let mut auth = self.auth.clone();
        let prefix = self.static_assets.prefix.trim_end_matches('/');
        let listed = auth
            .public_prefixes
            .iter()
            .any(|p| p.trim_end_matches('/') == prefix);
        if !prefix.is_empty() && !listed {
            auth.public_prefixes.push(prefix.to_string());
        }
        auth
    }
}

/// Where the dashboard bundle is mounted and read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAssetsConfig {
    /// URL prefix, e.g. `/dashboard`.
    pub prefix: String,
    /// Directory holding the asset tree.
    pub root: PathBuf,
    /// Document served for missing files under the prefix, relative to `root`.
    pub index: String,
}

impl Default for StaticAssetsConfig {
    fn default() -> Self {
        Self {
            prefix: "/dashboard".to_string(),
            root: PathBuf::from("dashboard"),
            index: "index.html".to_string(),
        }
    }
}

/// Authentication middleware settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// When `false` no authentication layer is installed at all.
    pub enabled: bool,
    /// Path prefixes served without a credential. The static asset prefix is
    /// added by [`GatewayConfig::auth_settings`].
    pub public_prefixes: Vec<String>,
    /// Admit loopback peers without a credential, as principal `localhost`.
    pub trust_loopback: bool,
    /// Time a successful credential resolution is reused. `None` disables caching.
    pub cache_ttl: Option<Duration>,
    /// Upper bound on cached credentials.
    pub cache_capacity: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            public_prefixes: vec!["/dashboard".to_string()],
            trust_loopback: false,
            cache_ttl: None,
            cache_capacity: 1024,
        }
    }
}

// ---------------------------------------------------------------------------
// Command-line arguments
// ---------------------------------------------------------------------------

/// RPC server flags for an embedding node binary to flatten into its CLI.
#[derive(Debug, Clone, Args)]
pub struct GatewayArgs {
    /// Address the RPC server binds to
    #[arg(long = "rpc-host", env = "NODERPC_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port the RPC server listens on (0 picks a free port)
    #[arg(long = "rpc-port", env = "NODERPC_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds before an unfinished request is answered with 408
    #[arg(long = "rpc-request-timeout-secs", env = "NODERPC_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Largest accepted request body in bytes
    #[arg(long = "rpc-max-body-bytes", env = "NODERPC_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// URL prefix the dashboard is served under
    #[arg(long = "dashboard-prefix", env = "NODERPC_DASHBOARD_PREFIX", default_value = "/dashboard")]
    pub dashboard_prefix: String,

    /// Directory holding the dashboard asset tree
    #[arg(long = "dashboard-root", env = "NODERPC_DASHBOARD_ROOT", value_name = "PATH", default_value = "dashboard")]
    pub dashboard_root: PathBuf,

    /// Disable access-token authentication on the RPC surface
    #[arg(long = "auth-disable", env = "NODERPC_AUTH_DISABLE", action = ArgAction::SetTrue)]
    pub auth_disable: bool,

    /// Admit requests from loopback peers without a credential
    #[arg(long = "auth-trust-loopback", env = "NODERPC_AUTH_TRUST_LOOPBACK", action = ArgAction::SetTrue)]
    pub auth_trust_loopback: bool,

    /// Seconds a verified credential is cached (0 disables the cache)
    #[arg(long = "auth-cache-ttl-secs", env = "NODERPC_AUTH_CACHE_TTL_SECS", default_value_t = 0)]
    pub auth_cache_ttl_secs: u64,
}

impl GatewayArgs {
    /// Splits the flags into transport and gateway configuration.
    #[must_use]
    pub fn into_configs(self) -> (NetworkConfig, GatewayConfig) {
        let network = NetworkConfig {
            host: self.host,
            port: self.port,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        };

        let defaults = GatewayConfig::default();
        let gateway = GatewayConfig {
            max_body_bytes: self.max_body_bytes,
            static_assets: StaticAssetsConfig {
                prefix: self.dashboard_prefix.clone(),
                root: self.dashboard_root,
                index: defaults.static_assets.index,
            },
            auth: AuthConfig {
                enabled: !self.auth_disable,
                public_prefixes: vec![self.dashboard_prefix],
                trust_loopback: self.auth_trust_loopback,
                cache_ttl: (self.auth_cache_ttl_secs > 0)
                    .then(|| Duration::from_secs(self.auth_cache_ttl_secs)),
                cache_capacity: defaults.auth.cache_capacity,
            },
        };

        (network, gateway)
    }
}
