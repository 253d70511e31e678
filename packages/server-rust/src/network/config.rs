//! Network configuration types for the RPC server.

use std::time::Duration;

/// Default listen port of the node's RPC surface.
pub const DEFAULT_PORT: u16 = 9888;

/// Top-level network configuration for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Maximum time to wait for a request to complete. Exceeding it answers `408`.
    pub request_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            request_timeout: Duration::from_secs(30),
        }
    }
}
