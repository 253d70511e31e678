//! `noderpc` Server — JSON-over-HTTP RPC surface of a blockchain node.
//!
//! Assembles the node's route table, wraps it in the gateway middleware
//! (authentication, static assets, body limit, latency) and serves it
//! behind the transport layers.

pub mod network;
pub mod service;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use network::{GatewayModule, NetworkConfig};
pub use service::{GatewayArgs, GatewayConfig, NodeServices, WalletCapability};
pub use storage::MemoryTokenStore;
