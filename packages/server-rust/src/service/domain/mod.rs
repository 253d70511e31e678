//! Operations bound to each route, grouped by collaborator.
//!
//! Every function here has the shape `(state, ctx[, input]) -> Result<_, ServiceError>`
//! and is registered through [`JsonHandler`](crate::service::handler::JsonHandler).
//! Most are a single collaborator call; the few that carry logic of their
//! own say so in their docs.

pub mod accounts;
pub mod assets;
pub mod backup;
pub mod blocks;
pub mod feeds;
pub mod keys;
pub mod node;
pub mod tokens;
pub mod transactions;
pub mod wallet;

use std::sync::Arc;

use noderpc_core::{
    AccessTokenStore, ChainView, KeyBackup, KeyStore, Miner, NodeView, TxFeedStore, TxPipeline,
};

/// Collaborators that back the routes registered on every node.
#[derive(Clone)]
pub struct NodeServices {
    pub keys: Arc<dyn KeyStore>,
    pub backup: Arc<dyn KeyBackup>,
    pub transactions: Arc<dyn TxPipeline>,
    pub feeds: Arc<dyn TxFeedStore>,
    pub chain: Arc<dyn ChainView>,
    pub node: Arc<dyn NodeView>,
    pub miner: Arc<dyn Miner>,
    pub tokens: Arc<dyn AccessTokenStore>,
}

impl std::fmt::Debug for NodeServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeServices").finish_non_exhaustive()
    }
}
