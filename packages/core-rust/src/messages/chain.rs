//! Node, network, mining and block introspection payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub version: String,
    pub build_commit: String,
    pub network_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetInfo {
    pub listening: bool,
    pub syncing: bool,
    pub mining: bool,
    pub peer_count: usize,
    pub current_block: u64,
    pub highest_block: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningStatus {
    pub is_mining: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasRate {
    pub gas_rate: i64,
}

/// Proof-of-work job handed to external miners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub block_header: String,
    pub seed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitWorkRequest {
    pub block_header: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHash {
    pub block_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHashRequest {
    pub block_hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeightRequest {
    pub block_height: u64,
}

/// Selects a block by hash when `block_hash` is non-empty, otherwise by height.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlockRequest {
    #[serde(default)]
    pub block_hash: String,
    #[serde(default)]
    pub block_height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderInfo {
    pub block_header: String,
    pub reward: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTx {
    pub id: String,
    pub version: u64,
    pub size: u64,
    pub time_range: u64,
    pub status_fail: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    pub size: u64,
    pub version: u64,
    pub height: u64,
    pub previous_block_hash: String,
    pub timestamp: u64,
    pub nonce: u64,
    pub bits: u64,
    pub difficulty: String,
    pub transaction_merkle_root: String,
    pub transactions: Vec<BlockTx>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCount {
    pub block_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxCount {
    pub count: usize,
}
