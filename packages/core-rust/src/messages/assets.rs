//! Asset lifecycle payloads.

use serde::{Deserialize, Serialize};

use crate::types::Tags;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAssetRequest {
    pub alias: String,
    pub root_xpubs: Vec<String>,
    pub quorum: u32,
    #[serde(default)]
    pub definition: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub alias: String,
    pub issuance_program: String,
    pub key_index: u64,
    pub quorum: u32,
    pub xpubs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAssetAliasRequest {
    pub id: String,
    pub alias: String,
}

/// `asset_info` accepts either an asset id or an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAssetTagsRequest {
    pub asset_info: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAssetsRequest {
    #[serde(default)]
    pub id: String,
}
