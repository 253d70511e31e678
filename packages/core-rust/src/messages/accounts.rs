//! Account lifecycle payloads.

use serde::{Deserialize, Serialize};

use crate::types::Tags;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub root_xpubs: Vec<String>,
    pub quorum: u32,
    pub alias: String,
    #[serde(default)]
    pub tags: Option<Tags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub alias: String,
    pub xpubs: Vec<String>,
    pub quorum: u32,
    pub key_index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
}

/// `account_info` accepts either an account id or an alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAccountTagsRequest {
    pub account_info: String,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateReceiverRequest {
    pub account_info: String,
    /// Expiry as Unix seconds; `None` means the receiver never expires.
    #[serde(default)]
    pub expires_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receiver {
    pub control_program: String,
    pub address: String,
    #[serde(default)]
    pub expires_at: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAccountsRequest {
    /// Empty selects every account.
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListAddressesRequest {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub account_alias: String,
}

/// A control program owned by an account, as tracked by the account registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlProgram {
    pub account_id: String,
    pub address: String,
    pub control_program: String,
    pub change: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub account_alias: String,
    pub account_id: String,
    pub address: String,
    pub change: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAccountRequest {
    pub account_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateAddressRequest {
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressValidation {
    pub valid: bool,
    pub is_local: bool,
}
