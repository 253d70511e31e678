//! Key lifecycle and key export/import payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateKeyRequest {
    pub alias: String,
    pub password: String,
}

/// Extended public key held by the key store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XPub {
    pub alias: String,
    pub xpub: String,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteKeyRequest {
    pub xpub: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetKeyPasswordRequest {
    pub xpub: String,
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportKeyRequest {
    pub xpub: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedKey {
    pub private_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportKeyRequest {
    pub alias: String,
    pub private_key: String,
    pub password: String,
    /// Next derivation index for the account created alongside the key.
    #[serde(default)]
    pub index: u64,
    pub account_alias: String,
}

/// Progress of the wallet rescan triggered by a key import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    pub done: bool,
    pub scanned_height: u64,
    pub best_height: u64,
}
