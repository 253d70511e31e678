//! Wallet history and transaction pipeline payloads.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wallet history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTransactionRequest {
    pub tx_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTransactionsRequest {
    /// Empty lists every transaction known to the wallet.
    #[serde(default)]
    pub id: String,
    /// Empty keeps transactions of every account.
    #[serde(default)]
    pub account_id: String,
    /// `false` strips addresses and control programs from the response.
    #[serde(default)]
    pub detail: bool,
}

/// One input or output of an annotated transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub asset_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_alias: Option<String>,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_program: Option<String>,
}

impl AnnotatedEntry {
    /// Returns `true` if this entry spends from or pays to the given account.
    #[must_use]
    pub fn touches_account(&self, account_id: &str) -> bool {
        self.account_id.as_deref() == Some(account_id)
    }
}

/// Wallet view of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedTx {
    pub tx_id: String,
    pub block_time: u64,
    pub block_hash: String,
    pub block_height: u64,
    pub position: u32,
    pub status_fail: bool,
    pub inputs: Vec<AnnotatedEntry>,
    pub outputs: Vec<AnnotatedEntry>,
}

/// Condensed transaction returned by `list-transactions` without `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxSummary {
    pub tx_id: String,
    pub block_time: u64,
    pub inputs: Vec<AnnotatedEntry>,
    pub outputs: Vec<AnnotatedEntry>,
}

impl From<AnnotatedTx> for TxSummary {
    fn from(tx: AnnotatedTx) -> Self {
        let strip = |mut entry: AnnotatedEntry| {
            entry.address = None;
            entry.control_program = None;
            entry
        };
        Self {
            tx_id: tx.tx_id,
            block_time: tx.block_time,
            inputs: tx.inputs.into_iter().map(strip).collect(),
            outputs: tx.outputs.into_iter().map(strip).collect(),
        }
    }
}

/// Response of `list-transactions`: full or condensed depending on `detail`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TransactionList {
    Detailed(Vec<AnnotatedTx>),
    Summary(Vec<TxSummary>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub id: String,
    pub account_id: String,
    #[serde(default)]
    pub account_alias: String,
    pub asset_id: String,
    #[serde(default)]
    pub asset_alias: String,
    pub amount: u64,
    pub address: String,
    pub control_program: String,
    pub source_id: String,
    pub source_pos: u64,
    pub change: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUnspentOutputsRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub account_id: String,
    pub account_alias: String,
    pub asset_id: String,
    pub asset_alias: String,
    pub amount: u64,
}

// ---------------------------------------------------------------------------
// Transaction pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRequest {
    #[serde(default)]
    pub base_transaction: Option<String>,
    pub actions: Vec<serde_json::Map<String, serde_json::Value>>,
    /// Template time-to-live in milliseconds.
    #[serde(default)]
    pub ttl: Option<u64>,
    #[serde(default)]
    pub time_range: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigningInstruction {
    pub position: u32,
    pub witness_components: Vec<serde_json::Value>,
}

/// Unsigned or partially signed transaction plus the instructions to finish it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub raw_transaction: String,
    pub signing_instructions: Vec<SigningInstruction>,
    #[serde(default)]
    pub allow_additional_actions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignRequest {
    pub password: String,
    pub transaction: Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignResponse {
    pub transaction: Template,
    pub sign_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub raw_transaction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub tx_id: String,
}
