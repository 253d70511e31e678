//! In-memory collaborators for unit tests.
//!
//! `FakeWallet` stands in for the wallet registries and ledger, `FakeNode`
//! for everything a node provides without a wallet. Both count trait calls
//! so tests can assert that a request never reached its operation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use noderpc_core::messages::{
    AccessToken, Account, AnnotatedEntry, AnnotatedTx, Asset, Block, BlockHeaderInfo, BlockTx,
    BuildRequest, ControlProgram, CreateAccountRequest, CreateAssetRequest, ExportedKey,
    ImportKeyRequest, ImportProgress, NetInfo, NodeInfo, Receiver, SignResponse, SigningInstruction,
    SubmitResponse, Template, TokenType, TxFeed, UnspentOutput, Work, XPub,
};
use noderpc_core::{
    AccessTokenStore, AccountManager, AssetRegistry, ChainView, CredentialError, CredentialStore,
    KeyBackup, KeyStore, Miner, NodeView, Principal, ServiceError, Tags, TxFeedStore, TxPipeline,
    WalletLedger,
};
use parking_lot::Mutex;

use crate::service::capability::WalletCapability;
use crate::service::domain::NodeServices;
use crate::service::middleware::latency::LatencySink;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn control_program(account_id: &str, address: &str, change: bool) -> ControlProgram {
    ControlProgram {
        account_id: account_id.to_string(),
        address: address.to_string(),
        control_program: format!("0014{address}"),
        change,
    }
}

/// A confirmed transaction paying one output to `account_id`.
pub fn annotated_tx(tx_id: &str, account_id: &str) -> AnnotatedTx {
    AnnotatedTx {
        tx_id: tx_id.to_string(),
        block_time: 1_700_000_000,
        block_hash: "00ff".to_string(),
        block_height: 7,
        position: 1,
        status_fail: false,
        inputs: Vec::new(),
        outputs: vec![AnnotatedEntry {
            kind: "control".to_string(),
            asset_id: "btm".to_string(),
            asset_alias: Some("BTM".to_string()),
            amount: 100,
            account_id: Some(account_id.to_string()),
            account_alias: None,
            address: Some(format!("bm1q{account_id}")),
            control_program: Some("0014".to_string()),
        }],
    }
}

pub fn unspent(account_id: &str, asset_id: &str, amount: u64) -> UnspentOutput {
    UnspentOutput {
        id: format!("utxo-{account_id}-{asset_id}-{amount}"),
        account_id: account_id.to_string(),
        account_alias: format!("alias-{account_id}"),
        asset_id: asset_id.to_string(),
        asset_alias: asset_id.to_uppercase(),
        amount,
        address: format!("bm1q{account_id}"),
        control_program: "0014".to_string(),
        source_id: "src".to_string(),
        source_pos: 0,
        change: false,
    }
}

pub fn template(raw: &str) -> Template {
    Template {
        raw_transaction: raw.to_string(),
        signing_instructions: vec![SigningInstruction {
            position: 0,
            witness_components: Vec::new(),
        }],
        allow_additional_actions: false,
    }
}

pub fn block(hash: &str, height: u64, tx_count: usize) -> Block {
    Block {
        hash: hash.to_string(),
        size: 256,
        version: 1,
        height,
        previous_block_hash: String::new(),
        timestamp: 1_700_000_000 + height,
        nonce: 0,
        bits: 0,
        difficulty: "1".to_string(),
        transaction_merkle_root: String::new(),
        transactions: (0..tx_count)
            .map(|i| BlockTx {
                id: format!("{hash}-tx{i}"),
                version: 1,
                size: 100,
                time_range: 0,
                status_fail: false,
            })
            .collect(),
    }
}

/// Services for every non-wallet route, all backed by one fake node.
pub fn node_services(node: Arc<FakeNode>) -> NodeServices {
    NodeServices {
        keys: node.clone(),
        backup: node.clone(),
        transactions: node.clone(),
        feeds: node.clone(),
        chain: node.clone(),
        node: node.clone(),
        miner: node.clone(),
        tokens: node,
    }
}

pub fn wallet_capability() -> WalletCapability {
    let wallet = Arc::new(FakeWallet::default());
    WalletCapability::enabled(wallet.clone(), wallet.clone(), wallet)
}

// ---------------------------------------------------------------------------
// FakeWallet
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeWallet {
    accounts: Vec<Account>,
    programs: Vec<ControlProgram>,
    transactions: Vec<AnnotatedTx>,
    unspent: Vec<UnspentOutput>,
    calls: AtomicUsize,
}

impl FakeWallet {
    #[must_use]
    pub fn with_account(mut self, id: &str, alias: &str) -> Self {
        self.accounts.push(Account {
            id: id.to_string(),
            alias: alias.to_string(),
            xpubs: vec![format!("xpub-{id}")],
            quorum: 1,
            key_index: 1,
            tags: None,
        });
        self
    }

    #[must_use]
    pub fn with_program(mut self, program: ControlProgram) -> Self {
        self.programs.push(program);
        self
    }

    #[must_use]
    pub fn with_transaction(mut self, tx: AnnotatedTx) -> Self {
        self.transactions.push(tx);
        self
    }

    #[must_use]
    pub fn with_unspent(mut self, output: UnspentOutput) -> Self {
        self.unspent.push(output);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn account(&self, info: &str) -> Result<&Account, ServiceError> {
        self.accounts
            .iter()
            .find(|a| a.id == info || a.alias == info)
            .ok_or_else(|| ServiceError::not_found("account", info))
    }
}

#[async_trait]
impl AccountManager for FakeWallet {
    async fn create(&self, req: CreateAccountRequest) -> Result<Account, ServiceError> {
        self.touch();
        Ok(Account {
            id: format!("acc-{}", req.alias),
            alias: req.alias,
            xpubs: req.root_xpubs,
            quorum: req.quorum,
            key_index: 1,
            tags: req.tags,
        })
    }

    async fn update_tags(&self, account_info: &str, _tags: Tags) -> Result<(), ServiceError> {
        self.touch();
        self.account(account_info).map(|_| ())
    }

    async fn create_receiver(
        &self,
        account_info: &str,
        expires_at: Option<u64>,
    ) -> Result<Receiver, ServiceError> {
        self.touch();
        let account = self.account(account_info)?;
        Ok(Receiver {
            control_program: "0014".to_string(),
            address: format!("bm1q{}", account.alias),
            expires_at,
        })
    }

    async fn list(&self, id: &str) -> Result<Vec<Account>, ServiceError> {
        self.touch();
        Ok(self
            .accounts
            .iter()
            .filter(|a| id.is_empty() || a.id == id)
            .cloned()
            .collect())
    }

    async fn find_by_alias(&self, alias: &str) -> Result<Account, ServiceError> {
        self.touch();
        self.accounts
            .iter()
            .find(|a| a.alias == alias)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("account", alias))
    }

    async fn control_programs(
        &self,
        account_id: &str,
    ) -> Result<Vec<ControlProgram>, ServiceError> {
        self.touch();
        Ok(self
            .programs
            .iter()
            .filter(|cp| cp.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, account_info: &str) -> Result<(), ServiceError> {
        self.touch();
        self.account(account_info).map(|_| ())
    }

    fn decode_address(&self, address: &str) -> Result<Vec<u8>, ServiceError> {
        if address.starts_with("bm1q") && address.len() > 4 {
            Ok(address.as_bytes().to_vec())
        } else {
            Err(ServiceError::InvalidArgument(format!("invalid address {address}")))
        }
    }

    async fn is_local_program(&self, program: &[u8]) -> Result<bool, ServiceError> {
        self.touch();
        Ok(self
            .programs
            .iter()
            .any(|cp| !cp.address.is_empty() && cp.address.as_bytes() == program))
    }
}

#[async_trait]
impl AssetRegistry for FakeWallet {
    async fn create(&self, req: CreateAssetRequest) -> Result<Asset, ServiceError> {
        self.touch();
        Ok(Asset {
            id: format!("asset-{}", req.alias),
            alias: req.alias,
            issuance_program: "ae20".to_string(),
            key_index: 1,
            quorum: req.quorum,
            xpubs: req.root_xpubs,
            definition: req.definition,
            tags: req.tags,
        })
    }

    async fn update_alias(&self, _id: &str, _alias: &str) -> Result<(), ServiceError> {
        self.touch();
        Ok(())
    }

    async fn update_tags(&self, _asset_info: &str, _tags: Tags) -> Result<(), ServiceError> {
        self.touch();
        Ok(())
    }

    async fn list(&self, _id: &str) -> Result<Vec<Asset>, ServiceError> {
        self.touch();
        Ok(Vec::new())
    }
}

#[async_trait]
impl WalletLedger for FakeWallet {
    async fn get_transaction(&self, tx_id: &str) -> Result<AnnotatedTx, ServiceError> {
        self.touch();
        self.transactions
            .iter()
            .find(|tx| tx.tx_id == tx_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("transaction", tx_id))
    }

    async fn list_transactions(&self, id: &str) -> Result<Vec<AnnotatedTx>, ServiceError> {
        self.touch();
        Ok(self
            .transactions
            .iter()
            .filter(|tx| id.is_empty() || tx.tx_id == id)
            .cloned()
            .collect())
    }

    async fn unspent_outputs(&self) -> Result<Vec<UnspentOutput>, ServiceError> {
        self.touch();
        Ok(self.unspent.clone())
    }
}

// ---------------------------------------------------------------------------
// FakeNode
// ---------------------------------------------------------------------------

pub struct FakeNode {
    blocks: Vec<Block>,
    build_delay: Option<Duration>,
    sign_complete: bool,
    last_build_ttl: Mutex<Option<Duration>>,
    submitted: Mutex<Vec<String>>,
    feeds: Mutex<HashMap<String, String>>,
    tokens: Mutex<HashMap<String, AccessToken>>,
    calls: AtomicUsize,
}

impl Default for FakeNode {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            build_delay: None,
            sign_complete: true,
            last_build_ttl: Mutex::new(None),
            submitted: Mutex::new(Vec::new()),
            feeds: Mutex::new(HashMap::new()),
            tokens: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

impl FakeNode {
    #[must_use]
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Makes `build` sleep before answering.
    #[must_use]
    pub fn with_build_delay(mut self, delay: Duration) -> Self {
        self.build_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn with_sign_complete(mut self, complete: bool) -> Self {
        self.sign_complete = complete;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_build_ttl(&self) -> Option<Duration> {
        *self.last_build_ttl.lock()
    }

    /// Raw transactions passed to `submit`, in order.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().clone()
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn best_block(&self) -> Result<&Block, ServiceError> {
        self.blocks
            .iter()
            .max_by_key(|b| b.height)
            .ok_or_else(|| ServiceError::Unavailable("chain is empty".into()))
    }

    fn find_block(&self, pred: impl Fn(&Block) -> bool, key: &str) -> Result<Block, ServiceError> {
        self.blocks
            .iter()
            .find(|&b| pred(b))
            .cloned()
            .ok_or_else(|| ServiceError::not_found("block", key))
    }
}

fn header(block: &Block) -> BlockHeaderInfo {
    BlockHeaderInfo {
        block_header: format!("header-{}", block.hash),
        reward: 41_250_000_000,
    }
}

#[async_trait]
impl KeyStore for FakeNode {
    async fn create(&self, alias: &str, _password: &str) -> Result<XPub, ServiceError> {
        self.touch();
        Ok(XPub {
            alias: alias.to_string(),
            xpub: format!("xpub-{alias}"),
            file: format!("keystore/{alias}.json"),
        })
    }

    async fn list(&self) -> Result<Vec<XPub>, ServiceError> {
        self.touch();
        Ok(Vec::new())
    }

    async fn delete(&self, xpub: &str, _password: &str) -> Result<(), ServiceError> {
        self.touch();
        Err(ServiceError::not_found("key", xpub))
    }

    async fn reset_password(
        &self,
        _xpub: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, ServiceError> {
        self.touch();
        Ok(old_password != new_password)
    }
}

#[async_trait]
impl KeyBackup for FakeNode {
    async fn export_private_key(
        &self,
        xpub: &str,
        _password: &str,
    ) -> Result<ExportedKey, ServiceError> {
        self.touch();
        Ok(ExportedKey {
            private_key: format!("xprv-of-{xpub}"),
        })
    }

    async fn import_private_key(&self, req: ImportKeyRequest) -> Result<XPub, ServiceError> {
        self.touch();
        Ok(XPub {
            xpub: format!("xpub-{}", req.alias),
            file: format!("keystore/{}.json", req.alias),
            alias: req.alias,
        })
    }

    async fn import_progress(&self) -> Result<ImportProgress, ServiceError> {
        self.touch();
        Ok(ImportProgress {
            done: true,
            scanned_height: 0,
            best_height: 0,
        })
    }
}

#[async_trait]
impl TxPipeline for FakeNode {
    async fn build(&self, _req: BuildRequest, ttl: Duration) -> Result<Template, ServiceError> {
        self.touch();
        *self.last_build_ttl.lock() = Some(ttl);
        if let Some(delay) = self.build_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(template("built"))
    }

    async fn sign(&self, template: Template, _password: &str) -> Result<SignResponse, ServiceError> {
        self.touch();
        Ok(SignResponse {
            transaction: template,
            sign_complete: self.sign_complete,
        })
    }

    async fn submit(&self, raw_transaction: &str) -> Result<SubmitResponse, ServiceError> {
        self.touch();
        self.submitted.lock().push(raw_transaction.to_string());
        Ok(SubmitResponse {
            tx_id: format!("tx-{raw_transaction}"),
        })
    }
}

#[async_trait]
impl TxFeedStore for FakeNode {
    async fn create(&self, alias: &str, filter: &str) -> Result<(), ServiceError> {
        self.touch();
        let mut feeds = self.feeds.lock();
        if feeds.contains_key(alias) {
            return Err(ServiceError::AlreadyExists(format!("feed {alias}")));
        }
        feeds.insert(alias.to_string(), filter.to_string());
        Ok(())
    }

    async fn get(&self, alias: &str) -> Result<TxFeed, ServiceError> {
        self.touch();
        self.feeds
            .lock()
            .get(alias)
            .map(|filter| TxFeed {
                alias: alias.to_string(),
                filter: filter.clone(),
            })
            .ok_or_else(|| ServiceError::not_found("feed", alias))
    }

    async fn update(&self, alias: &str, filter: &str) -> Result<(), ServiceError> {
        self.touch();
        match self.feeds.lock().get_mut(alias) {
            Some(existing) => {
                *existing = filter.to_string();
                Ok(())
            }
            None => Err(ServiceError::not_found("feed", alias)),
        }
    }

    async fn delete(&self, alias: &str) -> Result<(), ServiceError> {
        self.touch();
        self.feeds
            .lock()
            .remove(alias)
            .map(|_| ())
            .ok_or_else(|| ServiceError::not_found("feed", alias))
    }

    async fn list(&self) -> Result<Vec<TxFeed>, ServiceError> {
        self.touch();
        let mut feeds: Vec<_> = self
            .feeds
            .lock()
            .iter()
            .map(|(alias, filter)| TxFeed {
                alias: alias.clone(),
                filter: filter.clone(),
            })
            .collect();
        feeds.sort_by(|a, b| a.alias.cmp(&b.alias));
        Ok(feeds)
    }
}

#[async_trait]
impl ChainView for FakeNode {
    async fn best_height(&self) -> Result<u64, ServiceError> {
        self.touch();
        Ok(self.best_block()?.height)
    }

    async fn best_block_hash(&self) -> Result<String, ServiceError> {
        self.touch();
        Ok(self.best_block()?.hash.clone())
    }

    async fn block_header_by_hash(&self, hash: &str) -> Result<BlockHeaderInfo, ServiceError> {
        self.touch();
        self.find_block(|b| b.hash == hash, hash).map(|b| header(&b))
    }

    async fn block_header_by_height(&self, height: u64) -> Result<BlockHeaderInfo, ServiceError> {
        self.touch();
        self.find_block(|b| b.height == height, &height.to_string())
            .map(|b| header(&b))
    }

    async fn block_by_hash(&self, hash: &str) -> Result<Block, ServiceError> {
        self.touch();
        self.find_block(|b| b.hash == hash, hash)
    }

    async fn block_by_height(&self, height: u64) -> Result<Block, ServiceError> {
        self.touch();
        self.find_block(|b| b.height == height, &height.to_string())
    }

    async fn unspent_outputs(&self, _id: &str) -> Result<Vec<UnspentOutput>, ServiceError> {
        self.touch();
        Ok(Vec::new())
    }
}

#[async_trait]
impl NodeView for FakeNode {
    async fn node_info(&self) -> Result<NodeInfo, ServiceError> {
        self.touch();
        Ok(NodeInfo {
            version: "1.0.0".to_string(),
            build_commit: "abc123".to_string(),
            network_id: "testnet".to_string(),
        })
    }

    async fn net_info(&self) -> Result<NetInfo, ServiceError> {
        self.touch();
        Ok(NetInfo {
            listening: true,
            syncing: false,
            mining: false,
            peer_count: 3,
            current_block: 10,
            highest_block: 10,
        })
    }
}

#[async_trait]
impl Miner for FakeNode {
    async fn is_mining(&self) -> Result<bool, ServiceError> {
        self.touch();
        Ok(false)
    }

    async fn gas_rate(&self) -> Result<i64, ServiceError> {
        self.touch();
        Ok(0)
    }

    async fn get_work(&self) -> Result<Work, ServiceError> {
        self.touch();
        Ok(Work {
            block_header: "header".to_string(),
            seed: "seed".to_string(),
        })
    }

    async fn submit_work(&self, block_header: &str) -> Result<bool, ServiceError> {
        self.touch();
        Ok(block_header == "header")
    }
}

#[async_trait]
impl AccessTokenStore for FakeNode {
    async fn create(&self, id: &str, token_type: TokenType) -> Result<AccessToken, ServiceError> {
        self.touch();
        let token = AccessToken {
            id: id.to_string(),
            token: Some(format!("{id}:secret")),
            token_type,
            created_at: 0,
        };
        self.tokens.lock().insert(id.to_string(), token.clone());
        Ok(token)
    }

    async fn list(&self) -> Result<Vec<AccessToken>, ServiceError> {
        self.touch();
        Ok(self
            .tokens
            .lock()
            .values()
            .map(|t| AccessToken {
                token: None,
                ..t.clone()
            })
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.touch();
        self.tokens.lock().remove(id);
        Ok(())
    }

    async fn check(&self, id: &str, secret: &str) -> Result<(), ServiceError> {
        self.touch();
        let expected = format!("{id}:{secret}");
        match self.tokens.lock().get(id) {
            Some(t) if t.token.as_deref() == Some(expected.as_str()) => Ok(()),
            _ => Err(ServiceError::PermissionDenied("token mismatch".into())),
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials and latency
// ---------------------------------------------------------------------------

/// Credential store holding plain `id -> secret` pairs.
#[derive(Default)]
pub struct FakeCredentials {
    tokens: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FakeCredentials {
    pub fn with_token(id: &str, secret: &str) -> Self {
        let mut store = Self::default();
        store.tokens.insert(id.to_string(), secret.to_string());
        store
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for FakeCredentials {
    async fn resolve(&self, id: &str, secret: &str) -> Result<Principal, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.tokens.get(id) {
            None => Err(CredentialError::UnknownToken(id.to_string())),
            Some(expected) if expected != secret => Err(CredentialError::SecretMismatch(id.to_string())),
            Some(_) => Ok(Principal::new(id, TokenType::Client.as_str())),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    samples: Mutex<Vec<(&'static str, Duration)>>,
}

impl RecordingSink {
    pub fn routes(&self) -> Vec<&'static str> {
        self.samples.lock().iter().map(|(route, _)| *route).collect()
    }
}

impl LatencySink for RecordingSink {
    fn record(&self, route: &'static str, elapsed: Duration) {
        self.samples.lock().push((route, elapsed));
    }
}
