use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CredentialError, ServiceError};
use crate::messages::{
    AccessToken, Account, AnnotatedTx, Asset, Block, BlockHeaderInfo, BuildRequest,
    ControlProgram, CreateAccountRequest, CreateAssetRequest, ExportedKey, ImportKeyRequest,
    ImportProgress, NetInfo, NodeInfo, Receiver, SignResponse, SubmitResponse, Template,
    TokenType, TxFeed, UnspentOutput, Work, XPub,
};
use crate::types::{Principal, Tags};

/// Account registry of the wallet.
/// Methods taking `account_info` accept either an account id or an alias.
#[async_trait]
pub trait AccountManager: Send + Sync {
    async fn create(&self, req: CreateAccountRequest) -> Result<Account, ServiceError>;

    async fn update_tags(&self, account_info: &str, tags: Tags) -> Result<(), ServiceError>;

    async fn create_receiver(
        &self,
        account_info: &str,
        expires_at: Option<u64>,
    ) -> Result<Receiver, ServiceError>;

    /// Lists accounts; an empty `id` selects all of them.
    async fn list(&self, id: &str) -> Result<Vec<Account>, ServiceError>;

    async fn find_by_alias(&self, alias: &str) -> Result<Account, ServiceError>;

    /// All control programs derived for the account, change programs included.
    async fn control_programs(&self, account_id: &str)
        -> Result<Vec<ControlProgram>, ServiceError>;

    async fn delete(&self, account_info: &str) -> Result<(), ServiceError>;

    /// Decodes an address into its control program under the node's network parameters.
    fn decode_address(&self, address: &str) -> Result<Vec<u8>, ServiceError>;

    /// Returns `true` if the control program belongs to one of the wallet's accounts.
    async fn is_local_program(&self, program: &[u8]) -> Result<bool, ServiceError>;
}

/// Asset registry of the wallet.
#[async_trait]
pub trait AssetRegistry: Send + Sync {
    async fn create(&self, req: CreateAssetRequest) -> Result<Asset, ServiceError>;

    async fn update_alias(&self, id: &str, alias: &str) -> Result<(), ServiceError>;

    async fn update_tags(&self, asset_info: &str, tags: Tags) -> Result<(), ServiceError>;

    async fn list(&self, id: &str) -> Result<Vec<Asset>, ServiceError>;
}

/// Transaction history and unspent outputs indexed by the wallet.
#[async_trait]
pub trait WalletLedger: Send + Sync {
    async fn get_transaction(&self, tx_id: &str) -> Result<AnnotatedTx, ServiceError>;

    /// Lists annotated transactions; an empty `id` selects all of them.
    async fn list_transactions(&self, id: &str) -> Result<Vec<AnnotatedTx>, ServiceError>;

    /// Every unspent output owned by the wallet's accounts.
    async fn unspent_outputs(&self) -> Result<Vec<UnspentOutput>, ServiceError>;
}

/// Password-protected key storage (the node's software HSM).
#[async_trait]
pub trait KeyStore: Send + Sync {
    async fn create(&self, alias: &str, password: &str) -> Result<XPub, ServiceError>;

    async fn list(&self) -> Result<Vec<XPub>, ServiceError>;

    async fn delete(&self, xpub: &str, password: &str) -> Result<(), ServiceError>;

    /// Returns `true` if the password was changed.
    async fn reset_password(
        &self,
        xpub: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<bool, ServiceError>;
}

/// Key export and import, including the wallet rescan that follows an import.
#[async_trait]
pub trait KeyBackup: Send + Sync {
    async fn export_private_key(
        &self,
        xpub: &str,
        password: &str,
    ) -> Result<ExportedKey, ServiceError>;

    async fn import_private_key(&self, req: ImportKeyRequest) -> Result<XPub, ServiceError>;

    async fn import_progress(&self) -> Result<ImportProgress, ServiceError>;
}

/// Builds, signs and submits transactions.
#[async_trait]
pub trait TxPipeline: Send + Sync {
    async fn build(&self, req: BuildRequest, ttl: Duration) -> Result<Template, ServiceError>;

    async fn sign(&self, template: Template, password: &str) -> Result<SignResponse, ServiceError>;

    async fn submit(&self, raw_transaction: &str) -> Result<SubmitResponse, ServiceError>;
}

/// Named transaction filters persisted by the node.
#[async_trait]
pub trait TxFeedStore: Send + Sync {
    async fn create(&self, alias: &str, filter: &str) -> Result<(), ServiceError>;

    async fn get(&self, alias: &str) -> Result<TxFeed, ServiceError>;

    async fn update(&self, alias: &str, filter: &str) -> Result<(), ServiceError>;

    async fn delete(&self, alias: &str) -> Result<(), ServiceError>;

    async fn list(&self) -> Result<Vec<TxFeed>, ServiceError>;
}

/// Read access to the local chain state.
#[async_trait]
pub trait ChainView: Send + Sync {
    async fn best_height(&self) -> Result<u64, ServiceError>;

    async fn best_block_hash(&self) -> Result<String, ServiceError>;

    async fn block_header_by_hash(&self, hash: &str) -> Result<BlockHeaderInfo, ServiceError>;

    async fn block_header_by_height(&self, height: u64) -> Result<BlockHeaderInfo, ServiceError>;

    async fn block_by_hash(&self, hash: &str) -> Result<Block, ServiceError>;

    async fn block_by_height(&self, height: u64) -> Result<Block, ServiceError>;

    /// Unspent outputs in the UTXO view; an empty `id` selects all of them.
    async fn unspent_outputs(&self, id: &str) -> Result<Vec<UnspentOutput>, ServiceError>;
}

/// Node identity and peer-to-peer status.
#[async_trait]
pub trait NodeView: Send + Sync {
    async fn node_info(&self) -> Result<NodeInfo, ServiceError>;

    async fn net_info(&self) -> Result<NetInfo, ServiceError>;
}

/// Local and external mining control.
#[async_trait]
pub trait Miner: Send + Sync {
    async fn is_mining(&self) -> Result<bool, ServiceError>;

    async fn gas_rate(&self) -> Result<i64, ServiceError>;

    async fn get_work(&self) -> Result<Work, ServiceError>;

    /// Returns `true` if the submitted header solved the current job.
    async fn submit_work(&self, block_header: &str) -> Result<bool, ServiceError>;
}

/// Management of access tokens exposed through the RPC surface.
#[async_trait]
pub trait AccessTokenStore: Send + Sync {
    /// Creates a token; the returned value carries the secret exactly once.
    async fn create(&self, id: &str, token_type: TokenType) -> Result<AccessToken, ServiceError>;

    async fn list(&self) -> Result<Vec<AccessToken>, ServiceError>;

    async fn delete(&self, id: &str) -> Result<(), ServiceError>;

    /// Succeeds only if `secret` matches the token `id`.
    async fn check(&self, id: &str, secret: &str) -> Result<(), ServiceError>;
}

/// Resolves caller credentials to an identity.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn resolve(&self, id: &str, secret: &str) -> Result<Principal, CredentialError>;
}
