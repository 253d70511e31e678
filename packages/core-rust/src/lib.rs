//! `noderpc` Core — collaborator contracts behind the node's JSON RPC surface.
//!
//! The RPC server never implements wallets, chains or key storage itself. It
//! talks to them through the traits in [`traits`], exchanging the payloads in
//! [`messages`] and reporting failures as [`ServiceError`].

pub mod error;
pub mod messages;
pub mod traits;
pub mod types;

pub use error::{CredentialError, ServiceError};
pub use traits::{
    AccessTokenStore, AccountManager, AssetRegistry, ChainView, CredentialStore, KeyBackup,
    KeyStore, Miner, NodeView, TxFeedStore, TxPipeline, WalletLedger,
};
pub use types::{Principal, Tags};
