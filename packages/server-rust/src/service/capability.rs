//! Wallet capability gate.
//!
//! The wallet-dependent route group is registered only when the ledger and
//! both of its registries are present. Partial availability counts as absent.

use std::sync::Arc;

use noderpc_core::{AccountManager, AssetRegistry, WalletLedger};

/// Wallet subsystem handles as supplied by the node at startup.
#[derive(Clone, Default)]
pub struct WalletCapability {
    pub ledger: Option<Arc<dyn WalletLedger>>,
    pub accounts: Option<Arc<dyn AccountManager>>,
    pub assets: Option<Arc<dyn AssetRegistry>>,
}

/// Wallet handles, all present.
#[derive(Clone)]
pub struct WalletHandles {
    pub ledger: Arc<dyn WalletLedger>,
    pub accounts: Arc<dyn AccountManager>,
    pub assets: Arc<dyn AssetRegistry>,
}

impl WalletCapability {
    /// A node running without a wallet.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn enabled(
        ledger: Arc<dyn WalletLedger>,
        accounts: Arc<dyn AccountManager>,
        assets: Arc<dyn AssetRegistry>,
    ) -> Self {
        Self {
            ledger: Some(ledger),
            accounts: Some(accounts),
            assets: Some(assets),
        }
    }

    /// Returns the handles only if every one of them is present.
    #[must_use]
    pub fn resolve(&self) -> Option<WalletHandles> {
        Some(WalletHandles {
            ledger: Arc::clone(self.ledger.as_ref()?),
            accounts: Arc::clone(self.accounts.as_ref()?),
            assets: Arc::clone(self.assets.as_ref()?),
        })
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.ledger.is_some() && self.accounts.is_some() && self.assets.is_some()
    }
}

impl std::fmt::Debug for WalletCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletCapability")
            .field("ledger", &self.ledger.is_some())
            .field("accounts", &self.accounts.is_some())
            .field("assets", &self.assets.is_some())
            .finish()
    }
}
