//! Wallet layer - the signing capability injected into the ledger actor
//!
//! A wallet owns the user's key, approves connections and signs
//! transactions. The app never touches key material directly.

pub mod keypair;

use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::config::AppConfig;
use crate::storage::TrustStore;

pub use keypair::{parse_keypair_json, KeypairWallet};

/// Options for [`WalletAdapter::connect`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Only succeed without prompting, i.e. if this site was approved before
    pub only_if_trusted: bool,
}

impl ConnectOptions {
    pub fn silent() -> Self {
        ConnectOptions {
            only_if_trusted: true,
        }
    }

    pub fn prompt() -> Self {
        ConnectOptions {
            only_if_trusted: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("site '{0}' has not been approved by the wallet")]
    NotTrusted(String),
    #[error("connection request rejected: {0}")]
    Rejected(String),
    #[error("wallet is not connected")]
    NotConnected,
    #[error("signing failed: {0}")]
    Signing(String),
}

#[async_trait]
pub trait WalletAdapter: Send + Sync {
    /// Display name of the wallet
    fn name(&self) -> &str;

    /// Whether the wallet can reconnect without prompting
    fn supports_trusted_connect(&self) -> bool {
        true
    }

    /// Key of the connected account, if any
    fn public_key(&self) -> Option<Pubkey>;

    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey, WalletError>;

    /// Add the wallet's signature to a transaction whose blockhash is already set
    async fn sign_transaction(&self, transaction: Transaction) -> Result<Transaction, WalletError>;
}

/// Look for the configured keypair wallet. `None` means no wallet is installed.
pub fn detect(config: &AppConfig) -> Option<Arc<dyn WalletAdapter>> {
    let path = &config.wallet_keypair;
    if !path.exists() {
        tracing::info!(path = %path.display(), "No wallet keypair found");
        return None;
    }

    let trust = match TrustStore::load(&config.config_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "Trust store unreadable, starting untrusted");
            TrustStore::default()
        }
    };

    match KeypairWallet::from_file(path, config.site.clone(), trust) {
        Ok(wallet) => {
            tracing::info!(path = %path.display(), "Keypair wallet found");
            Some(Arc::new(wallet))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Wallet keypair unusable");
            None
        }
    }
}
