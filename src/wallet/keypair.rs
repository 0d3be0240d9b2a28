//! File-system keypair wallet and keypair file parsing

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;

use crate::storage::TrustStore;
use crate::wallet::{ConnectOptions, WalletAdapter, WalletError};

/// Accepted keypair encodings
#[derive(Deserialize)]
#[serde(untagged)]
enum KeypairFile {
    /// Solana CLI: `[12, 34, ...]`
    Bytes(Vec<u8>),
    /// web3.js `Keypair` dumped with JSON.stringify
    Bundle {
        #[serde(rename = "_keypair")]
        keypair: KeypairBundle,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeypairBundle {
    secret_key: SecretKey,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SecretKey {
    Bytes(Vec<u8>),
    /// Uint8Array serialization: `{ "0": 12, "1": 34, ... }`
    Indexed(BTreeMap<String, u8>),
}

impl SecretKey {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            SecretKey::Bytes(bytes) => Ok(bytes),
            SecretKey::Indexed(map) => {
                let mut indexed = map
                    .into_iter()
                    .map(|(k, v)| {
                        k.parse::<usize>()
                            .map(|i| (i, v))
                            .map_err(|_| anyhow!("secret key index '{}' is not a number", k))
                    })
                    .collect::<Result<Vec<_>>>()?;
                indexed.sort_by_key(|(i, _)| *i);
                if indexed.iter().enumerate().any(|(pos, (i, _))| pos != *i) {
                    bail!("secret key indices are not contiguous");
                }
                Ok(indexed.into_iter().map(|(_, v)| v).collect())
            }
        }
    }
}

/// Parse a keypair from either the CLI byte array or the web3.js bundle format
pub fn parse_keypair_json(text: &str) -> Result<Keypair> {
    let file: KeypairFile = serde_json::from_str(text).context("keypair is not valid JSON")?;
    let bytes = match file {
        KeypairFile::Bytes(bytes) => bytes,
        KeypairFile::Bundle { keypair } => keypair.secret_key.into_bytes()?,
    };
    Keypair::try_from(bytes.as_slice()).map_err(|e| anyhow!("invalid keypair bytes: {}", e))
}

/// Wallet backed by a local keypair file.
///
/// Connection approval is tracked per site in a [`TrustStore`]: a silent
/// connect only succeeds for approved sites, a prompting connect (the user
/// pressing connect) approves the site.
pub struct KeypairWallet {
    keypair: Keypair,
    site: String,
    trust: Mutex<TrustStore>,
    connected: RwLock<Option<Pubkey>>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair, site: impl Into<String>, trust: TrustStore) -> Self {
        KeypairWallet {
            keypair,
            site: site.into(),
            trust: Mutex::new(trust),
            connected: RwLock::new(None),
        }
    }

    pub fn from_file(path: &Path, site: impl Into<String>, trust: TrustStore) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading keypair {}", path.display()))?;
        let keypair = parse_keypair_json(&text)?;
        Ok(KeypairWallet::new(keypair, site, trust))
    }

    fn is_trusted(&self) -> bool {
        self.trust
            .lock()
            .map(|store| store.is_trusted(&self.site))
            .unwrap_or(false)
    }

    fn approve(&self) -> Result<(), WalletError> {
        let mut store = self
            .trust
            .lock()
            .map_err(|_| WalletError::Rejected(String::from("trust store poisoned")))?;
        match store.trust(&self.site) {
            Ok(true) => tracing::info!(site = %self.site, "Site approved"),
            Ok(false) => {}
            // Approval still holds for this run
            Err(e) => tracing::warn!(site = %self.site, error = %e, "Could not persist approval"),
        }
        Ok(())
    }
}

#[async_trait]
impl WalletAdapter for KeypairWallet {
    fn name(&self) -> &str {
        "keypair"
    }

    fn public_key(&self) -> Option<Pubkey> {
        self.connected.read().ok().and_then(|guard| *guard)
    }

    async fn connect(&self, options: ConnectOptions) -> Result<Pubkey, WalletError> {
        if options.only_if_trusted {
            if !self.is_trusted() {
                return Err(WalletError::NotTrusted(self.site.clone()));
            }
        } else {
            self.approve()?;
        }

        let pubkey = self.keypair.pubkey();
        if let Ok(mut connected) = self.connected.write() {
            *connected = Some(pubkey);
        }
        Ok(pubkey)
    }

    async fn sign_transaction(&self, mut transaction: Transaction) -> Result<Transaction, WalletError> {
        if self.public_key().is_none() {
            return Err(WalletError::NotConnected);
        }
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        Ok(transaction)
    }
}
