//! Startup configuration
//!
//! Everything the actors need is resolved once into an [`AppConfig`]:
//! the optional `~/.guestbook/config.yaml`, the bundled interface document
//! and the bundled base-account keypair.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;

use crate::constants::{
    BUNDLED_BASE_ACCOUNT, BUNDLED_IDL, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_SITE,
    DEFAULT_WALLET_KEYPAIR, DEVNET_URL, LOCALNET_URL, MAINNET_URL, TESTNET_URL,
};
use crate::ledger::idl::Idl;
use crate::wallet::parse_keypair_json;

/// Network to talk to, by name or explicit RPC URL
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Cluster {
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => DEVNET_URL,
            Cluster::Testnet => TESTNET_URL,
            Cluster::MainnetBeta => MAINNET_URL,
            Cluster::Localnet => LOCALNET_URL,
            Cluster::Custom(url) => url,
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(Cluster::Custom(url.to_string()))
            }
            other => Err(format!("unknown cluster '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Cluster {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Confirmation strength used for reads and transaction confirmation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn config(&self) -> CommitmentConfig {
        match self {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

/// `config.yaml` as written by the user; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub cluster: Cluster,
    pub commitment: Commitment,
    pub wallet_keypair: Option<PathBuf>,
    pub idl_path: Option<PathBuf>,
    pub base_account_path: Option<PathBuf>,
    pub site: Option<String>,
    pub clear_draft_on_submit: bool,
}

/// Fully resolved configuration handed to the actors
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cluster: Cluster,
    pub commitment: Commitment,
    pub idl: Arc<Idl>,
    pub program_id: Pubkey,
    pub base_account: Pubkey,
    pub wallet_keypair: PathBuf,
    pub site: String,
    pub config_dir: PathBuf,
    pub clear_draft_on_submit: bool,
}

impl AppConfig {
    /// Load from `~/.guestbook`
    pub fn load_default() -> Result<Self> {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::load(&home.join(CONFIG_DIR_NAME), &home)
    }

    /// Load `config.yaml` from `config_dir` (optional) and resolve bundled data.
    /// Relative paths in the file are taken relative to `config_dir`.
    pub fn load(config_dir: &Path, home: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE_NAME);
        let file = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str::<ConfigFile>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            ConfigFile::default()
        };

        Self::resolve(file, config_dir, home)
    }

    pub fn resolve(file: ConfigFile, config_dir: &Path, home: &Path) -> Result<Self> {
        let absolute = |p: PathBuf| if p.is_absolute() { p } else { config_dir.join(p) };

        let idl_text = match &file.idl_path {
            Some(p) => {
                let p = absolute(p.clone());
                fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))?
            }
            None => BUNDLED_IDL.to_string(),
        };
        let idl = Idl::from_json(&idl_text).context("loading interface document")?;
        let program_id = idl.program_id().context("loading interface document")?;

        let base_text = match &file.base_account_path {
            Some(p) => {
                let p = absolute(p.clone());
                fs::read_to_string(&p).with_context(|| format!("reading {}", p.display()))?
            }
            None => BUNDLED_BASE_ACCOUNT.to_string(),
        };
        let base_account = parse_keypair_json(&base_text)
            .context("loading base account keypair")?
            .pubkey();

        let wallet_keypair = file
            .wallet_keypair
            .map(absolute)
            .unwrap_or_else(|| home.join(DEFAULT_WALLET_KEYPAIR));

        Ok(AppConfig {
            cluster: file.cluster,
            commitment: file.commitment,
            idl: Arc::new(idl),
            program_id,
            base_account,
            wallet_keypair,
            site: file.site.unwrap_or_else(|| DEFAULT_SITE.to_string()),
            config_dir: config_dir.to_path_buf(),
            clear_draft_on_submit: file.clear_draft_on_submit,
        })
    }

    pub fn rpc_url(&self) -> &str {
        self.cluster.url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BUNDLED_BASE_ACCOUNT_PUBKEY, BUNDLED_PROGRAM_ID};

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join(".guestbook"), dir.path()).unwrap();

        assert_eq!(config.cluster, Cluster::Devnet);
        assert_eq!(config.rpc_url(), DEVNET_URL);
        assert_eq!(config.commitment, Commitment::Processed);
        assert_eq!(config.program_id.to_string(), BUNDLED_PROGRAM_ID);
        assert_eq!(config.base_account.to_string(), BUNDLED_BASE_ACCOUNT_PUBKEY);
        assert_eq!(config.wallet_keypair, dir.path().join(".config/solana/id.json"));
        assert_eq!(config.site, "guestbook-tui");
        assert!(!config.clear_draft_on_submit);
    }

    #[test]
    fn test_config_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "cluster: http://localhost:9000\ncommitment: finalized\nwallet_keypair: me.json\nclear_draft_on_submit: true\n",
        )
        .unwrap();

        let config = AppConfig::load(dir.path(), dir.path()).unwrap();
        assert_eq!(config.rpc_url(), "http://localhost:9000");
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.wallet_keypair, dir.path().join("me.json"));
        assert!(config.clear_draft_on_submit);
    }

    #[test]
    fn test_unknown_keys_and_clusters_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "clustr: devnet\n").unwrap();
        assert!(AppConfig::load(dir.path(), dir.path()).is_err());

        fs::write(dir.path().join(CONFIG_FILE_NAME), "cluster: moon\n").unwrap();
        assert!(AppConfig::load(dir.path(), dir.path()).is_err());
    }

    #[test]
    fn test_cluster_names() {
        assert_eq!("mainnet-beta".parse::<Cluster>().unwrap().url(), MAINNET_URL);
        assert_eq!("localnet".parse::<Cluster>().unwrap().url(), LOCALNET_URL);
        assert_eq!("testnet".parse::<Cluster>().unwrap().url(), TESTNET_URL);
    }

    #[test]
    fn test_commitment_mapping() {
        assert_eq!(Commitment::Confirmed.config(), CommitmentConfig::confirmed());
        assert_eq!(Commitment::Processed.to_string(), "processed");
    }
}
