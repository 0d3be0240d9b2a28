//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name, shown in the header
pub const APP_NAME: &str = "Solana Guestbook";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under $HOME holding config.yaml and the wallet trust store
pub const CONFIG_DIR_NAME: &str = ".guestbook";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Trusted sites file used by the keypair wallet
pub const TRUST_STORE_FILE_NAME: &str = "trusted_sites.yaml";

/// Log file written next to the working directory
pub const LOG_FILE_NAME: &str = "guestbook.log";

/// Identity the wallet records when the user approves a connection
pub const DEFAULT_SITE: &str = "guestbook-tui";

/// Solana CLI default keypair location, relative to $HOME
pub const DEFAULT_WALLET_KEYPAIR: &str = ".config/solana/id.json";

/// Public RPC endpoints per cluster
pub const DEVNET_URL: &str = "https://api.devnet.solana.com";
pub const TESTNET_URL: &str = "https://api.testnet.solana.com";
pub const MAINNET_URL: &str = "https://api.mainnet-beta.solana.com";
pub const LOCALNET_URL: &str = "http://127.0.0.1:8899";

/// Interface description of the guestbook program, bundled at build time
pub const BUNDLED_IDL: &str = include_str!("../assets/idl.json");

/// Keypair bundle of the base account holding the comment list
pub const BUNDLED_BASE_ACCOUNT: &str = include_str!("../assets/keypair.json");

/// Remote call used to append a comment
pub const ADD_COMMENT_METHOD: &str = "addComment";

/// Account type holding the comment list
pub const BASE_ACCOUNT_TYPE: &str = "BaseAccount";

/// Name of the base account in instruction account lists
pub const BASE_ACCOUNT_ARG: &str = "baseAccount";

/// Field of `BaseAccount` holding the comments
pub const COMMENT_LIST_FIELD: &str = "commentList";

/// Expected public key of the bundled base account keypair
#[cfg(test)]
pub const BUNDLED_BASE_ACCOUNT_PUBKEY: &str = "A7PFG65CdwbVwzHZpWZVFFuqTu2tLPZ3tVHSbFiwP6zP";

/// Program address declared in the bundled IDL
#[cfg(test)]
pub const BUNDLED_PROGRAM_ID: &str = "4Tj2z2DbqNdQTiAc2otG3ZVx2SbM4GHfJoWqhEuHbDBz";
