//! Ledger layer - reads the comment account and submits comment transactions
//!
//! The Ledger actor receives commands from the App layer, runs them against
//! the wallet and the RPC node, and sends back responses.

pub mod actor;
pub mod client;
pub mod idl;
pub mod program;

use solana_sdk::pubkey::Pubkey;

use crate::ledger::idl::IdlError;
use crate::wallet::WalletError;

pub use actor::LedgerActor;
pub use client::{Ledger, RpcLedger};
pub use program::{BaseAccount, Program};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("rpc request failed: {0}")]
    Rpc(String),
    #[error("account {0} does not exist")]
    AccountNotFound(Pubkey),
    #[error("account {account} is owned by {owner}, not the guestbook program")]
    WrongOwner { account: Pubkey, owner: Pubkey },
    #[error("instruction needs account '{0}'")]
    MissingAccount(String),
    #[error("account decode failed: {0}")]
    Decode(String),
    #[error(transparent)]
    Idl(#[from] IdlError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl From<solana_client::client_error::ClientError> for LedgerError {
    fn from(e: solana_client::client_error::ClientError) -> Self {
        LedgerError::Rpc(e.to_string())
    }
}
