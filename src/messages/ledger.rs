//! Ledger messages - communication between App and Ledger layers

use solana_sdk::pubkey::Pubkey;

use crate::models::Comment;

/// Commands sent from App layer to Ledger layer
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    /// Connect the wallet; `only_if_trusted` skips any approval prompt
    ConnectWallet { only_if_trusted: bool },
    /// Read the comment list from the base account
    FetchComments { id: u64 },
    /// Submit `addComment(text)`
    AddComment { id: u64, text: String },
    /// Shutdown the ledger actor
    Shutdown,
}

/// Responses sent from Ledger layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerResponse {
    /// No wallet is installed
    WalletMissing,
    WalletConnected {
        address: Pubkey,
    },
    /// Connect failed; `silent` tells whether it was the trust-only attempt
    WalletRejected {
        silent: bool,
        reason: String,
    },
    CommentsFetched {
        id: u64,
        comments: Vec<Comment>,
    },
    FetchFailed {
        id: u64,
        error: String,
    },
    CommentAdded {
        id: u64,
        signature: String,
    },
    SubmitFailed {
        id: u64,
        error: String,
    },
}
