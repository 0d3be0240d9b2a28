//! Ledger client - RPC connection plus program handle

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_commitment_config::CommitmentConfig;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::config::AppConfig;
use crate::ledger::program::Program;
use crate::ledger::LedgerError;
use crate::models::Comment;
use crate::wallet::{WalletAdapter, WalletError};

/// Remote operations the app needs from the ledger
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Read the stored comment list of `base_account`
    async fn fetch_comments(&self, base_account: &Pubkey) -> Result<Vec<Comment>, LedgerError>;

    /// Sign with `wallet` and submit `addComment(text)`, waiting for confirmation
    async fn add_comment(
        &self,
        wallet: &dyn WalletAdapter,
        text: &str,
        base_account: &Pubkey,
    ) -> Result<Signature, LedgerError>;
}

/// Ledger over Solana JSON-RPC
pub struct RpcLedger {
    rpc: RpcClient,
    program: Program,
    commitment: CommitmentConfig,
}

impl RpcLedger {
    pub fn new(url: impl Into<String>, commitment: CommitmentConfig, program: Program) -> Self {
        RpcLedger {
            rpc: RpcClient::new_with_commitment(url.into(), commitment),
            program,
            commitment,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let program = Program::new(config.idl.clone(), config.program_id);
        Self::new(config.rpc_url(), config.commitment.config(), program)
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn fetch_comments(&self, base_account: &Pubkey) -> Result<Vec<Comment>, LedgerError> {
        let account = self
            .rpc
            .get_account_with_commitment(base_account, self.commitment)
            .await?
            .value
            .ok_or(LedgerError::AccountNotFound(*base_account))?;

        if account.owner != self.program.id() {
            return Err(LedgerError::WrongOwner {
                account: *base_account,
                owner: account.owner,
            });
        }

        let decoded = self.program.decode_base_account(&account.data)?;
        Ok(decoded.comment_list)
    }

    async fn add_comment(
        &self,
        wallet: &dyn WalletAdapter,
        text: &str,
        base_account: &Pubkey,
    ) -> Result<Signature, LedgerError> {
        let payer = wallet.public_key().ok_or(WalletError::NotConnected)?;
        let instruction = self.program.add_comment_instruction(text, base_account, &payer)?;

        let mut transaction = Transaction::new_unsigned(Message::new(&[instruction], Some(&payer)));
        transaction.message.recent_blockhash = self.rpc.get_latest_blockhash().await?;

        let signed = wallet.sign_transaction(transaction).await?;
        let signature = self.rpc.send_and_confirm_transaction(&signed).await?;
        Ok(signature)
    }
}
