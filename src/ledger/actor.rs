//! Ledger actor - runs wallet and RPC work in the Tokio async runtime

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::ledger::client::Ledger;
use crate::messages::{LedgerCommand, LedgerResponse};
use crate::wallet::{ConnectOptions, WalletAdapter};

/// Ledger actor that processes wallet and comment commands
pub struct LedgerActor {
    ledger: Arc<dyn Ledger>,
    wallet: Option<Arc<dyn WalletAdapter>>,
    base_account: Pubkey,
    response_tx: mpsc::UnboundedSender<LedgerResponse>,
    tasks: JoinSet<()>,
}

impl LedgerActor {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        wallet: Option<Arc<dyn WalletAdapter>>,
        base_account: Pubkey,
        response_tx: mpsc::UnboundedSender<LedgerResponse>,
    ) -> Self {
        LedgerActor {
            ledger,
            wallet,
            base_account,
            response_tx,
            tasks: JoinSet::new(),
        }
    }

    /// Run the ledger actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<LedgerCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(LedgerCommand::ConnectWallet { only_if_trusted }) => {
                            self.connect_wallet(only_if_trusted);
                        }

                        Some(LedgerCommand::FetchComments { id }) => {
                            let ledger = self.ledger.clone();
                            let base_account = self.base_account;
                            let response_tx = self.response_tx.clone();

                            self.tasks.spawn(async move {
                                tracing::info!(id, account = %base_account, "Fetching comments");
                                let response = match ledger.fetch_comments(&base_account).await {
                                    Ok(comments) => {
                                        tracing::info!(id, count = comments.len(), "Comments fetched");
                                        LedgerResponse::CommentsFetched { id, comments }
                                    }
                                    Err(e) => {
                                        tracing::warn!(id, error = %e, "Fetching comments failed");
                                        LedgerResponse::FetchFailed { id, error: e.to_string() }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(LedgerCommand::AddComment { id, text }) => {
                            let Some(wallet) = self.wallet.clone() else {
                                let _ = self.response_tx.send(LedgerResponse::SubmitFailed {
                                    id,
                                    error: String::from("no wallet"),
                                });
                                continue;
                            };
                            let ledger = self.ledger.clone();
                            let base_account = self.base_account;
                            let response_tx = self.response_tx.clone();

                            self.tasks.spawn(async move {
                                tracing::info!(id, text = %text, "Sending comment");
                                let response = match ledger.add_comment(wallet.as_ref(), &text, &base_account).await {
                                    Ok(signature) => {
                                        tracing::info!(id, %signature, "Comment confirmed");
                                        LedgerResponse::CommentAdded { id, signature: signature.to_string() }
                                    }
                                    Err(e) => {
                                        tracing::error!(id, error = %e, "Sending comment failed");
                                        LedgerResponse::SubmitFailed { id, error: e.to_string() }
                                    }
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(LedgerCommand::Shutdown) | None => {
                            self.tasks.abort_all();
                            break;
                        }
                    }
                }

                // Reap finished tasks
                Some(_result) = self.tasks.join_next() => {}
            }
        }
    }

    fn connect_wallet(&mut self, only_if_trusted: bool) {
        let Some(wallet) = self.wallet.clone() else {
            tracing::info!("No wallet available");
            let _ = self.response_tx.send(LedgerResponse::WalletMissing);
            return;
        };

        if only_if_trusted && !wallet.supports_trusted_connect() {
            tracing::debug!(wallet = wallet.name(), "Wallet cannot reconnect silently");
            return;
        }

        let response_tx = self.response_tx.clone();
        self.tasks.spawn(async move {
            let options = ConnectOptions { only_if_trusted };
            let response = match wallet.connect(options).await {
                Ok(address) => {
                    tracing::info!(wallet = wallet.name(), %address, "Wallet connected");
                    LedgerResponse::WalletConnected { address }
                }
                Err(e) => {
                    tracing::debug!(wallet = wallet.name(), only_if_trusted, error = %e, "Wallet connect rejected");
                    LedgerResponse::WalletRejected {
                        silent: only_if_trusted,
                        reason: e.to_string(),
                    }
                }
            };
            let _ = response_tx.send(response);
        });
    }
}
