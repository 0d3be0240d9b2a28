//! # Solana Guestbook TUI
//!
//! A terminal guestbook backed by a single on-chain Anchor account.
//!
//! ## Features
//! - Wallet connect with silent reconnect for trusted sites
//! - Comment feed decoded from the program's IDL, most recent first
//! - Add a comment through a signed `addComment` transaction
//! - YAML configuration for cluster, commitment and keypair paths
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Ledger Layer (Tokio runtime, Solana RPC)

pub mod app;
pub mod config;
pub mod constants;
pub mod ledger;
pub mod messages;
pub mod models;
pub mod storage;
pub mod ui;
pub mod wallet;

// Re-export commonly used types
pub use models::{Comment, Draft, Session};
pub use config::AppConfig;
pub use messages::{UiEvent, LedgerCommand, LedgerResponse, RenderState};
pub use app::{AppState, AppActor};
pub use ledger::{Ledger, LedgerActor, RpcLedger};
pub use wallet::{KeypairWallet, WalletAdapter};
