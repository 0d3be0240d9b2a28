//! Solana Guestbook TUI - Actor-based on-chain guestbook
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Ledger Layer (Tokio) - async wallet and RPC work

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use guestbook_tui::app::{AppActor, AppState};
use guestbook_tui::config::AppConfig;
use guestbook_tui::constants::LOG_FILE_NAME;
use guestbook_tui::ledger::{LedgerActor, RpcLedger};
use guestbook_tui::messages::ui_events::key_to_ui_event;
use guestbook_tui::messages::{LedgerCommand, LedgerResponse, RenderState, UiEvent};
use guestbook_tui::ui::draw_ui;
use guestbook_tui::wallet;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    // Configuration errors are reported before the terminal is taken over
    let config = AppConfig::load_default().context("Failed to load configuration")?;
    tracing::info!(
        cluster = config.rpc_url(),
        commitment = %config.commitment,
        program = %config.program_id,
        base_account = %config.base_account,
        "Starting guestbook"
    );

    let ledger = Arc::new(RpcLedger::from_config(&config));
    let wallet = wallet::detect(&config);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (ledger_cmd_tx, ledger_cmd_rx) = mpsc::unbounded_channel::<LedgerCommand>();
    let (ledger_resp_tx, ledger_resp_rx) = mpsc::unbounded_channel::<LedgerResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn ledger actor
    let ledger_actor = LedgerActor::new(ledger, wallet, config.base_account, ledger_resp_tx);
    tokio::spawn(ledger_actor.run(ledger_cmd_rx));

    // Spawn app actor
    let state = AppState::new(config.clear_draft_on_submit);
    let app_actor = AppActor::new(state, ledger_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, ledger_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.screen(),
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    if matches!(event, UiEvent::Quit) {
                        let _ = ui_tx.send(event);
                        break;
                    }
                    let _ = ui_tx.send(event);
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}
