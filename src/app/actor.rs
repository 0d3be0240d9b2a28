//! App actor - message loop processing UI events and ledger responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{LedgerCommand, LedgerResponse, RenderState, UiEvent};

/// App actor that processes UI events and ledger responses
pub struct AppActor {
    state: AppState,
    ledger_tx: mpsc::UnboundedSender<LedgerCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        ledger_tx: mpsc::UnboundedSender<LedgerCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            ledger_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut ledger_rx: mpsc::UnboundedReceiver<LedgerResponse>,
    ) {
        // Send initial render state, then try to reconnect a trusted wallet
        let _ = self.render_tx.send(self.state.to_render_state());
        self.send(Some(self.state.startup_connect()));

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.ledger_tx.send(LedgerCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = ledger_rx.recv() => {
                    let follow_up = self.state.handle_response(response);
                    self.send(follow_up);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: Option<LedgerCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.ledger_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Wallet
            UiEvent::Connect => {
                let cmd = self.state.connect();
                self.send(cmd);
            }

            // Draft editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::CursorLeft => self.state.move_cursor_left(),
            UiEvent::CursorRight => self.state.move_cursor_right(),

            // Comments
            UiEvent::Submit => {
                let cmd = self.state.submit();
                if cmd.is_some() && self.state.input_mode == InputMode::Editing {
                    self.state.stop_editing();
                }
                self.send(cmd);
            }
            UiEvent::ScrollUp => self.state.scroll_up(),
            UiEvent::ScrollDown => self.state.scroll_down(),

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}
