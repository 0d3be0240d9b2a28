//! Command handlers - business logic for processing UI events and ledger responses

use crate::app::AppState;
use crate::messages::ui_events::InputMode;
use crate::messages::{LedgerCommand, LedgerResponse};

/// Shown when no wallet could be found at startup
pub const NO_WALLET_NOTICE: &str =
    "Solana wallet not found! Create a keypair with `solana-keygen new` or set `wallet_keypair` in ~/.guestbook/config.yaml";

impl AppState {
    // ========================
    // Wallet
    // ========================

    /// Trust-only reconnect issued once at startup
    pub fn startup_connect(&self) -> LedgerCommand {
        LedgerCommand::ConnectWallet { only_if_trusted: true }
    }

    /// Explicit connect requested by the user
    pub fn connect(&mut self) -> Option<LedgerCommand> {
        if self.session.is_connected() {
            return None;
        }
        Some(LedgerCommand::ConnectWallet { only_if_trusted: false })
    }

    // ========================
    // Draft editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.session.is_connected() {
            self.input_mode = InputMode::Editing;
            self.draft.cursor = self.draft.text.len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let draft = &mut self.draft;
        if draft.cursor > 0 {
            draft.cursor = draft.text[..draft.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let draft = &mut self.draft;
        if draft.cursor < draft.text.len() {
            draft.cursor = draft.text[draft.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| draft.cursor + i)
                .unwrap_or(draft.text.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let draft = &mut self.draft;
        if draft.cursor <= draft.text.len() {
            draft.text.insert(draft.cursor, c);
            draft.cursor += c.len_utf8();
        }
    }

    pub fn delete_char(&mut self) {
        let draft = &mut self.draft;
        if draft.cursor > 0 {
            let prev = draft.text[..draft.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            draft.text.remove(prev);
            draft.cursor = prev;
        }
    }

    // ========================
    // Comments
    // ========================

    /// Submit the draft. Empty drafts never reach the ledger.
    pub fn submit(&mut self) -> Option<LedgerCommand> {
        if !self.session.is_connected() {
            return None;
        }
        if self.draft.is_empty() {
            tracing::debug!("No comment text given");
            return None;
        }

        let id = self.next_id();
        self.pending_submits += 1;
        tracing::info!(id, text = %self.draft.text, "Submitting comment");
        Some(LedgerCommand::AddComment {
            id,
            text: self.draft.text.clone(),
        })
    }

    /// Issue a fetch; only the most recent fetch's answer is applied
    pub fn fetch_comments(&mut self) -> LedgerCommand {
        let id = self.next_id();
        self.pending_fetch_id = Some(id);
        LedgerCommand::FetchComments { id }
    }

    pub fn scroll_up(&mut self) {
        self.feed_scroll = self.feed_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.feed_scroll = self.feed_scroll.saturating_add(1);
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Ledger responses
    // ========================

    /// Apply a ledger response, returning a follow-up command if one is due
    pub fn handle_response(&mut self, response: LedgerResponse) -> Option<LedgerCommand> {
        match response {
            LedgerResponse::WalletMissing => {
                self.notice = Some(String::from(NO_WALLET_NOTICE));
                None
            }

            LedgerResponse::WalletConnected { address } => {
                let was_connected = self.session.is_connected();
                self.session.connected_address = Some(address);
                self.notice = None;
                if was_connected {
                    None
                } else {
                    Some(self.fetch_comments())
                }
            }

            LedgerResponse::WalletRejected { silent: true, reason } => {
                // Never approved this site; stay on the connect screen
                tracing::debug!(%reason, "Silent reconnect declined");
                None
            }

            LedgerResponse::WalletRejected { silent: false, reason } => {
                tracing::warn!(%reason, "Wallet connection rejected");
                self.notice = Some(format!("Wallet did not connect: {}", reason));
                None
            }

            LedgerResponse::CommentsFetched { id, comments } => {
                if self.pending_fetch_id == Some(id) {
                    self.pending_fetch_id = None;
                    self.comments = comments;
                } else {
                    tracing::debug!(id, "Ignoring stale comment list");
                }
                None
            }

            LedgerResponse::FetchFailed { id, error } => {
                if self.pending_fetch_id == Some(id) {
                    self.pending_fetch_id = None;
                    tracing::warn!(id, %error, "Comment list unavailable, showing none");
                    self.comments.clear();
                }
                None
            }

            LedgerResponse::CommentAdded { id, signature } => {
                self.pending_submits = self.pending_submits.saturating_sub(1);
                tracing::info!(id, %signature, "Comment sent to program");
                self.last_signature = Some(signature);
                if self.clear_draft_on_submit {
                    self.draft.clear();
                }
                Some(self.fetch_comments())
            }

            LedgerResponse::SubmitFailed { id, error } => {
                self.pending_submits = self.pending_submits.saturating_sub(1);
                tracing::error!(id, %error, "Error sending comment");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::render::View;
    use crate::models::Comment;
    use solana_sdk::pubkey::Pubkey;

    fn connected() -> AppState {
        let mut state = AppState::new(false);
        state.session.connected_address = Some(Pubkey::new_from_array([9; 32]));
        state
    }

    fn type_text(state: &mut AppState, text: &str) {
        state.start_editing();
        text.chars().for_each(|c| state.enter_char(c));
    }

    #[test]
    fn test_empty_submit_issues_nothing() {
        let mut state = connected();
        assert_eq!(state.submit(), None);
        assert_eq!(state.pending_submits, 0);
    }

    #[test]
    fn test_submit_carries_draft_text() {
        let mut state = connected();
        type_text(&mut state, "hello");
        assert!(matches!(
            state.submit(),
            Some(LedgerCommand::AddComment { text, .. }) if text == "hello"
        ));
        assert_eq!(state.pending_submits, 1);
    }

    #[test]
    fn test_submit_while_disconnected_is_ignored() {
        let mut state = AppState::new(false);
        state.draft.text = String::from("hi");
        assert_eq!(state.submit(), None);
    }

    #[test]
    fn test_connect_triggers_single_fetch() {
        let mut state = AppState::new(false);
        let address = Pubkey::new_from_array([4; 32]);

        let follow_up = state.handle_response(LedgerResponse::WalletConnected { address });
        assert!(matches!(follow_up, Some(LedgerCommand::FetchComments { .. })));
        assert_eq!(state.session.connected_address, Some(address));

        // Reconnecting while connected does not refetch
        assert_eq!(state.handle_response(LedgerResponse::WalletConnected { address }), None);
        assert_eq!(state.connect(), None);
    }

    #[test]
    fn test_fetched_comments_render_most_recent_first() {
        let mut state = connected();
        let LedgerCommand::FetchComments { id } = state.fetch_comments() else {
            unreachable!()
        };
        let x = Pubkey::new_from_array([1; 32]);
        let y = Pubkey::new_from_array([2; 32]);
        state.handle_response(LedgerResponse::CommentsFetched {
            id,
            comments: vec![Comment::new("a", 100, x), Comment::new("b", 200, y)],
        });

        let View::Feed(feed) = state.to_render_state().view else {
            panic!("expected feed view");
        };
        let texts: Vec<_> = feed.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a"]);
        assert!(!feed.is_loading);
    }

    #[test]
    fn test_fetch_failure_empties_list() {
        let mut state = connected();
        state.comments = vec![Comment::new("old", 1, Pubkey::default())];
        let LedgerCommand::FetchComments { id } = state.fetch_comments() else {
            unreachable!()
        };
        state.handle_response(LedgerResponse::FetchFailed {
            id,
            error: String::from("account does not exist"),
        });
        assert!(state.comments.is_empty());
        assert_eq!(state.notice, None);
    }

    #[test]
    fn test_stale_fetch_is_ignored() {
        let mut state = connected();
        let LedgerCommand::FetchComments { id: old } = state.fetch_comments() else {
            unreachable!()
        };
        let _newer = state.fetch_comments();
        state.handle_response(LedgerResponse::CommentsFetched {
            id: old,
            comments: vec![Comment::new("stale", 1, Pubkey::default())],
        });
        assert!(state.comments.is_empty());
        assert!(state.pending_fetch_id.is_some());
    }

    #[test]
    fn test_comment_added_refetches_and_keeps_draft() {
        let mut state = connected();
        type_text(&mut state, "hello");
        let Some(LedgerCommand::AddComment { id, .. }) = state.submit() else {
            panic!("expected submit");
        };
        let follow_up = state.handle_response(LedgerResponse::CommentAdded {
            id,
            signature: String::from("sig"),
        });
        assert!(matches!(follow_up, Some(LedgerCommand::FetchComments { .. })));
        assert_eq!(state.draft.text, "hello");
        assert_eq!(state.pending_submits, 0);
    }

    #[test]
    fn test_comment_added_clears_draft_when_configured() {
        let mut state = connected();
        state.clear_draft_on_submit = true;
        type_text(&mut state, "bye");
        let Some(LedgerCommand::AddComment { id, .. }) = state.submit() else {
            panic!("expected submit");
        };
        state.handle_response(LedgerResponse::CommentAdded {
            id,
            signature: String::from("sig"),
        });
        assert!(state.draft.is_empty());
    }

    #[test]
    fn test_submit_failure_leaves_state_alone() {
        let mut state = connected();
        state.comments = vec![Comment::new("kept", 1, Pubkey::default())];
        type_text(&mut state, "oops");
        let Some(LedgerCommand::AddComment { id, .. }) = state.submit() else {
            panic!("expected submit");
        };
        let follow_up = state.handle_response(LedgerResponse::SubmitFailed {
            id,
            error: String::from("rpc down"),
        });
        assert_eq!(follow_up, None);
        assert_eq!(state.draft.text, "oops");
        assert_eq!(state.comments.len(), 1);
        assert_eq!(state.pending_submits, 0);
    }

    #[test]
    fn test_missing_wallet_shows_notice_on_connect_screen() {
        let mut state = AppState::new(false);
        assert_eq!(state.handle_response(LedgerResponse::WalletMissing), None);
        let render = state.to_render_state();
        assert_eq!(render.view, View::Connect);
        assert_eq!(render.notice.as_deref(), Some(NO_WALLET_NOTICE));
    }

    #[test]
    fn test_silent_rejection_is_swallowed() {
        let mut state = AppState::new(false);
        state.handle_response(LedgerResponse::WalletRejected {
            silent: true,
            reason: String::from("not trusted"),
        });
        assert_eq!(state.notice, None);
        assert_eq!(state.to_render_state().view, View::Connect);
    }

    #[test]
    fn test_cursor_editing_handles_multibyte() {
        let mut state = connected();
        type_text(&mut state, "hé");
        state.move_cursor_left();
        state.enter_char('!');
        assert_eq!(state.draft.text, "h!é");
        state.move_cursor_right();
        state.delete_char();
        assert_eq!(state.draft.text, "h!");
    }
}
