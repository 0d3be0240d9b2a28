//! App state - pure data structure with no I/O logic

use crate::messages::render::{FeedView, RenderState, View};
use crate::messages::ui_events::InputMode;
use crate::models::{Comment, Draft, Session};

/// Main application state - pure data, no I/O
#[derive(Debug, Default)]
pub struct AppState {
    // The three view cells
    pub session: Session,
    pub comments: Vec<Comment>,
    pub draft: Draft,

    // UI state
    pub input_mode: InputMode,
    pub feed_scroll: u16,
    pub show_help: bool,
    pub notice: Option<String>,

    // Requests in flight
    pub next_request_id: u64,
    pub pending_fetch_id: Option<u64>,
    pub pending_submits: usize,
    pub last_signature: Option<String>,

    // Product decision, see config `clear_draft_on_submit`
    pub clear_draft_on_submit: bool,
}

impl AppState {
    pub fn new(clear_draft_on_submit: bool) -> Self {
        AppState {
            next_request_id: 1,
            clear_draft_on_submit,
            ..Default::default()
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let view = match &self.session.connected_address {
            None => View::Connect,
            Some(address) => View::Feed(FeedView {
                address: address.to_string(),
                draft: self.draft.text.clone(),
                cursor_position: self.draft.cursor,
                comments: self.comments.iter().rev().cloned().collect(),
                feed_scroll: self.feed_scroll,
                is_loading: self.pending_fetch_id.is_some(),
                is_submitting: self.pending_submits > 0,
                last_signature: self.last_signature.clone(),
            }),
        };

        RenderState {
            view,
            input_mode: self.input_mode,
            notice: self.notice.clone(),
            show_help: self.show_help,
        }
    }
}
