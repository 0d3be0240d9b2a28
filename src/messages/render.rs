//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, Screen};
use crate::models::Comment;

/// Everything the comment feed screen shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedView {
    pub address: String,
    pub draft: String,
    pub cursor_position: usize,
    /// Most recent first
    pub comments: Vec<Comment>,
    pub feed_scroll: u16,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub last_signature: Option<String>,
}

/// The two mutually exclusive screens
#[derive(Debug, Clone, Default, PartialEq)]
pub enum View {
    #[default]
    Connect,
    Feed(FeedView),
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderState {
    pub view: View,
    pub input_mode: InputMode,
    /// Informational message, e.g. no wallet installed
    pub notice: Option<String>,
    pub show_help: bool,
}

impl RenderState {
    pub fn screen(&self) -> Screen {
        match self.view {
            View::Connect => Screen::Connect,
            View::Feed(_) => Screen::Feed,
        }
    }
}
