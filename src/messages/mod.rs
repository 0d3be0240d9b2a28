//! Message types for inter-layer communication in the actor-based architecture.
//!
//! This module defines all messages that flow between the UI, App, and Ledger layers.

pub mod ui_events;
pub mod ledger;
pub mod render;

pub use ui_events::UiEvent;
pub use ledger::{LedgerCommand, LedgerResponse};
pub use render::{FeedView, RenderState, View};
