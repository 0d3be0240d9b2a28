//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Wallet
    Connect,

    // Draft editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Comments
    Submit,
    ScrollUp,
    ScrollDown,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Which of the two screens is showing (needed for context-aware key mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Screen {
    #[default]
    Connect,
    Feed,
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    screen: Screen,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match screen {
        Screen::Connect => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('c') | KeyCode::Enter => Some(UiEvent::Connect),
            _ => None,
        },
        Screen::Feed => handle_feed_keys(key, input_mode),
    }
}

/// Handle keys for the comment feed
fn handle_feed_keys(key: KeyEvent, input_mode: InputMode) -> Option<UiEvent> {
    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => Some(UiEvent::Quit),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('e') | KeyCode::Char('i') => Some(UiEvent::StartEditing),
            KeyCode::Char('s') | KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::ScrollUp),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::ScrollDown),
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Enter => Some(UiEvent::Submit),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_connect_screen_keys() {
        let map = |code| key_to_ui_event(press(code), Screen::Connect, InputMode::Normal, false);
        assert_eq!(map(KeyCode::Char('c')), Some(UiEvent::Connect));
        assert_eq!(map(KeyCode::Enter), Some(UiEvent::Connect));
        assert_eq!(map(KeyCode::Char('s')), None);
        assert_eq!(map(KeyCode::Char('q')), Some(UiEvent::Quit));
    }

    #[test]
    fn test_editing_captures_letters() {
        let map = |code| key_to_ui_event(press(code), Screen::Feed, InputMode::Editing, false);
        assert_eq!(map(KeyCode::Char('q')), Some(UiEvent::CharInput('q')));
        assert_eq!(map(KeyCode::Enter), Some(UiEvent::Submit));
        assert_eq!(map(KeyCode::Esc), Some(UiEvent::StopEditing));
    }

    #[test]
    fn test_help_swallows_next_key_and_ctrl_c_quits() {
        assert_eq!(
            key_to_ui_event(press(KeyCode::Char('s')), Screen::Feed, InputMode::Normal, true),
            Some(UiEvent::CloseHelp)
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            key_to_ui_event(ctrl_c, Screen::Feed, InputMode::Editing, false),
            Some(UiEvent::Quit)
        );
    }
}
