use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// How key presses should be read for the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// A form field or the search bar has focus.
    Text,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    PrevCategory,
    NextCategory,
    Select,
    Back,
    ToggleCategory,
    CommitPreferences,
    StartSearch,
    Retry,
    OpenInBrowser,
    EditProfile,
    ShowHelp,
    HideHelp,
    // Text input actions
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
    NextField,
    PrevField,
    SwitchForm,
    SignOut,
}

pub fn handle_key_event(key: KeyEvent, mode: InputMode) -> Option<AppAction> {
    match mode {
        // Any key closes help
        InputMode::Help => Some(AppAction::HideHelp),
        InputMode::Text => text_action(key),
        InputMode::Normal => normal_action(key),
    }
}

fn text_action(key: KeyEvent) -> Option<AppAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Some(AppAction::SwitchForm),
        (KeyCode::Char('x'), KeyModifiers::CONTROL) => Some(AppAction::SignOut),
        (KeyCode::Enter, _) => Some(AppAction::InputConfirm),
        (KeyCode::Esc, _) => Some(AppAction::InputCancel),
        (KeyCode::Backspace, _) => Some(AppAction::InputBackspace),
        (KeyCode::Tab, _) | (KeyCode::Down, _) => Some(AppAction::NextField),
        (KeyCode::BackTab, _) | (KeyCode::Up, _) => Some(AppAction::PrevField),
        (KeyCode::Char(c), _) => Some(AppAction::InputChar(c)),
        _ => None,
    }
}

fn normal_action(key: KeyEvent) -> Option<AppAction> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(AppAction::PrevCategory),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(AppAction::NextCategory),

        (KeyCode::Enter, _) => Some(AppAction::Select),
        (KeyCode::Esc, _) | (KeyCode::Backspace, _) => Some(AppAction::Back),
        (KeyCode::Char(' '), _) => Some(AppAction::ToggleCategory),
        (KeyCode::Char('c'), _) => Some(AppAction::CommitPreferences),

        (KeyCode::Char('/'), _) => Some(AppAction::StartSearch),
        (KeyCode::Char('r'), _) => Some(AppAction::Retry),
        (KeyCode::Char('o'), _) => Some(AppAction::OpenInBrowser),
        (KeyCode::Char('p'), _) => Some(AppAction::EditProfile),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_letters_are_text_while_typing() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), InputMode::Text),
            Some(AppAction::InputChar('q'))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), InputMode::Normal),
            Some(AppAction::Quit)
        );
    }

    #[test]
    fn test_help_closes_on_any_key() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('x')), InputMode::Help),
            Some(AppAction::HideHelp)
        );
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, InputMode::Text), Some(AppAction::Quit));
        assert_eq!(handle_key_event(ctrl_c, InputMode::Normal), Some(AppAction::Quit));
    }
}
