//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
    /// Refresh every polling widget now.
    Refresh,
}

/// Maps a key press to an action.
///
/// `Esc`, `q` and `Ctrl-C` quit; `r` refreshes.
pub fn handle_key(key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('r') => KeyAction::Refresh,
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(handle_key(key(KeyCode::Esc)), KeyAction::Quit);
        assert_eq!(handle_key(key(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(
            handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            KeyAction::Quit
        );
    }

    #[test]
    fn test_other_keys() {
        assert_eq!(handle_key(key(KeyCode::Char('c'))), KeyAction::None);
        assert_eq!(handle_key(key(KeyCode::Char('r'))), KeyAction::Refresh);
        assert_eq!(handle_key(key(KeyCode::Enter)), KeyAction::None);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert_eq!(handle_key(release), KeyAction::None);
    }
}
