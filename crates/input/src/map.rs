//! Key mapping from terminal events to player actions.

use crate::types::PlayerAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to player actions.
///
/// Keys held with Ctrl or Alt map to nothing except the quit chord.
pub fn handle_key_event(key: KeyEvent) -> Option<PlayerAction> {
    if should_quit(key) {
        return Some(PlayerAction::Quit);
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        // Movement
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(PlayerAction::Forward),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(PlayerAction::Backward),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(PlayerAction::StrafeLeft),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(PlayerAction::StrafeRight),

        // Turning
        KeyCode::Left | KeyCode::Char(',') | KeyCode::Char('<') => Some(PlayerAction::RotateLeft),
        KeyCode::Right | KeyCode::Char('.') | KeyCode::Char('>') => Some(PlayerAction::RotateRight),

        KeyCode::Char(' ') | KeyCode::Char('f') | KeyCode::Char('F') => Some(PlayerAction::Fire),

        _ => None,
    }
}

/// Check if key should end the session.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Up)),
            Some(PlayerAction::Forward)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('S'))),
            Some(PlayerAction::Backward)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('a'))),
            Some(PlayerAction::StrafeLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('d'))),
            Some(PlayerAction::StrafeRight)
        );
    }

    #[test]
    fn test_turn_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(PlayerAction::RotateLeft)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('.'))),
            Some(PlayerAction::RotateRight)
        );
    }

    #[test]
    fn test_fire_key() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(PlayerAction::Fire)
        );
    }

    #[test]
    fn test_modified_keys_are_ignored() {
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::ALT)),
            None
        );
        assert_eq!(
            handle_key_event(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::ALT)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('Q'))),
            Some(PlayerAction::Quit)
        );
    }
}
