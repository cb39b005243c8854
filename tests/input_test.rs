use crossterm::event::{KeyCode, KeyEvent};

use terminus::input::{handle_key_event, KeyDecoder};
use terminus::types::PlayerAction;

fn actions(bytes: &[u8]) -> Vec<PlayerAction> {
    let mut decoder = KeyDecoder::new();
    let mut keys: Vec<KeyEvent> = bytes.iter().filter_map(|&b| decoder.push(b)).collect();
    keys.extend(decoder.flush());
    keys.into_iter().filter_map(handle_key_event).collect()
}

#[test]
fn wire_bytes_map_to_actions_in_order() {
    assert_eq!(
        actions(b"w\x1b[Dd \x1bOC"),
        vec![
            PlayerAction::Forward,
            PlayerAction::RotateLeft,
            PlayerAction::StrafeRight,
            PlayerAction::Fire,
            PlayerAction::RotateRight,
        ]
    );
}

#[test]
fn ctrl_c_and_lone_escape_quit() {
    assert_eq!(actions(&[0x03]), vec![PlayerAction::Quit]);
    assert_eq!(actions(&[0x1b]), vec![PlayerAction::Quit]);
}

#[test]
fn unknown_bytes_are_ignored() {
    assert!(actions(b"xyz\x1b[5~").is_empty());
    let mut decoder = KeyDecoder::new();
    assert_eq!(decoder.push(b'q'), Some(KeyEvent::from(KeyCode::Char('q'))));
}
