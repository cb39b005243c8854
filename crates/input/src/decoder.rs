//! Raw terminal bytes to key events.
//!
//! Remote clients send whatever their terminal produces in raw mode: plain
//! characters, control bytes, and CSI / SS3 escape sequences for the arrow
//! keys. [`KeyDecoder`] is a small state machine that turns that byte stream
//! into `crossterm` [`KeyEvent`]s so the same key map serves local and remote
//! input.
//!
//! Unrecognized sequences are dropped. A lone ESC is ambiguous until the next
//! byte arrives, so it stays pending until [`KeyDecoder::flush`] is called at
//! the end of an input batch.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const ESC: u8 = 0x1b;
const MAX_PARAMS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Ground,
    Escape,
    /// Inside `ESC [`; counts parameter bytes seen so far.
    Csi(usize),
    /// Inside `ESC O`.
    Ss3,
    /// First byte of a multi-byte UTF-8 character collected.
    Utf8 { buf: [u8; 4], len: u8, need: u8 },
}

#[derive(Debug, Default, Clone)]
pub struct KeyDecoder {
    state: State,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a key when one completes.
    pub fn push(&mut self, byte: u8) -> Option<KeyEvent> {
        match self.state {
            State::Ground => self.ground(byte),
            State::Escape => match byte {
                b'[' => {
                    self.state = State::Csi(0);
                    None
                }
                b'O' => {
                    self.state = State::Ss3;
                    None
                }
                ESC => Some(KeyEvent::from(KeyCode::Esc)),
                _ => {
                    // ESC prefix on a plain key is Alt+key.
                    self.state = State::Ground;
                    self.ground(byte).map(|mut key| {
                        key.modifiers |= KeyModifiers::ALT;
                        key
                    })
                }
            },
            State::Csi(n) => {
                if (0x40..=0x7e).contains(&byte) {
                    self.state = State::Ground;
                    if n == 0 {
                        cursor_key(byte)
                    } else {
                        None
                    }
                } else if n >= MAX_PARAMS {
                    self.state = State::Ground;
                    None
                } else {
                    self.state = State::Csi(n + 1);
                    None
                }
            }
            State::Ss3 => {
                self.state = State::Ground;
                cursor_key(byte)
            }
            State::Utf8 { mut buf, len, need } => {
                if byte & 0xc0 != 0x80 {
                    self.state = State::Ground;
                    return self.ground(byte);
                }
                buf[len as usize] = byte;
                let len = len + 1;
                if len < need {
                    self.state = State::Utf8 { buf, len, need };
                    return None;
                }
                self.state = State::Ground;
                std::str::from_utf8(&buf[..len as usize])
                    .ok()
                    .and_then(|s| s.chars().next())
                    .map(|c| KeyEvent::from(KeyCode::Char(c)))
            }
        }
    }

    /// End of an input batch: a pending lone ESC becomes an Esc key.
    pub fn flush(&mut self) -> Option<KeyEvent> {
        let pending = self.state;
        self.state = State::Ground;
        match pending {
            State::Escape => Some(KeyEvent::from(KeyCode::Esc)),
            _ => None,
        }
    }

    fn ground(&mut self, byte: u8) -> Option<KeyEvent> {
        match byte {
            ESC => {
                self.state = State::Escape;
                None
            }
            b'\r' | b'\n' => Some(KeyEvent::from(KeyCode::Enter)),
            b'\t' => Some(KeyEvent::from(KeyCode::Tab)),
            0x7f | 0x08 => Some(KeyEvent::from(KeyCode::Backspace)),
            0x01..=0x1a => {
                let c = (byte - 0x01 + b'a') as char;
                Some(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
            }
            0x20..=0x7e => Some(KeyEvent::from(KeyCode::Char(byte as char))),
            0xc2..=0xf4 => {
                let need = if byte >= 0xf0 {
                    4
                } else if byte >= 0xe0 {
                    3
                } else {
                    2
                };
                let mut buf = [0u8; 4];
                buf[0] = byte;
                self.state = State::Utf8 { buf, len: 1, need };
                None
            }
            _ => None,
        }
    }
}

fn cursor_key(final_byte: u8) -> Option<KeyEvent> {
    let code = match final_byte {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        _ => return None,
    };
    Some(KeyEvent::from(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<KeyEvent> {
        let mut d = KeyDecoder::new();
        let mut out: Vec<KeyEvent> = bytes.iter().filter_map(|&b| d.push(b)).collect();
        out.extend(d.flush());
        out
    }

    #[test]
    fn printable_and_control_bytes() {
        assert_eq!(
            decode(b"w d"),
            vec![
                KeyEvent::from(KeyCode::Char('w')),
                KeyEvent::from(KeyCode::Char(' ')),
                KeyEvent::from(KeyCode::Char('d')),
            ]
        );
        assert_eq!(
            decode(&[0x03]),
            vec![KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)]
        );
    }

    #[test]
    fn arrow_keys_in_csi_and_ss3_form() {
        assert_eq!(
            decode(b"\x1b[A\x1b[D\x1bOC\x1bOB"),
            vec![
                KeyEvent::from(KeyCode::Up),
                KeyEvent::from(KeyCode::Left),
                KeyEvent::from(KeyCode::Right),
                KeyEvent::from(KeyCode::Down),
            ]
        );
    }

    #[test]
    fn lone_escape_needs_flush() {
        let mut d = KeyDecoder::new();
        assert_eq!(d.push(ESC), None);
        assert_eq!(d.flush(), Some(KeyEvent::from(KeyCode::Esc)));
        assert_eq!(d.flush(), None);
    }

    #[test]
    fn unknown_sequences_are_dropped() {
        // Modified arrow (has parameters) and an F-key tilde sequence.
        assert_eq!(decode(b"\x1b[1;5A\x1b[15~w"), vec![KeyEvent::from(KeyCode::Char('w'))]);
    }

    #[test]
    fn sequences_split_across_batches() {
        let mut d = KeyDecoder::new();
        assert_eq!(d.push(ESC), None);
        assert_eq!(d.push(b'['), None);
        assert_eq!(d.push(b'A'), Some(KeyEvent::from(KeyCode::Up)));
    }

    #[test]
    fn escape_prefix_is_alt() {
        assert_eq!(
            decode(b"\x1bx"),
            vec![KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT)]
        );
    }

    #[test]
    fn utf8_characters_are_assembled() {
        assert_eq!(decode("é".as_bytes()), vec![KeyEvent::from(KeyCode::Char('é'))]);
    }
}
