//! Telnet transport framing.
//!
//! Clients connect with a plain telnet client. On connect the server asks the
//! client to let it echo (`WILL ECHO`), to stop sending go-aheads
//! (`WILL SUPPRESS-GO-AHEAD`), and to report its window size (`DO NAWS`).
//! Together these put the client terminal in character-at-a-time mode.
//!
//! Inbound, [`TelnetParser`] strips every IAC command and subnegotiation from
//! the byte stream, passing through plain data bytes and surfacing NAWS window
//! sizes (RFC 1073) as [`TelnetEvent::WindowSize`].

use arrayvec::ArrayVec;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SGA: u8 = 3;
pub const OPT_NAWS: u8 = 31;

/// Option negotiation sent as soon as a client connects.
pub const NEGOTIATION: [u8; 9] = [
    IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SGA, IAC, DO, OPT_NAWS,
];

/// Longest subnegotiation payload kept; NAWS needs 5 bytes.
const SUB_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelnetEvent {
    Data(u8),
    WindowSize { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Data,
    Iac,
    /// Saw `IAC WILL|WONT|DO|DONT`; the option byte follows.
    Option,
    Sub,
    SubIac,
}

/// Incremental telnet stream parser.
#[derive(Debug, Default)]
pub struct TelnetParser {
    state: State,
    sub: ArrayVec<u8, SUB_CAPACITY>,
}

impl TelnetParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte from the wire.
    pub fn push(&mut self, byte: u8) -> Option<TelnetEvent> {
        match self.state {
            State::Data => {
                if byte == IAC {
                    self.state = State::Iac;
                    None
                } else {
                    Some(TelnetEvent::Data(byte))
                }
            }
            State::Iac => match byte {
                IAC => {
                    self.state = State::Data;
                    Some(TelnetEvent::Data(IAC))
                }
                WILL | WONT | DO | DONT => {
                    self.state = State::Option;
                    None
                }
                SB => {
                    self.sub.clear();
                    self.state = State::Sub;
                    None
                }
                _ => {
                    self.state = State::Data;
                    None
                }
            },
            State::Option => {
                self.state = State::Data;
                None
            }
            State::Sub => {
                if byte == IAC {
                    self.state = State::SubIac;
                } else {
                    let _ = self.sub.try_push(byte);
                }
                None
            }
            State::SubIac => match byte {
                SE => {
                    self.state = State::Data;
                    self.finish_sub()
                }
                IAC => {
                    let _ = self.sub.try_push(IAC);
                    self.state = State::Sub;
                    None
                }
                _ => {
                    // Malformed: abandon the subnegotiation.
                    self.sub.clear();
                    self.state = State::Data;
                    None
                }
            },
        }
    }

    fn finish_sub(&mut self) -> Option<TelnetEvent> {
        let event = match self.sub.as_slice() {
            [OPT_NAWS, w_hi, w_lo, h_hi, h_lo] => Some(TelnetEvent::WindowSize {
                width: u16::from_be_bytes([*w_hi, *w_lo]),
                height: u16::from_be_bytes([*h_hi, *h_lo]),
            }),
            _ => None,
        };
        self.sub.clear();
        event
    }
}
