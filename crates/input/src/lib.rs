//! Remote terminal input.
//!
//! Raw bytes from a client terminal are decoded into `crossterm` key events by
//! [`KeyDecoder`], then mapped onto [`crate::types::PlayerAction`]s.

pub mod decoder;
pub mod map;

pub use terminus_types as types;

pub use decoder::KeyDecoder;
pub use map::{handle_key_event, should_quit};
