//! Terminal display layer.
//!
//! Frames are drawn into a plain framebuffer of styled cells, then encoded as
//! escape sequences for a remote terminal. No device I/O happens here.
//!
//! - [`fb`]: cells, styles, and the framebuffer with its reserved HUD rows
//! - [`view`]: viewport sizing and the HUD status line
//! - [`renderer`]: full and diff escape-code encoders

pub mod fb;
pub mod renderer;
pub mod view;

pub use terminus_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, HUD_STYLE};
pub use renderer::{encode_diff_into, encode_full_into, FrameEncoder};
pub use view::{HudStatus, HudView, Viewport, MAX_VIEWPORT, MIN_VIEWPORT};
