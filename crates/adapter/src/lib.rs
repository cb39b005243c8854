//! Network adapter: serves the shared world to telnet clients.
//!
//! # Connection flow
//!
//! 1. **Connect**: a client opens a TCP connection (default `127.0.0.1:2323`)
//! 2. **Negotiate**: the server sends `WILL ECHO`, `WILL SUPPRESS-GO-AHEAD`
//!    and `DO NAWS`; the client's NAWS reply sets the viewport
//! 3. **Join**: the session registers with the [`World`](crate::core::World);
//!    a full server answers `server full: max N players` and hangs up
//! 4. **Play**: every tick the session drains keys, moves its player,
//!    renders a frame and writes only the cells that changed
//! 5. **Leave**: `q`, Esc, Ctrl-C or closing the connection deregisters it
//!
//! # Configuration
//!
//! [`ServerConfig`] starts from defaults, then reads the TOML file named by
//! `TERMINUS_CONFIG`, then applies `TERMINUS_*` environment variables:
//!
//! - `TERMINUS_HOST`, `TERMINUS_PORT`: bind address
//! - `TERMINUS_MAX_PLAYERS`: session capacity
//! - `TERMINUS_TICK_HZ`: world and frame rate
//! - `TERMINUS_MAP`: map file (built-in maze when unset)
//! - `TERMINUS_INPUT_QUEUE`: per-session input byte queue
//! - `TERMINUS_AGENTS`: wandering agent count
//!
//! # Testing
//!
//! ```bash
//! telnet 127.0.0.1 2323
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;
pub mod session;

pub use terminus_core as core;
pub use terminus_engine as engine;
pub use terminus_input as input;
pub use terminus_term as term;
pub use terminus_types as types;

pub use runtime::{build_world, spawn_world_ticker, MAX_TICK_DT};
pub use server::{run_server, ConfigError, ServerConfig, CONFIG_ENV};
pub use session::{handle_connection, SessionOptions};
