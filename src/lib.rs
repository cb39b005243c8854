//! Terminus (workspace facade crate).
//!
//! Re-exports the member crates under one name so the binary, integration
//! tests and benchmarks can use `terminus::{core, engine, ...}` while the
//! implementation lives in dedicated crates under `crates/`.

pub use terminus_adapter as adapter;
pub use terminus_core as core;
pub use terminus_engine as engine;
pub use terminus_input as input;
pub use terminus_term as term;
pub use terminus_types as types;
