//! Error types for map loading and session admission.

use std::path::PathBuf;

use thiserror::Error;

use crate::world::SessionId;

/// Errors raised while building a [`Grid`](crate::Grid) from a map source.
///
/// All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to read map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid number '{token}' on line {line}")]
    InvalidToken { line: usize, token: String },

    #[error("inconsistent row width on line {line}: expected {expected}, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("map has no rows")]
    Empty,
}

/// Reasons a session cannot join the shared world.
///
/// Reported to the requesting client only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("server full: max {max} players")]
    ServerFull { max: usize },

    #[error("session {0} is already registered")]
    DuplicateSession(SessionId),
}
