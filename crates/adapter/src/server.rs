//! TCP server and its configuration.
//!
//! Accepts telnet connections and hands each one to its own session task.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::core::{SessionId, World, WorldConfig};
use crate::engine::SpriteTuning;
use crate::session::{handle_connection, SessionOptions};
use crate::types::TICK_HZ;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "TERMINUS_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid setting {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_players: usize,
    pub tick_hz: u32,
    /// Map file; the built-in maze when unset.
    pub map: Option<PathBuf>,
    /// Per-session input byte queue capacity.
    pub input_queue: usize,
    pub max_projectiles: usize,
    /// Wandering agent count; derived from the map size when unset.
    pub agents: Option<usize>,
    pub seed: Option<u64>,
    pub sprites: SpriteTuning,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 2323,
            max_players: 8,
            tick_hz: TICK_HZ,
            map: None,
            input_queue: 64,
            max_projectiles: 256,
            agents: None,
            seed: None,
            sprites: SpriteTuning::default(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

impl ServerConfig {
    /// Defaults, then the file named by `TERMINUS_CONFIG`, then `TERMINUS_*`
    /// environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Self::default(),
        };
        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `TERMINUS_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("TERMINUS_HOST") {
            self.host = host.trim().to_string();
        }
        if let Some(v) = lookup("TERMINUS_PORT") {
            self.port = parse_env("TERMINUS_PORT", v)?;
        }
        if let Some(v) = lookup("TERMINUS_MAX_PLAYERS") {
            self.max_players = parse_env("TERMINUS_MAX_PLAYERS", v)?;
        }
        if let Some(v) = lookup("TERMINUS_TICK_HZ") {
            self.tick_hz = parse_env("TERMINUS_TICK_HZ", v)?;
        }
        if let Some(v) = lookup("TERMINUS_MAP") {
            let v = v.trim();
            self.map = (!v.is_empty()).then(|| PathBuf::from(v));
        }
        if let Some(v) = lookup("TERMINUS_INPUT_QUEUE") {
            self.input_queue = parse_env("TERMINUS_INPUT_QUEUE", v)?;
        }
        if let Some(v) = lookup("TERMINUS_AGENTS") {
            self.agents = Some(parse_env("TERMINUS_AGENTS", v)?);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_hz == 0 || self.tick_hz > 1000 {
            return Err(ConfigError::Invalid {
                field: "tick_hz",
                reason: "must be between 1 and 1000",
            });
        }
        if self.max_players == 0 {
            return Err(ConfigError::Invalid {
                field: "max_players",
                reason: "must be at least 1",
            });
        }
        if self.input_queue == 0 {
            return Err(ConfigError::Invalid {
                field: "input_queue",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            max_players: self.max_players,
            max_projectiles: self.max_projectiles,
            agent_count: self.agents,
            seed: self.seed,
        }
    }
}

/// Accept connections until the listener fails.
///
/// `ready_tx` receives the bound address once listening, which lets callers
/// bind port 0 and learn the real port.
pub async fn run_server(
    config: ServerConfig,
    world: Arc<World>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    config.validate()?;

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    let bound = listener.local_addr()?;
    info!(addr = %bound, max_players = config.max_players, "server listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let options = Arc::new(SessionOptions::from(&config));
    let mut next_id = 0u64;

    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        if let Err(e) = socket.set_nodelay(true) {
            debug!(%peer, error = %e, "set_nodelay failed");
        }

        next_id += 1;
        let id = SessionId(next_id);
        let world = Arc::clone(&world);
        let options = Arc::clone(&options);
        tokio::spawn(async move {
            debug!(session = %id, %peer, "connection accepted");
            if let Err(e) = handle_connection(socket, peer, id, world, options).await {
                warn!(session = %id, %peer, error = %e, "session ended with error");
            }
            debug!(session = %id, %peer, "connection closed");
        });
    }
}
