//! Core simulation: the grid, the actors that move through it, and the shared
//! world that coordinates every connected session.
//!
//! Nothing here touches the terminal or the network. Every type is plain data
//! plus update rules, so the whole simulation can be driven from tests with a
//! seeded RNG.
//!
//! # Module Structure
//!
//! - [`grid`]: immutable wall grid, map parsing, the built-in maze
//! - [`player`]: per-session camera (position, direction, camera plane)
//! - [`projectile`]: fireballs and the light they cast
//! - [`agent`]: wandering NPCs that bounce off walls
//! - [`lighting`]: point lights and summed illumination
//! - [`world`]: shared state behind per-collection locks, sessions
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use terminus_core::{Grid, SessionId, World, WorldConfig};
//! use terminus_core::types::PlayerAction;
//!
//! let world = Arc::new(World::new(Arc::new(Grid::default_maze()), WorldConfig::default()));
//! let session = world.join(SessionId(1)).unwrap();
//!
//! session.apply(PlayerAction::Fire, 1.0 / 30.0);
//!
//! let snap = world.snapshot(session.id());
//! assert_eq!(snap.player_count, 1);
//! assert_eq!(snap.projectiles.len(), 1);
//!
//! world.tick(1.0 / 30.0);
//! ```

pub mod agent;
pub mod error;
pub mod grid;
pub mod lighting;
pub mod player;
pub mod projectile;
pub mod world;

pub use terminus_types as types;

pub use agent::WanderingAgent;
pub use error::{JoinError, MapError};
pub use grid::{Grid, DEFAULT_MAZE, OUT_OF_BOUNDS_WALL};
pub use lighting::{illumination_at, LightSource};
pub use player::Player;
pub use projectile::{Projectile, FIREBALL_LIGHT_COLOR};
pub use world::{Session, SessionId, SessionState, World, WorldConfig, WorldSnapshot};
