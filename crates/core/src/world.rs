//! Shared world and session coordinator.
//!
//! [`World`] owns the one grid, the projectile set, the agent set and the
//! registry of connected sessions. Every collection sits behind its own
//! reader-writer lock and is only reachable through `tick`, `join`, `leave`,
//! `fire` and `snapshot_into`, so callers never hold a lock across a frame.
//!
//! Each [`Session`] owns its player camera. The registry keeps a shared handle
//! to it so other sessions can see where that player stands.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::agent::WanderingAgent;
use crate::error::JoinError;
use crate::grid::Grid;
use crate::lighting::LightSource;
use crate::player::Player;
use crate::projectile::Projectile;
use crate::types::{PlayerAction, Vec2};

/// Identifier the transport assigns to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Session lifecycle: `Connecting → Active → Disconnected` (terminal).
///
/// `Connecting` belongs to the transport: it covers the handshake before
/// [`World::join`]. A joined [`Session`] starts `Active` and reads as
/// `Disconnected` once it is deregistered, whether through
/// [`Session::disconnect`], drop, or a direct [`World::leave`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Active,
    Disconnected,
}

/// World construction parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldConfig {
    pub max_players: usize,
    /// Live projectile cap; further fire actions are dropped.
    pub max_projectiles: usize,
    /// Overrides the size-based default agent population.
    pub agent_count: Option<usize>,
    /// Fixed RNG seed for reproducible spawns.
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_players: 8,
            max_projectiles: 256,
            agent_count: None,
            seed: None,
        }
    }
}

/// Copy-on-read view of the shared state for rendering one frame.
///
/// Reuse one snapshot per session; [`World::snapshot_into`] clears and refills
/// it without giving up the allocations.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    pub projectiles: Vec<Projectile>,
    pub lights: Vec<LightSource>,
    pub agents: Vec<WanderingAgent>,
    /// Positions of every player except the viewer.
    pub players: Vec<Vec2>,
    /// Registered sessions, viewer included.
    pub player_count: usize,
}

impl WorldSnapshot {
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.lights.clear();
        self.agents.clear();
        self.players.clear();
        self.player_count = 0;
    }
}

struct SessionEntry {
    player: Arc<RwLock<Player>>,
    connected_since: Instant,
}

pub struct World {
    grid: Arc<Grid>,
    config: WorldConfig,
    projectiles: RwLock<Vec<Projectile>>,
    agents: RwLock<Vec<WanderingAgent>>,
    sessions: RwLock<BTreeMap<SessionId, SessionEntry>>,
    rng: Mutex<StdRng>,
}

impl World {
    /// Build the world and populate its wandering agents.
    ///
    /// Without an explicit count, small maps get 3 agents and maps wider or
    /// taller than 15 cells get 5.
    pub fn new(grid: Arc<Grid>, config: WorldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let world = Self {
            grid,
            config,
            projectiles: RwLock::new(Vec::new()),
            agents: RwLock::new(Vec::new()),
            sessions: RwLock::new(BTreeMap::new()),
            rng: Mutex::new(rng),
        };

        let count = world.config.agent_count.unwrap_or_else(|| {
            if world.grid.width() > 15 || world.grid.height() > 15 {
                5
            } else {
                3
            }
        });
        {
            let mut agents = world.agents.write();
            let mut rng = world.rng.lock();
            for _ in 0..count {
                let spawn = random_spawn_point(&world.grid, &mut *rng);
                agents.push(WanderingAgent::spawn(spawn, &mut *rng));
            }
        }
        debug!(agents = count, "world populated");

        world
    }

    pub fn grid(&self) -> &Arc<Grid> {
        &self.grid
    }

    pub fn max_players(&self) -> usize {
        self.config.max_players
    }

    pub fn player_count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.read().len()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_registered(&self, id: SessionId) -> bool {
        self.sessions.read().contains_key(&id)
    }

    /// When `id` joined, if it is still registered.
    pub fn connected_since(&self, id: SessionId) -> Option<Instant> {
        self.sessions.read().get(&id).map(|e| e.connected_since)
    }

    /// Register a session and spawn its player at a random open cell.
    ///
    /// The capacity check and the insert happen under one write lock, so
    /// concurrent joins can never overshoot `max_players`.
    pub fn join(self: &Arc<Self>, id: SessionId) -> Result<Session, JoinError> {
        let mut sessions = self.sessions.write();
        if sessions.len() >= self.config.max_players {
            return Err(JoinError::ServerFull {
                max: self.config.max_players,
            });
        }
        if sessions.contains_key(&id) {
            return Err(JoinError::DuplicateSession(id));
        }

        let spawn = random_spawn_point(&self.grid, &mut *self.rng.lock());
        let player = Arc::new(RwLock::new(Player::new(spawn)));
        let connected_since = Instant::now();
        sessions.insert(
            id,
            SessionEntry {
                player: Arc::clone(&player),
                connected_since,
            },
        );
        let players = sessions.len();
        drop(sessions);

        info!(session = %id, players, x = spawn.x, y = spawn.y, "session joined");
        Ok(Session {
            id,
            player,
            connected_since,
            state: SessionState::Active,
            world: Arc::clone(self),
        })
    }

    /// Deregister a session. Idempotent; returns whether it was registered.
    pub fn leave(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().remove(&id).is_some();
        if removed {
            info!(session = %id, "session left");
        }
        removed
    }

    /// Launch a fireball. Dropped when the projectile cap is reached.
    pub fn fire(&self, origin: Vec2, direction: Vec2) -> bool {
        let mut projectiles = self.projectiles.write();
        if projectiles.len() >= self.config.max_projectiles {
            return false;
        }
        projectiles.push(Projectile::fireball(origin, direction));
        true
    }

    /// Advance every projectile and agent once by `dt` seconds.
    ///
    /// Inactive projectiles are purged before the write lock is released, so
    /// readers only ever see live ones.
    pub fn tick(&self, dt: f64) {
        {
            let mut projectiles = self.projectiles.write();
            for p in projectiles.iter_mut() {
                p.update(dt, &self.grid);
            }
            projectiles.retain(|p| p.active);
        }

        {
            let mut agents = self.agents.write();
            let mut rng = self.rng.lock();
            for agent in agents.iter_mut() {
                agent.update(dt, &self.grid, &mut *rng);
            }
        }
    }

    /// Copy the state `viewer` needs to render a frame into `out`.
    pub fn snapshot_into(&self, viewer: SessionId, out: &mut WorldSnapshot) {
        out.clear();

        {
            let projectiles = self.projectiles.read();
            out.projectiles
                .extend(projectiles.iter().filter(|p| p.active).copied());
        }
        out.lights
            .extend(out.projectiles.iter().filter_map(Projectile::light));

        {
            let agents = self.agents.read();
            out.agents.extend(agents.iter().copied());
        }

        {
            let sessions = self.sessions.read();
            out.player_count = sessions.len();
            for (id, entry) in sessions.iter() {
                if *id != viewer {
                    out.players.push(entry.player.read().position);
                }
            }
        }
    }

    /// Allocating convenience wrapper over [`World::snapshot_into`].
    pub fn snapshot(&self, viewer: SessionId) -> WorldSnapshot {
        let mut snap = WorldSnapshot::default();
        self.snapshot_into(viewer, &mut snap);
        snap
    }
}

/// Uniform over all open cells, jittered within `[0.2, 0.8)` of the cell.
fn random_spawn_point<R: Rng + ?Sized>(grid: &Grid, rng: &mut R) -> Vec2 {
    let open = grid.open_cells().count();
    if open == 0 {
        return Vec2::new(1.5, 1.5);
    }
    let Some((x, y)) = grid.open_cells().nth(rng.gen_range(0..open)) else {
        return Vec2::new(1.5, 1.5);
    };
    Vec2::new(
        x as f64 + 0.2 + rng.gen::<f64>() * 0.6,
        y as f64 + 0.2 + rng.gen::<f64>() * 0.6,
    )
}

/// A joined session and the player camera it exclusively drives.
///
/// Dropping the session deregisters it from the world.
pub struct Session {
    id: SessionId,
    player: Arc<RwLock<Player>>,
    connected_since: Instant,
    state: SessionState,
    world: Arc<World>,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        if self.state == SessionState::Active && !self.world.is_registered(self.id) {
            return SessionState::Disconnected;
        }
        self.state
    }

    pub fn connected_since(&self) -> Instant {
        self.connected_since
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Copy of the current camera pose.
    pub fn player(&self) -> Player {
        *self.player.read()
    }

    /// Apply one input action for a frame of `dt` seconds.
    pub fn apply(&self, action: PlayerAction, dt: f64) {
        match action {
            PlayerAction::Fire => {
                let p = self.player();
                self.world.fire(p.position, p.direction);
            }
            PlayerAction::Quit => {}
            _ => self.player.write().apply(action, dt, &self.world.grid),
        }
    }

    /// Leave the world now rather than on drop.
    pub fn disconnect(mut self) -> bool {
        self.deregister()
    }

    fn deregister(&mut self) -> bool {
        if self.state == SessionState::Disconnected {
            return false;
        }
        self.state = SessionState::Disconnected;
        self.world.leave(self.id)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.deregister();
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("players", &self.player_count())
            .field("projectiles", &self.projectile_count())
            .field("agents", &self.agent_count())
            .finish()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(max_players: usize) -> Arc<World> {
        let config = WorldConfig {
            max_players,
            agent_count: Some(2),
            seed: Some(42),
            ..WorldConfig::default()
        };
        Arc::new(World::new(Arc::new(Grid::default_maze()), config))
    }

    #[test]
    fn join_spawns_on_open_cell() {
        let w = world(4);
        for i in 0..4 {
            let s = w.join(SessionId(i)).unwrap();
            let p = s.player();
            assert!(!w.grid().is_wall_at(p.position));
            let fx = p.position.x.fract();
            let fy = p.position.y.fract();
            assert!((0.2..0.8).contains(&fx), "x jitter {fx}");
            assert!((0.2..0.8).contains(&fy), "y jitter {fy}");
            assert_eq!(s.state(), SessionState::Active);
        }
    }

    #[test]
    fn join_rejects_when_full() {
        let w = world(1);
        let _a = w.join(SessionId(1)).unwrap();
        assert_eq!(
            w.join(SessionId(2)).unwrap_err(),
            JoinError::ServerFull { max: 1 }
        );
    }

    #[test]
    fn join_rejects_duplicate_ids() {
        let w = world(4);
        let _a = w.join(SessionId(1)).unwrap();
        assert_eq!(
            w.join(SessionId(1)).unwrap_err(),
            JoinError::DuplicateSession(SessionId(1))
        );
    }

    #[test]
    fn leave_is_idempotent() {
        let w = world(2);
        let s = w.join(SessionId(7)).unwrap();
        assert!(w.leave(SessionId(7)));
        assert!(!w.leave(SessionId(7)));
        // Dropping after an explicit leave must not panic or double count.
        drop(s);
        assert_eq!(w.player_count(), 0);
    }

    #[test]
    fn leave_moves_live_session_to_disconnected() {
        let w = world(2);
        let s = w.join(SessionId(4)).unwrap();
        assert_eq!(s.state(), SessionState::Active);

        assert!(w.leave(SessionId(4)));
        assert_eq!(s.state(), SessionState::Disconnected);
        assert!(!s.disconnect());
        assert_eq!(w.player_count(), 0);
    }

    #[test]
    fn world_debug_summarizes_state() {
        let w = world(2);
        let _s = w.join(SessionId(1)).unwrap();
        let text = format!("{w:?}");
        assert!(text.starts_with("World {"));
        assert!(text.contains("players: 1"));
        assert!(text.contains("agents: 2"));
    }

    #[test]
    fn dropping_session_frees_its_slot() {
        let w = world(1);
        let s = w.join(SessionId(1)).unwrap();
        assert!(w.join(SessionId(2)).is_err());
        drop(s);
        assert!(!w.is_registered(SessionId(1)));
        assert!(w.join(SessionId(2)).is_ok());
    }

    #[test]
    fn disconnect_reports_registration_once() {
        let w = world(2);
        let s = w.join(SessionId(3)).unwrap();
        assert!(w.connected_since(SessionId(3)).is_some());
        assert!(s.disconnect());
        assert_eq!(w.connected_since(SessionId(3)), None);
    }

    #[test]
    fn snapshot_excludes_viewer() {
        let w = world(3);
        let a = w.join(SessionId(1)).unwrap();
        let b = w.join(SessionId(2)).unwrap();
        let snap = w.snapshot(a.id());
        assert_eq!(snap.player_count, 2);
        assert_eq!(snap.players, vec![b.player().position]);
        assert_eq!(snap.agents.len(), 2);
    }

    #[test]
    fn fire_adds_projectile_with_light() {
        let w = world(2);
        let s = w.join(SessionId(1)).unwrap();
        s.apply(PlayerAction::Fire, 1.0 / 30.0);
        let snap = w.snapshot(s.id());
        assert_eq!(snap.projectiles.len(), 1);
        assert_eq!(snap.lights.len(), 1);
        assert_eq!(snap.projectiles[0].position, s.player().position);
    }

    #[test]
    fn fire_respects_projectile_cap() {
        let config = WorldConfig {
            max_projectiles: 2,
            agent_count: Some(0),
            seed: Some(1),
            ..WorldConfig::default()
        };
        let w = World::new(Arc::new(Grid::default_maze()), config);
        assert!(w.fire(Vec2::new(1.5, 1.5), Vec2::new(0.0, 1.0)));
        assert!(w.fire(Vec2::new(1.5, 1.5), Vec2::new(0.0, 1.0)));
        assert!(!w.fire(Vec2::new(1.5, 1.5), Vec2::new(0.0, 1.0)));
        assert_eq!(w.projectile_count(), 2);
    }

    #[test]
    fn default_agent_population_depends_on_map_size() {
        let big = World::new(Arc::new(Grid::default_maze()), WorldConfig::default());
        assert_eq!(big.agent_count(), 5);

        let small_grid = Grid::parse("1 1 1\n1 0 1\n1 1 1\n").unwrap();
        let small = World::new(Arc::new(small_grid), WorldConfig::default());
        assert_eq!(small.agent_count(), 3);
    }

    #[test]
    fn tick_keeps_agents_inside_grid() {
        let w = world(1);
        for _ in 0..300 {
            w.tick(1.0 / 30.0);
        }
        let snap = w.snapshot(SessionId(0));
        let (gw, gh) = (w.grid().width() as f64, w.grid().height() as f64);
        for a in snap.agents {
            assert!(a.position.x >= 0.2 && a.position.x <= gw - 0.2);
            assert!(a.position.y >= 0.2 && a.position.y <= gh - 0.2);
        }
    }
}
