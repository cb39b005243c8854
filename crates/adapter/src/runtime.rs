//! World construction and the shared simulation ticker.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::info;

use crate::core::{Grid, World};
use crate::server::ServerConfig;

/// Largest step fed to one world tick, in seconds. Stalls longer than this
/// slow the simulation down instead of teleporting actors through walls.
pub const MAX_TICK_DT: f64 = 0.25;

/// Load the configured map (or the built-in maze) and build the world.
pub fn build_world(config: &ServerConfig) -> anyhow::Result<Arc<World>> {
    let grid = match &config.map {
        Some(path) => Grid::load(path)
            .with_context(|| format!("failed to load map {}", path.display()))?,
        None => Grid::default_maze(),
    };
    info!(
        width = grid.width(),
        height = grid.height(),
        map = ?config.map,
        "map loaded"
    );
    Ok(Arc::new(World::new(Arc::new(grid), config.world_config())))
}

/// Advance `world` at `hz` ticks per second until the task is aborted.
///
/// Each tick uses the measured time since the previous one, capped at
/// [`MAX_TICK_DT`].
pub fn spawn_world_ticker(world: Arc<World>, hz: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs_f64(1.0 / hz.max(1) as f64));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(hz, "world ticker started");

        let mut last = Instant::now();
        loop {
            ticker.tick().await;
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f64().min(MAX_TICK_DT);
            last = now;
            world.tick(dt);
        }
    })
}
