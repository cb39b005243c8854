//! Wandering agents: NPCs that drift around the maze and bounce off walls.

use std::f64::consts::TAU;

use rand::Rng;

use crate::grid::Grid;
use crate::types::{
    Vec2, AGENT_BOUNCE_TIMER, AGENT_EDGE_MARGIN, AGENT_SPEED, AGENT_TIMER_MAX, AGENT_TIMER_MIN,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderingAgent {
    pub position: Vec2,
    /// Unit heading.
    pub direction: Vec2,
    pub speed: f64,
    /// Seconds until the next random re-heading.
    pub change_timer: f64,
}

fn random_heading<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.gen::<f64>() * TAU;
    Vec2::new(angle.cos(), angle.sin())
}

fn random_timer<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(AGENT_TIMER_MIN..AGENT_TIMER_MAX)
}

impl WanderingAgent {
    /// An agent at `position` with a random heading and timer.
    pub fn spawn<R: Rng + ?Sized>(position: Vec2, rng: &mut R) -> Self {
        Self {
            position,
            direction: random_heading(rng),
            speed: AGENT_SPEED,
            change_timer: random_timer(rng),
        }
    }

    /// An agent with an explicit heading and timer.
    pub fn with_heading(position: Vec2, direction: Vec2, change_timer: f64) -> Self {
        Self {
            position,
            direction,
            speed: AGENT_SPEED,
            change_timer,
        }
    }

    /// Advance by `dt` seconds.
    ///
    /// Moves along X and Y independently so a diagonal heading slides along a
    /// wall instead of stopping dead. A blocked axis flips that component of
    /// the heading and shortens the timer to [`AGENT_BOUNCE_TIMER`].
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f64, grid: &Grid, rng: &mut R) {
        self.change_timer -= dt;
        if self.change_timer <= 0.0 {
            self.direction = random_heading(rng);
            self.change_timer = random_timer(rng);
        }

        let target = self.position + self.direction.scale(self.speed * dt);

        if grid.is_wall_at(Vec2::new(target.x, self.position.y)) {
            self.direction.x = -self.direction.x;
            self.change_timer = AGENT_BOUNCE_TIMER;
        } else {
            self.position.x = target.x;
        }

        if grid.is_wall_at(Vec2::new(self.position.x, target.y)) {
            self.direction.y = -self.direction.y;
            self.change_timer = AGENT_BOUNCE_TIMER;
        } else {
            self.position.y = target.y;
        }

        let max_x = grid.width() as f64 - AGENT_EDGE_MARGIN;
        let max_y = grid.height() as f64 - AGENT_EDGE_MARGIN;

        if self.position.x < AGENT_EDGE_MARGIN || self.position.x > max_x {
            self.direction.x = -self.direction.x;
        }
        if self.position.y < AGENT_EDGE_MARGIN || self.position.y > max_y {
            self.direction.y = -self.direction.y;
        }

        self.position.x = self.position.x.clamp(AGENT_EDGE_MARGIN, max_x);
        self.position.y = self.position.y.clamp(AGENT_EDGE_MARGIN, max_y);
    }
}
