//! Fireballs: short-lived projectiles that double as moving point lights.

use crate::grid::Grid;
use crate::lighting::LightSource;
use crate::types::{Vec2, PROJECTILE_LIFE, PROJECTILE_SPEED};

/// Color of the light a fireball casts (orange-red, RGB 0..1).
pub const FIREBALL_LIGHT_COLOR: [f64; 3] = [1.0, 0.6, 0.2];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    /// Unit travel direction.
    pub direction: Vec2,
    pub speed: f64,
    /// Seconds left before it burns out.
    pub remaining_life: f64,
    pub max_life: f64,
    pub active: bool,
}

impl Projectile {
    /// A fresh fireball launched from `origin` along `direction`.
    pub fn fireball(origin: Vec2, direction: Vec2) -> Self {
        Self {
            position: origin,
            direction: direction.normalize(),
            speed: PROJECTILE_SPEED,
            remaining_life: PROJECTILE_LIFE,
            max_life: PROJECTILE_LIFE,
            active: true,
        }
    }

    /// Advance by `dt` seconds.
    ///
    /// Burns out once life reaches zero. A step whose destination cell is a
    /// wall deactivates the projectile without moving it.
    pub fn update(&mut self, dt: f64, grid: &Grid) {
        if !self.active {
            return;
        }

        self.remaining_life -= dt;
        if self.remaining_life <= 0.0 {
            self.active = false;
            return;
        }

        let next = self.position + self.direction.scale(self.speed * dt);
        if grid.is_wall_at(next) {
            self.active = false;
            return;
        }
        self.position = next;
    }

    fn life_ratio(&self) -> f64 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.remaining_life / self.max_life).clamp(0.0, 1.0)
    }

    /// Light radius: 3.5 when fresh, shrinking to 2.0 at burn-out.
    pub fn light_radius(&self) -> f64 {
        if !self.active {
            return 0.0;
        }
        2.0 + 1.5 * self.life_ratio()
    }

    /// Light intensity: 0.8 when fresh, fading linearly to 0.
    pub fn light_intensity(&self) -> f64 {
        if !self.active {
            return 0.0;
        }
        0.8 * self.life_ratio()
    }

    /// The point light this projectile casts, if it is live.
    pub fn light(&self) -> Option<LightSource> {
        let radius = self.light_radius();
        if radius <= 0.0 {
            return None;
        }
        Some(LightSource {
            position: self.position,
            radius,
            intensity: self.light_intensity(),
            color: FIREBALL_LIGHT_COLOR,
        })
    }
}
