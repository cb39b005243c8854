//! Dynamic point lights derived from live projectiles.

use crate::types::Vec2;

/// A point light, recomputed every frame; never stored in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec2,
    pub radius: f64,
    pub intensity: f64,
    /// RGB, each channel 0..1.
    pub color: [f64; 3],
}

impl LightSource {
    /// Contribution at `pos`: quadratic falloff to zero at `radius`.
    #[inline]
    pub fn contribution_at(&self, pos: Vec2) -> f64 {
        let distance = pos.distance(self.position);
        if distance > self.radius || self.radius <= 0.0 {
            return 0.0;
        }
        let falloff = 1.0 - distance / self.radius;
        self.intensity * falloff * falloff
    }
}

/// Summed illumination of all `lights` at `pos`, capped at 1.0.
pub fn illumination_at(lights: &[LightSource], pos: Vec2) -> f64 {
    lights
        .iter()
        .map(|l| l.contribution_at(pos))
        .sum::<f64>()
        .min(1.0)
}
