//! Wall, ceiling and floor color shading.
//!
//! Every function here is pure: base color in, shaded color out.

use crate::core::{illumination_at, LightSource};
use crate::term::Rgb;
use crate::types::Vec2;

/// Which kind of grid face a ray hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Crossed an X boundary (vertical face).
    X,
    /// Crossed a Y boundary (horizontal face).
    Y,
}

pub const CEILING_BASE: Rgb = Rgb::new(80, 100, 140);
pub const FLOOR_BASE: Rgb = Rgb::new(60, 40, 20);

const WALL_FOG_DISTANCE: f64 = 8.0;
const WALL_FOG_MIN: f64 = 0.2;
const HORIZONTAL_FACE_FACTOR: f64 = 0.7;
const LIGHT_WEIGHT: f64 = 0.8;

const SURFACE_FOG_DISTANCE: f64 = 10.0;
const SURFACE_FOG_MIN: f64 = 0.1;

/// Base color for a wall tag; unknown tags are gray.
pub fn wall_base_color(tag: u8) -> Rgb {
    match tag {
        1 => Rgb::new(180, 32, 32),
        2 => Rgb::new(32, 180, 32),
        3 => Rgb::new(32, 32, 180),
        4 => Rgb::new(180, 180, 32),
        5 => Rgb::new(180, 32, 180),
        6 => Rgb::new(32, 180, 180),
        7 => Rgb::new(180, 100, 32),
        8 => Rgb::new(100, 32, 180),
        _ => Rgb::new(120, 120, 120),
    }
}

#[inline]
fn fog(distance: f64, max_distance: f64, min_factor: f64) -> f64 {
    (1.0 - distance / max_distance).max(min_factor)
}

/// Scale each channel by `factor`, truncating toward zero.
#[inline]
pub fn scale_rgb(c: Rgb, factor: f64) -> Rgb {
    Rgb::new(
        (c.r as f64 * factor) as u8,
        (c.g as f64 * factor) as u8,
        (c.b as f64 * factor) as u8,
    )
}

/// Shaded color of a wall slice.
///
/// Horizontal faces are darkened, distance fades toward a floor of 0.2, and
/// nearby lights add back up to 0.8 of full brightness.
pub fn wall_color(tag: u8, side: Side, distance: f64, hit: Vec2, lights: &[LightSource]) -> Rgb {
    let side_factor = match side {
        Side::X => 1.0,
        Side::Y => HORIZONTAL_FACE_FACTOR,
    };
    let light = illumination_at(lights, hit);
    let factor = (side_factor * (fog(distance, WALL_FOG_DISTANCE, WALL_FOG_MIN) + light * LIGHT_WEIGHT))
        .min(1.0);
    scale_rgb(wall_base_color(tag), factor)
}

pub fn ceiling_color(distance: f64) -> Rgb {
    scale_rgb(
        CEILING_BASE,
        fog(distance, SURFACE_FOG_DISTANCE, SURFACE_FOG_MIN),
    )
}

pub fn floor_color(distance: f64) -> Rgb {
    scale_rgb(FLOOR_BASE, fog(distance, SURFACE_FOG_DISTANCE, SURFACE_FOG_MIN))
}

/// Apparent distance of the ceiling or floor at screen row `y`.
///
/// Uses `h / (2·|h/2 - y| - 1)` with integer `h/2`. When that is not
/// positive, `fallback` (the column's wall distance) is used instead.
pub fn row_distance(game_height: usize, y: usize, fallback: f64) -> f64 {
    let half = (game_height / 2) as f64;
    let offset = (half - y as f64).abs();
    let d = game_height as f64 / (2.0 * offset - 1.0);
    if d > 0.0 {
        d
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_wall_is_full_brightness() {
        assert_eq!(
            wall_color(1, Side::X, 0.0, Vec2::ZERO, &[]),
            Rgb::new(180, 32, 32)
        );
    }

    #[test]
    fn horizontal_faces_are_darker() {
        let x = wall_color(2, Side::X, 0.0, Vec2::ZERO, &[]);
        let y = wall_color(2, Side::Y, 0.0, Vec2::ZERO, &[]);
        assert_eq!(x.g, 180);
        assert!((125..=126).contains(&y.g));
        assert_eq!(y.r, 22);
    }

    #[test]
    fn far_walls_bottom_out_at_fog_floor() {
        let c = wall_color(9, Side::X, 100.0, Vec2::ZERO, &[]);
        assert_eq!(c, Rgb::new(24, 24, 24));
    }

    #[test]
    fn lights_brighten_distant_walls() {
        let light = LightSource {
            position: Vec2::new(5.0, 5.0),
            radius: 2.0,
            intensity: 0.8,
            color: [1.0, 0.6, 0.2],
        };
        let dark = wall_color(3, Side::X, 8.0, Vec2::new(5.0, 5.0), &[]);
        let lit = wall_color(3, Side::X, 8.0, Vec2::new(5.0, 5.0), &[light]);
        assert!(lit.b > dark.b);
        // 0.2 fog floor + 0.8 * 0.8 light
        assert_eq!(lit.b, (180.0 * (0.2 + 0.64)) as u8);
    }

    #[test]
    fn surfaces_fade_to_ten_percent() {
        assert_eq!(ceiling_color(0.0), CEILING_BASE);
        assert_eq!(ceiling_color(50.0), Rgb::new(8, 10, 14));
        assert_eq!(floor_color(5.0), Rgb::new(30, 20, 10));
    }

    #[test]
    fn row_distance_grows_toward_horizon() {
        // h = 20, half = 10: row 0 is 20 / 19, row 9 is 20 / 1.
        assert!((row_distance(20, 0, 3.0) - 20.0 / 19.0).abs() < 1e-12);
        assert!((row_distance(20, 9, 3.0) - 20.0).abs() < 1e-12);
        assert!((row_distance(20, 19, 3.0) - 20.0 / 17.0).abs() < 1e-12);
        // The horizon row itself has no positive distance.
        assert_eq!(row_distance(20, 10, 3.0), 3.0);
    }
}
