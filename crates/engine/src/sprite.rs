//! Billboard sprites: camera-space projection, per-kind styling and
//! depth-tested compositing.

use serde::{Deserialize, Serialize};

use crate::core::Player;
use crate::term::{CellStyle, FrameBuffer, Rgb};
use crate::types::Vec2;

/// Sprites closer than this along the view axis are culled.
pub const NEAR_PLANE: f64 = 0.1;

/// Slack added to the depth buffer before a sprite column loses to a wall.
pub const DEPTH_BIAS: f64 = 0.1;

/// Every kind of thing drawn as a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteKind {
    Fireball,
    Player,
    Agent,
}

/// A non-wall object to composite into the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub position: Vec2,
    pub kind: SpriteKind,
}

impl Actor {
    pub fn new(position: Vec2, kind: SpriteKind) -> Self {
        Self { position, kind }
    }
}

/// Look of one sprite kind.
///
/// Height is `gameHeight / forward * scale`, rounded, at least `min_size`,
/// and at most half the game area. Width is `height * width_ratio`. Each cell
/// gets `intensity = 1 - sqrt(dy² + x_falloff·dx²)` from the sprite center and
/// is drawn only above `threshold`, with color `base * intensity * gain`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteStyle {
    pub glyph: char,
    pub color: [u8; 3],
    pub scale: f64,
    pub width_ratio: f64,
    pub min_size: usize,
    pub gain: f64,
    pub threshold: f64,
    pub x_falloff: f64,
}

impl SpriteStyle {
    pub const FIREBALL: Self = Self {
        glyph: '●',
        color: [255, 150, 0],
        scale: 0.5,
        width_ratio: 1.0 / 3.0,
        min_size: 1,
        gain: 1.2,
        threshold: 0.1,
        x_falloff: 1.0,
    };

    pub const PLAYER: Self = Self {
        glyph: '@',
        color: [0, 255, 0],
        scale: 1.2,
        width_ratio: 0.75,
        min_size: 4,
        gain: 1.5,
        threshold: 0.05,
        x_falloff: 0.5,
    };

    pub const AGENT: Self = Self {
        glyph: '&',
        color: [200, 80, 255],
        scale: 1.0,
        width_ratio: 0.6,
        min_size: 3,
        gain: 1.4,
        threshold: 0.05,
        x_falloff: 0.7,
    };
}

/// Per-kind sprite styles, loadable from configuration.
///
/// Every kind sizes with the same rule in [`sprite_extent`]: the projected
/// height is rounded to the nearest cell, fireballs included. Tune `scale`
/// to get smaller fireballs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteTuning {
    pub fireball: SpriteStyle,
    pub player: SpriteStyle,
    pub agent: SpriteStyle,
}

impl Default for SpriteTuning {
    fn default() -> Self {
        Self {
            fireball: SpriteStyle::FIREBALL,
            player: SpriteStyle::PLAYER,
            agent: SpriteStyle::AGENT,
        }
    }
}

impl SpriteTuning {
    pub fn style(&self, kind: SpriteKind) -> &SpriteStyle {
        match kind {
            SpriteKind::Fireball => &self.fireball,
            SpriteKind::Player => &self.player,
            SpriteKind::Agent => &self.agent,
        }
    }
}

/// A sprite already transformed into camera space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedSprite {
    pub kind: SpriteKind,
    /// Distance along the view direction.
    pub forward: f64,
    /// Center column on screen.
    pub screen_x: i64,
}

/// Transform `position` into camera space and onto the screen.
///
/// Returns `None` for sprites at or behind the near plane, or whose center
/// falls outside `[0, width)`.
pub fn project(player: &Player, position: Vec2, width: usize) -> Option<(f64, i64)> {
    let rel = position - player.position;
    let forward = rel.dot(player.direction);
    if forward <= NEAR_PLANE {
        return None;
    }

    let plane_len = player.plane_length();
    if plane_len <= 0.0 {
        return None;
    }
    let lateral = rel.dot(player.camera_plane) / plane_len;
    let screen_x = (width as f64 / 2.0 * (1.0 + lateral / forward / plane_len)) as i64;
    if screen_x < 0 || screen_x >= width as i64 {
        return None;
    }
    Some((forward, screen_x))
}

/// Sprite height and width in cells for a given distance.
pub fn sprite_extent(style: &SpriteStyle, forward: f64, game_height: usize) -> (i64, i64) {
    let h = game_height as i64;
    let raw = (game_height as f64 / forward * style.scale + 0.5) as i64;
    let size = raw.max(style.min_size as i64).max(1).min(h / 2);
    // Small epsilon so ratios like 1/3 land on the exact integer quotient.
    let width = ((size as f64 * style.width_ratio + 1e-9) as i64).max(1);
    (size, width)
}

/// Composite one projected sprite, column by column against `z_buffer`.
pub fn draw_sprite(
    sprite: &ProjectedSprite,
    style: &SpriteStyle,
    z_buffer: &[f64],
    fb: &mut FrameBuffer,
) {
    let h = fb.game_height() as i64;
    let w = fb.width() as i64;
    let (size, width) = sprite_extent(style, sprite.forward, h as usize);
    if size <= 0 {
        return;
    }

    let start_y = (h / 2 - size / 2).max(0);
    let end_y = (h / 2 + size / 2).min(h - 1);
    let center_y = start_y + (end_y - start_y) / 2;
    let half_w = width / 2;
    let y_norm = (size / 2 + 1) as f64;
    let x_norm = (width / 2 + 1) as f64;
    let base = Rgb::from_array(style.color);

    for x_offset in -half_w..=half_w {
        let draw_x = sprite.screen_x + x_offset;
        if draw_x < 0 || draw_x >= w {
            continue;
        }
        let depth = z_buffer.get(draw_x as usize).copied().unwrap_or(f64::INFINITY);
        if sprite.forward >= depth + DEPTH_BIAS {
            continue;
        }

        let dx = (x_offset.abs() as f64) / x_norm;
        for y in start_y..=end_y {
            let dy = ((y - center_y).abs() as f64) / y_norm;
            let intensity = 1.0 - (dy * dy + style.x_falloff * dx * dx).sqrt();
            if intensity <= style.threshold {
                continue;
            }
            let color = glow(base, intensity * style.gain);
            fb.put_char(draw_x as u16, y as u16, style.glyph, CellStyle::solid(color));
        }
    }
}

#[inline]
fn glow(c: Rgb, factor: f64) -> Rgb {
    let ch = |v: u8| (v as f64 * factor).min(255.0) as u8;
    Rgb::new(ch(c.r), ch(c.g), ch(c.b))
}
