//! Column raycaster.
//!
//! For each screen column a ray is marched through the grid with DDA until it
//! enters a wall cell. The perpendicular hit distance sizes the wall slice,
//! drives fog and lighting, and is kept in a per-column depth buffer that the
//! sprite pass tests against.

use crate::core::{Grid, LightSource, Player, Projectile};
use crate::shading::{ceiling_color, floor_color, row_distance, wall_color, Side};
use crate::sprite::{draw_sprite, project, Actor, ProjectedSprite, SpriteKind, SpriteTuning};
use crate::term::{CellStyle, FrameBuffer};
use crate::types::Vec2;

/// Delta distance used when a ray component is exactly zero.
const PARALLEL_DELTA: f64 = 1e30;

pub const WALL_GLYPH: char = '█';

/// Result of marching one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub map_x: i64,
    pub map_y: i64,
    pub side: Side,
    /// Hit distance projected onto the view direction.
    pub perp_dist: f64,
    /// Grid cells stepped before the hit.
    pub steps: usize,
}

impl RayHit {
    /// World-space point where the ray met the wall face.
    pub fn hit_point(&self, origin: Vec2, ray_dir: Vec2) -> Vec2 {
        match self.side {
            Side::X => Vec2::new(self.map_x as f64, origin.y + self.perp_dist * ray_dir.y),
            Side::Y => Vec2::new(origin.x + self.perp_dist * ray_dir.x, self.map_y as f64),
        }
    }
}

/// March a ray from `origin` along `ray_dir` until it enters a wall cell.
///
/// Always terminates: everything outside the grid is wall.
pub fn cast_ray(grid: &Grid, origin: Vec2, ray_dir: Vec2) -> RayHit {
    let mut map_x = origin.x.floor() as i64;
    let mut map_y = origin.y.floor() as i64;

    let delta_x = if ray_dir.x == 0.0 {
        PARALLEL_DELTA
    } else {
        (1.0 / ray_dir.x).abs()
    };
    let delta_y = if ray_dir.y == 0.0 {
        PARALLEL_DELTA
    } else {
        (1.0 / ray_dir.y).abs()
    };

    let (step_x, mut side_x) = if ray_dir.x < 0.0 {
        (-1, (origin.x - map_x as f64) * delta_x)
    } else {
        (1, (map_x as f64 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if ray_dir.y < 0.0 {
        (-1, (origin.y - map_y as f64) * delta_y)
    } else {
        (1, (map_y as f64 + 1.0 - origin.y) * delta_y)
    };

    let mut side;
    let mut steps = 0usize;
    loop {
        if side_x < side_y {
            side_x += delta_x;
            map_x += step_x;
            side = Side::X;
        } else {
            side_y += delta_y;
            map_y += step_y;
            side = Side::Y;
        }
        steps += 1;
        if grid.is_wall(map_x, map_y) {
            break;
        }
    }

    let perp_dist = match side {
        Side::X => (map_x as f64 - origin.x + (1 - step_x) as f64 / 2.0) / ray_dir.x,
        Side::Y => (map_y as f64 - origin.y + (1 - step_y) as f64 / 2.0) / ray_dir.y,
    };

    RayHit {
        map_x,
        map_y,
        side,
        perp_dist,
        steps,
    }
}

/// Inclusive vertical span of a wall slice, clipped to the game area.
pub fn wall_span(game_height: usize, perp_dist: f64) -> (usize, usize) {
    let h = game_height as i64;
    let line_height = (h as f64 / perp_dist) as i64;
    let start = (-line_height / 2 + h / 2).max(0);
    let end = (line_height / 2 + h / 2).min(h - 1);
    (start as usize, end.max(0) as usize)
}

/// Per-session renderer state.
///
/// Holds the depth buffer and sprite scratch list between frames so
/// rendering does not allocate once the viewport size is stable.
#[derive(Debug, Clone, Default)]
pub struct Raycaster {
    z_buffer: Vec<f64>,
    sprites: Vec<ProjectedSprite>,
    tuning: SpriteTuning,
}

impl Raycaster {
    pub fn new(tuning: SpriteTuning) -> Self {
        Self {
            z_buffer: Vec::new(),
            sprites: Vec::new(),
            tuning,
        }
    }

    pub fn tuning(&self) -> &SpriteTuning {
        &self.tuning
    }

    /// Wall distance per column from the last frame.
    pub fn z_buffer(&self) -> &[f64] {
        &self.z_buffer
    }

    /// Draw one frame from `player`'s viewpoint into the game area of `fb`.
    ///
    /// Every game-area cell is overwritten. Neither `player` nor `grid` is
    /// modified and nothing outside `fb`'s game area is touched.
    pub fn render(
        &mut self,
        player: &Player,
        grid: &Grid,
        lights: &[LightSource],
        projectiles: &[Projectile],
        actors: &[Actor],
        fb: &mut FrameBuffer,
    ) {
        let width = fb.width() as usize;
        let game_height = fb.game_height() as usize;

        self.z_buffer.clear();
        self.z_buffer.resize(width, f64::INFINITY);
        if width == 0 || game_height == 0 {
            return;
        }

        for x in 0..width {
            let camera_x = 2.0 * x as f64 / width as f64 - 1.0;
            let ray_dir = player.direction + player.camera_plane.scale(camera_x);
            let hit = cast_ray(grid, player.position, ray_dir);
            self.z_buffer[x] = hit.perp_dist;

            let (draw_start, draw_end) = wall_span(game_height, hit.perp_dist);
            let color = wall_color(
                grid.wall_type(hit.map_x, hit.map_y),
                hit.side,
                hit.perp_dist,
                hit.hit_point(player.position, ray_dir),
                lights,
            );

            let col = x as u16;
            let wall = CellStyle::solid(color);
            for y in draw_start..=draw_end {
                fb.put_char(col, y as u16, WALL_GLYPH, wall);
            }
            for y in 0..draw_start {
                let c = ceiling_color(row_distance(game_height, y, hit.perp_dist));
                fb.put_char(col, y as u16, ' ', CellStyle::solid(c));
            }
            for y in draw_end + 1..game_height {
                let c = floor_color(row_distance(game_height, y, hit.perp_dist));
                fb.put_char(col, y as u16, ' ', CellStyle::solid(c));
            }
        }

        self.composite_sprites(player, projectiles, actors, fb);
    }

    fn composite_sprites(
        &mut self,
        player: &Player,
        projectiles: &[Projectile],
        actors: &[Actor],
        fb: &mut FrameBuffer,
    ) {
        let width = fb.width() as usize;
        self.sprites.clear();

        let fireballs = projectiles
            .iter()
            .filter(|p| p.active)
            .map(|p| Actor::new(p.position, SpriteKind::Fireball));
        for actor in fireballs.chain(actors.iter().copied()) {
            if let Some((forward, screen_x)) = project(player, actor.position, width) {
                self.sprites.push(ProjectedSprite {
                    kind: actor.kind,
                    forward,
                    screen_x,
                });
            }
        }

        // Painter's order: farthest first. Stable, so equal depths keep
        // their input order.
        self.sprites.sort_by(|a, b| b.forward.total_cmp(&a.forward));

        for sprite in &self.sprites {
            draw_sprite(sprite, self.tuning.style(sprite.kind), &self.z_buffer, fb);
        }
    }
}
