//! First-person raycasting renderer.
//!
//! Turns a grid, a camera pose and the current actors into a frame of
//! character cells:
//!
//! 1. one DDA ray per column gives wall distance, face and wall tag
//! 2. walls are shaded by tag, face, fog and nearby lights; ceiling and floor
//!    by apparent row distance
//! 3. sprites are projected into camera space, sorted far to near and drawn
//!    with a per-column depth test
//!
//! The renderer only reads the world. All output goes into a
//! [`FrameBuffer`](crate::term::FrameBuffer), whose HUD rows it never touches.

pub mod raycast;
pub mod shading;
pub mod sprite;

pub use terminus_core as core;
pub use terminus_term as term;
pub use terminus_types as types;

pub use raycast::{cast_ray, wall_span, RayHit, Raycaster, WALL_GLYPH};
pub use shading::Side;
pub use sprite::{Actor, ProjectedSprite, SpriteKind, SpriteStyle, SpriteTuning};
