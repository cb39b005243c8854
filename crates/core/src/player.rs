//! Player camera: position, facing and the camera plane that encodes FOV.

use crate::grid::Grid;
use crate::types::{PlayerAction, Vec2, CAMERA_PLANE_LENGTH, PLAYER_MOVE_SPEED, PLAYER_ROT_SPEED};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vec2,
    /// Unit view direction.
    pub direction: Vec2,
    /// Perpendicular to `direction`; its length sets the field of view.
    pub camera_plane: Vec2,
    pub move_speed: f64,
    pub rot_speed: f64,
}

impl Player {
    /// A player at `position` facing `-x`.
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            direction: Vec2::new(-1.0, 0.0),
            camera_plane: Vec2::new(0.0, CAMERA_PLANE_LENGTH),
            move_speed: PLAYER_MOVE_SPEED,
            rot_speed: PLAYER_ROT_SPEED,
        }
    }

    /// A player facing `direction`, with the camera plane rotated to match.
    pub fn facing(position: Vec2, direction: Vec2) -> Self {
        let direction = direction.normalize();
        Self {
            position,
            direction,
            // Same handedness as the default pose: plane = dir rotated -90°.
            camera_plane: Vec2::new(direction.y, -direction.x).scale(CAMERA_PLANE_LENGTH),
            move_speed: PLAYER_MOVE_SPEED,
            rot_speed: PLAYER_ROT_SPEED,
        }
    }

    pub fn plane_length(&self) -> f64 {
        self.camera_plane.length()
    }

    /// Apply one movement/rotation action for a frame of `dt` seconds.
    ///
    /// `Fire` and `Quit` have no effect on the camera and are ignored here.
    pub fn apply(&mut self, action: PlayerAction, dt: f64, grid: &Grid) {
        match action {
            PlayerAction::Forward => self.move_forward(dt, grid),
            PlayerAction::Backward => self.move_backward(dt, grid),
            PlayerAction::StrafeLeft => self.strafe_left(dt, grid),
            PlayerAction::StrafeRight => self.strafe_right(dt, grid),
            PlayerAction::RotateLeft => self.rotate_left(dt),
            PlayerAction::RotateRight => self.rotate_right(dt),
            PlayerAction::Fire | PlayerAction::Quit => {}
        }
    }

    pub fn move_forward(&mut self, dt: f64, grid: &Grid) {
        self.slide(self.direction, dt, grid);
    }

    pub fn move_backward(&mut self, dt: f64, grid: &Grid) {
        self.slide(-self.direction, dt, grid);
    }

    pub fn strafe_left(&mut self, dt: f64, grid: &Grid) {
        self.slide(self.direction.perp(), dt, grid);
    }

    pub fn strafe_right(&mut self, dt: f64, grid: &Grid) {
        self.slide(-self.direction.perp(), dt, grid);
    }

    /// Turn toward the left edge of the rendered view (away from the plane).
    pub fn rotate_left(&mut self, dt: f64) {
        self.rotate(self.rot_speed * dt);
    }

    pub fn rotate_right(&mut self, dt: f64) {
        self.rotate(-self.rot_speed * dt);
    }

    fn rotate(&mut self, angle: f64) {
        self.direction = self.direction.rotate(angle);
        self.camera_plane = self.camera_plane.rotate(angle);
    }

    /// Per-axis move: a blocked axis is dropped so the camera slides along walls.
    fn slide(&mut self, heading: Vec2, dt: f64, grid: &Grid) {
        let target = self.position + heading.scale(self.move_speed * dt);
        if !grid.is_wall_at(Vec2::new(target.x, self.position.y)) {
            self.position.x = target.x;
        }
        if !grid.is_wall_at(Vec2::new(self.position.x, target.y)) {
            self.position.y = target.y;
        }
    }
}
