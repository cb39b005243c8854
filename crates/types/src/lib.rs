//! Shared data structures and constants.
//!
//! Pure value types with no external dependencies, usable from the simulation
//! core, the raycaster, the input decoder and the network adapter alike.
//!
//! # Timing
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_HZ` | 30 | World tick and per-session frame rate |
//!
//! # Actors
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `PLAYER_MOVE_SPEED` | 5.0 | Cells per second |
//! | `PLAYER_ROT_SPEED` | 3.0 | Radians per second |
//! | `CAMERA_PLANE_LENGTH` | 0.66 | Encodes a ~60° field of view |
//! | `PROJECTILE_SPEED` | 8.0 | Cells per second |
//! | `PROJECTILE_LIFE` | 3.0 | Seconds |
//! | `AGENT_SPEED` | 1.5 | Cells per second |
//!
//! # Examples
//!
//! ```
//! use terminus_types::{PlayerAction, Vec2};
//!
//! let v = Vec2::new(3.0, 4.0);
//! assert_eq!(v.length(), 5.0);
//!
//! assert_eq!(PlayerAction::from_str("strafeLeft"), Some(PlayerAction::StrafeLeft));
//! ```

pub mod vec2;

pub use vec2::Vec2;

/// World tick and per-session frame rate (30 Hz).
pub const TICK_HZ: u32 = 30;

/// Viewport used when the transport cannot report one.
pub const DEFAULT_VIEWPORT: (u16, u16) = (80, 24);

/// Bottom rows of the display reserved for the HUD.
pub const HUD_ROWS: u16 = 2;

/// Player translation speed in cells per second.
pub const PLAYER_MOVE_SPEED: f64 = 5.0;

/// Player rotation speed in radians per second.
pub const PLAYER_ROT_SPEED: f64 = 3.0;

/// Camera plane magnitude. 0.66 gives roughly a 60° horizontal field of view.
pub const CAMERA_PLANE_LENGTH: f64 = 0.66;

/// Fireball speed in cells per second.
pub const PROJECTILE_SPEED: f64 = 8.0;

/// Fireball lifetime in seconds.
pub const PROJECTILE_LIFE: f64 = 3.0;

/// Wandering agent speed in cells per second (slower than players).
pub const AGENT_SPEED: f64 = 1.5;

/// Distance agents keep from the outer edge of the grid.
pub const AGENT_EDGE_MARGIN: f64 = 0.2;

/// Timer forced after an agent bounces off a wall.
pub const AGENT_BOUNCE_TIMER: f64 = 0.5;

/// Agents re-randomize direction every `[MIN, MAX)` seconds.
pub const AGENT_TIMER_MIN: f64 = 2.0;
pub const AGENT_TIMER_MAX: f64 = 4.0;

/// Actions a connected player can trigger.
///
/// Each action is independent; several may be queued within one tick and are
/// applied in queue order before the frame renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// Move along the view direction.
    Forward,
    /// Move against the view direction.
    Backward,
    /// Move along the left perpendicular of the view direction.
    StrafeLeft,
    /// Move along the right perpendicular of the view direction.
    StrafeRight,
    /// Turn the camera left.
    RotateLeft,
    /// Turn the camera right.
    RotateRight,
    /// Launch a fireball along the view direction.
    Fire,
    /// End the session.
    Quit,
}

impl PlayerAction {
    /// Parse an action from its camelCase name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use terminus_types::PlayerAction;
    ///
    /// assert_eq!(PlayerAction::from_str("forward"), Some(PlayerAction::Forward));
    /// assert_eq!(PlayerAction::from_str("ROTATERIGHT"), Some(PlayerAction::RotateRight));
    /// assert_eq!(PlayerAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "forward" => Some(PlayerAction::Forward),
            "backward" => Some(PlayerAction::Backward),
            "strafeleft" => Some(PlayerAction::StrafeLeft),
            "straferight" => Some(PlayerAction::StrafeRight),
            "rotateleft" => Some(PlayerAction::RotateLeft),
            "rotateright" => Some(PlayerAction::RotateRight),
            "fire" => Some(PlayerAction::Fire),
            "quit" => Some(PlayerAction::Quit),
            _ => None,
        }
    }

    /// camelCase name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAction::Forward => "forward",
            PlayerAction::Backward => "backward",
            PlayerAction::StrafeLeft => "strafeLeft",
            PlayerAction::StrafeRight => "strafeRight",
            PlayerAction::RotateLeft => "rotateLeft",
            PlayerAction::RotateRight => "rotateRight",
            PlayerAction::Fire => "fire",
            PlayerAction::Quit => "quit",
        }
    }
}
