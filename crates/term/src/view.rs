//! Viewport sizing and the HUD status line.

use std::fmt::{self, Write};

use crate::fb::FrameBuffer;
use crate::types::{Vec2, DEFAULT_VIEWPORT, HUD_ROWS};

/// Smallest viewport a session renders into.
pub const MIN_VIEWPORT: (u16, u16) = (10, HUD_ROWS + 4);

/// Largest viewport accepted from a client.
pub const MAX_VIEWPORT: (u16, u16) = (400, 200);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1)
    }
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Viewport from a client-reported size.
    ///
    /// A zero dimension means "unknown" and falls back to the default;
    /// anything else is clamped into the supported range.
    pub fn from_client(width: u16, height: u16) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        Self {
            width: width.clamp(MIN_VIEWPORT.0, MAX_VIEWPORT.0),
            height: height.clamp(MIN_VIEWPORT.1, MAX_VIEWPORT.1),
        }
    }

    /// Rows left for the 3D view after the HUD.
    pub fn game_height(&self) -> u16 {
        self.height.saturating_sub(HUD_ROWS)
    }
}

/// Counters shown on the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStatus {
    pub players: usize,
    pub max_players: usize,
    pub projectiles: usize,
    pub agents: usize,
    pub position: Vec2,
}

impl fmt::Display for HudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Players: {}/{} | Projectiles: {} | Agents: {} | Pos: ({:.1}, {:.1})",
            self.players,
            self.max_players,
            self.projectiles,
            self.agents,
            self.position.x,
            self.position.y
        )
    }
}

/// Renders the HUD into a framebuffer through a reusable line buffer.
#[derive(Debug, Default)]
pub struct HudView {
    line: String,
}

impl HudView {
    pub fn new() -> Self {
        Self {
            line: String::with_capacity(128),
        }
    }

    pub fn render_into(&mut self, status: &HudStatus, fb: &mut FrameBuffer) {
        self.line.clear();
        // Writing into a String cannot fail.
        let _ = write!(self.line, "{status}");
        fb.set_hud(&self.line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_falls_back_to_default() {
        assert_eq!(Viewport::from_client(0, 50), Viewport::new(80, 24));
        assert_eq!(Viewport::from_client(120, 0), Viewport::new(80, 24));
    }

    #[test]
    fn client_size_is_clamped() {
        assert_eq!(Viewport::from_client(2, 2), Viewport::new(10, 6));
        assert_eq!(Viewport::from_client(1000, 1000), Viewport::new(400, 200));
        assert_eq!(Viewport::from_client(100, 30).game_height(), 28);
    }

    #[test]
    fn hud_line_format() {
        let status = HudStatus {
            players: 2,
            max_players: 8,
            projectiles: 3,
            agents: 5,
            position: Vec2::new(1.54, 12.0),
        };
        assert_eq!(
            status.to_string(),
            "Players: 2/8 | Projectiles: 3 | Agents: 5 | Pos: (1.5, 12.0)"
        );

        let mut fb = FrameBuffer::new(80, 24);
        HudView::new().render_into(&status, &mut fb);
        assert_eq!(fb.hud_text(), status.to_string());
    }
}
