//! Framebuffer and style types for terminal rendering.
//!
//! The buffer is split into a game area and a HUD strip along the bottom
//! [`HUD_ROWS`] rows. Gameplay writes go through [`FrameBuffer::set`], which
//! refuses anything outside the game area; the HUD is written only through
//! [`FrameBuffer::set_hud`].

use crate::types::HUD_ROWS;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_array(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Minimal per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
}

impl CellStyle {
    /// Foreground and background set to the same color: a solid block.
    pub const fn solid(color: Rgb) -> Self {
        Self {
            fg: color,
            bg: color,
        }
    }

    pub const fn into_cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
        }
    }
}

/// Style of the HUD status row: white on dark blue.
pub const HUD_STYLE: CellStyle = CellStyle {
    fg: Rgb::new(255, 255, 255),
    bg: Rgb::new(0, 0, 100),
};

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled character cells with a reserved HUD strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    game_height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// A `width × height` buffer; the last [`HUD_ROWS`] rows are HUD.
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            game_height: height.saturating_sub(HUD_ROWS),
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Total rows, HUD included.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Rows available to gameplay.
    pub fn game_height(&self) -> u16 {
        self.game_height
    }

    /// Resize the framebuffer.
    ///
    /// This preserves the underlying allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.game_height = height.saturating_sub(HUD_ROWS);
        let len = (width as usize) * (height as usize);
        self.cells.clear();
        self.cells.resize(len, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    /// Write one gameplay cell. Writes into the HUD rows or off-screen are
    /// rejected and return `false`.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if y >= self.game_height {
            return false;
        }
        match self.idx(x, y) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) -> bool {
        self.set(x, y, Cell { ch, style })
    }

    /// Fill the game area; the HUD is left untouched.
    pub fn clear(&mut self, cell: Cell) {
        let end = (self.game_height as usize) * (self.width as usize);
        self.cells[..end].fill(cell);
    }

    /// Replace the HUD status row with `text`, padded or cut to the width.
    ///
    /// The status sits on the first HUD row; the rest of the strip is blank.
    pub fn set_hud(&mut self, text: &str) {
        if self.height <= self.game_height {
            return;
        }
        let w = self.width as usize;
        let row_start = (self.game_height as usize) * w;
        let mut chars = text.chars();
        for cell in &mut self.cells[row_start..row_start + w] {
            *cell = HUD_STYLE.into_cell(chars.next().unwrap_or(' '));
        }
        self.cells[row_start + w..].fill(Cell::default());
    }

    /// The HUD status row as text, trailing padding removed.
    pub fn hud_text(&self) -> String {
        if self.height <= self.game_height {
            return String::new();
        }
        let w = self.width as usize;
        let row_start = (self.game_height as usize) * w;
        let row: String = self.cells[row_start..row_start + w]
            .iter()
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gameplay_writes_into_hud_are_rejected() {
        let mut fb = FrameBuffer::new(4, 5);
        assert_eq!(fb.game_height(), 3);
        let style = CellStyle::default();
        assert!(fb.put_char(0, 2, 'x', style));
        assert!(!fb.put_char(0, 3, 'x', style));
        assert!(!fb.put_char(0, 4, 'x', style));
        assert!(!fb.put_char(4, 0, 'x', style));
        assert_eq!(fb.get(0, 3), Some(Cell::default()));
    }

    #[test]
    fn hud_is_padded_and_styled() {
        let mut fb = FrameBuffer::new(6, 4);
        fb.set_hud("abc");
        assert_eq!(fb.hud_text(), "abc");
        let padded = fb.get(5, 2).unwrap();
        assert_eq!(padded.ch, ' ');
        assert_eq!(padded.style, HUD_STYLE);
        assert_eq!(fb.get(0, 3), Some(Cell::default()));

        fb.set_hud("abcdefghij");
        assert_eq!(fb.hud_text(), "abcdef");
    }

    #[test]
    fn clear_leaves_hud_alone() {
        let mut fb = FrameBuffer::new(3, 4);
        fb.set_hud("hi");
        fb.clear(CellStyle::solid(Rgb::new(1, 2, 3)).into_cell('#'));
        assert_eq!(fb.get(0, 0).unwrap().ch, '#');
        assert_eq!(fb.get(2, 1).unwrap().ch, '#');
        assert_eq!(fb.hud_text(), "hi");
    }

    #[test]
    fn resize_recomputes_game_area() {
        let mut fb = FrameBuffer::new(80, 24);
        fb.resize(40, 10);
        assert_eq!((fb.width(), fb.height(), fb.game_height()), (40, 10, 8));
        assert_eq!(fb.cells().len(), 400);

        fb.resize(10, 1);
        assert_eq!(fb.game_height(), 0);
        fb.set_hud("x");
        assert!(!fb.put_char(0, 0, 'y', CellStyle::default()));
    }
}
