//! World grid - the immutable 2D map every ray and actor collides against.
//!
//! Cells are stored in a flat row-major vector. `0` is open floor; any other
//! value is a wall whose tag only selects its color. Coordinates outside the
//! grid behave as wall type `1`, so a ray can never escape the map.

use std::path::Path;

use crate::error::MapError;
use crate::types::Vec2;

/// Wall tag reported for any coordinate outside the grid.
pub const OUT_OF_BOUNDS_WALL: u8 = 1;

/// The default 20-wide maze with a few colored wall runs.
pub const DEFAULT_MAZE: [[u8; 20]; 21] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 1],
    [1, 0, 1, 0, 1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 1, 2, 1, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 1],
    [1, 1, 1, 0, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 0, 2, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 2, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 2, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 1, 3, 0, 1],
    [1, 1, 1, 1, 1, 0, 1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 3, 1, 1],
    [1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 3, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 1, 1, 3, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 1, 4, 0, 0, 4, 1],
    [1, 0, 1, 0, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 4, 1, 1, 4, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Immutable-after-load 2D cell grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major cells (y * width + x).
    cells: Vec<u8>,
}

impl Grid {
    /// Build a grid from rows of wall tags.
    ///
    /// Every row must have the same non-zero width.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MapError::RaggedRow {
                    line: i + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// The built-in maze used when no map file is configured.
    pub fn default_maze() -> Self {
        Self {
            width: DEFAULT_MAZE[0].len(),
            height: DEFAULT_MAZE.len(),
            cells: DEFAULT_MAZE.iter().flatten().copied().collect(),
        }
    }

    /// Parse a textual map.
    ///
    /// Rows are whitespace-separated small non-negative integers. Blank lines
    /// and lines starting with `#` are skipped. Line numbers in errors refer
    /// to the source text.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut cells = Vec::new();
        let mut width = 0usize;
        let mut height = 0usize;

        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let start = cells.len();
            for token in line.split_whitespace() {
                let value = token.parse::<u8>().map_err(|_| MapError::InvalidToken {
                    line: i + 1,
                    token: token.to_string(),
                })?;
                cells.push(value);
            }

            let row_width = cells.len() - start;
            if height == 0 {
                width = row_width;
            } else if row_width != width {
                return Err(MapError::RaggedRow {
                    line: i + 1,
                    expected: width,
                    found: row_width,
                });
            }
            height += 1;
        }

        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Read and parse a map file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize) * self.width + (x as usize))
    }

    /// Wall tag at `(x, y)`; `0` for open floor, [`OUT_OF_BOUNDS_WALL`] outside.
    #[inline]
    pub fn wall_type(&self, x: i64, y: i64) -> u8 {
        self.index(x, y)
            .map(|i| self.cells[i])
            .unwrap_or(OUT_OF_BOUNDS_WALL)
    }

    #[inline]
    pub fn is_wall(&self, x: i64, y: i64) -> bool {
        self.wall_type(x, y) != 0
    }

    /// Whether the cell containing `pos` is a wall.
    #[inline]
    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        self.is_wall(pos.x.floor() as i64, pos.y.floor() as i64)
    }

    /// All passable cells, row by row.
    pub fn open_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == 0)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::default_maze()
    }
}
