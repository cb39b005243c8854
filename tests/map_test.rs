use std::path::Path;

use terminus::core::{Grid, MapError, DEFAULT_MAZE};

fn map_path(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("maps").join(name)
}

#[test]
fn bundled_maze_matches_builtin() {
    let loaded = Grid::load(map_path("maze.txt")).unwrap();
    let builtin = Grid::default_maze();
    assert_eq!(loaded.width(), DEFAULT_MAZE[0].len());
    assert_eq!(loaded.height(), DEFAULT_MAZE.len());
    for y in 0..builtin.height() as i64 {
        for x in 0..builtin.width() as i64 {
            assert_eq!(loaded.wall_type(x, y), builtin.wall_type(x, y), "cell ({x}, {y})");
        }
    }
}

#[test]
fn bundled_maps_are_enclosed() {
    for name in ["maze.txt", "cave.txt"] {
        let grid = Grid::load(map_path(name)).unwrap();
        let (w, h) = (grid.width() as i64, grid.height() as i64);
        for x in 0..w {
            assert!(grid.is_wall(x, 0) && grid.is_wall(x, h - 1), "{name} open at column {x}");
        }
        for y in 0..h {
            assert!(grid.is_wall(0, y) && grid.is_wall(w - 1, y), "{name} open at row {y}");
        }
        assert!(grid.open_cells().count() > 0);
    }
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let grid = Grid::parse("# header\n\n1 1 1\n1 0 1\n  # indented comment\n1 1 1\n").unwrap();
    assert_eq!((grid.width(), grid.height()), (3, 3));
    assert!(!grid.is_wall(1, 1));
}

#[test]
fn malformed_maps_are_rejected() {
    assert!(matches!(
        Grid::parse("1 1\n1 x\n"),
        Err(MapError::InvalidToken { line: 2, .. })
    ));
    assert!(matches!(
        Grid::parse("1 1 1\n1 1\n"),
        Err(MapError::RaggedRow {
            line: 2,
            expected: 3,
            found: 2
        })
    ));
    assert!(matches!(Grid::parse("# nothing\n"), Err(MapError::Empty)));
    assert!(matches!(
        Grid::load(map_path("missing.txt")),
        Err(MapError::Io { .. })
    ));
}

#[test]
fn out_of_bounds_reads_as_wall() {
    let grid = Grid::parse("0 0\n0 0\n").unwrap();
    assert!(grid.is_wall(-1, 0));
    assert!(grid.is_wall(0, 2));
    assert!(!grid.is_wall(1, 1));
}
