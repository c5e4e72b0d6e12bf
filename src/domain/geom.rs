/// Grid geometry: positions, facings and the fixed offsets that encode
/// sprite geometry on a character grid.
///
/// A map is laid out in cells of 6 rows × 13 columns. Character cells are
/// roughly twice as tall as they are wide, so a "square" room on screen is
/// asymmetric in grid units, and every offset below reflects that.

use serde::Deserialize;

/// Vertical stride between neighbouring map cells.
pub const CELL_ROWS: i32 = 6;
/// Horizontal stride between neighbouring map cells.
pub const CELL_COLS: i32 = 13;

/// A (row, col) coordinate on the render surface. Signed so that
/// front points left of / above the origin stay representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Deserialize)]
pub struct Pos {
    pub row: i32,
    pub col: i32,
}

impl Pos {
    pub const fn new(row: i32, col: i32) -> Self {
        Pos { row, col }
    }

    #[inline]
    pub fn offset(self, d_row: i32, d_col: i32) -> Pos {
        Pos { row: self.row + d_row, col: self.col + d_col }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Pose name used by movers facing this way.
    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// One full cell step in this direction.
    pub fn step(self) -> (i32, i32) {
        match self {
            Direction::Up => (-CELL_ROWS, 0),
            Direction::Down => (CELL_ROWS, 0),
            Direction::Left => (0, -CELL_COLS),
            Direction::Right => (0, CELL_COLS),
        }
    }

    /// Offset from a mover's anchor to the cell just ahead of it
    /// (the wall slot between this cell and the next one).
    pub fn front_offset(self) -> (i32, i32) {
        match self {
            Direction::Right => (-1, 8),
            Direction::Left => (-1, -5),
            Direction::Up => (-2, -3),
            Direction::Down => (4, -3),
        }
    }
}

/// Row/column travelled per animation frame and the number of frames.
/// Three frames of 2 rows cover a vertical step; three frames of 4 columns
/// get within one column of a horizontal step, the rest is a snap.
pub const VERTICAL_FRAME_STRIDE: i32 = 2;
pub const HORIZONTAL_FRAME_STRIDE: i32 = 4;
pub const ANIMATION_FRAMES: usize = 3;
