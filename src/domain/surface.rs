/// Render surface: a character grid that is both what the terminal shows
/// and what collision reads.
///
/// ## Read-the-screen collision
///
/// There is no separate occupancy map. Whether a mover may enter a cell is
/// decided by the glyph currently drawn there:
///   - `' '`            → free
///   - `'█'` / `'▜'`    → wall (the two reserved wall glyphs)
///   - anything else    → some entity's art, blocking unless the registry
///                        says an open door/hatch lives at that cell
///
/// The simulation only ever reads through [`CellProbe`]; everything else
/// about the grid (colors, drawing helpers) stays here.

use super::geom::Pos;

/// The blank glyph. Only this counts as free space.
pub const BLANK: char = ' ';

/// Solid wall fill.
pub const WALL: char = '█';
/// Wall corner, treated exactly like [`WALL`] by collision.
pub const WALL_CORNER: char = '▜';

const ROUTE_VERTICAL: char = '┊';
const ROUTE_HORIZONTAL: char = '┈';

/// Is this one of the two reserved wall glyphs?
#[inline]
pub fn is_wall_glyph(ch: char) -> bool {
    ch == WALL || ch == WALL_CORNER
}

/// Foreground/background pairs. The terminal front end maps these to
/// concrete colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Palette {
    #[default]
    WhiteBlack,
    BlackWhite,
    RedBlack,
    YellowBlack,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub ch: char,
    pub color: Palette,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: BLANK, color: Palette::WhiteBlack };
}

/// Orientation of a drawn patrol route guide.
#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// Narrow read-only view used by the simulation for hit-testing.
pub trait CellProbe {
    fn glyph_at(&self, pos: Pos) -> char;

    #[inline]
    fn is_blank(&self, pos: Pos) -> bool {
        self.glyph_at(pos) == BLANK
    }
}

/// A `(height + 1) × (width + 1)` grid of cells.
#[derive(Clone, Debug)]
pub struct Surface {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Surface {
    /// `height`/`width` are the nominal map size; one spare row and column
    /// are allocated so a box drawn at the nominal extent still fits.
    pub fn new(height: usize, width: usize) -> Self {
        let rows = height + 1;
        let cols = width + 1;
        Surface { height: rows, width: cols, cells: vec![Cell::BLANK; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.height
    }

    pub fn cols(&self) -> usize {
        self.width
    }

    #[inline]
    fn index(&self, pos: Pos) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.col as usize);
        if r < self.height && c < self.width {
            Some(r * self.width + c)
        } else {
            None
        }
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        match self.index(pos) {
            Some(i) => self.cells[i],
            None => Cell { ch: WALL, color: Palette::WhiteBlack },
        }
    }

    pub fn put(&mut self, pos: Pos, ch: char, color: Palette) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = Cell { ch, color };
        }
    }

    /// Write each line of `lines` at `(pos.row + i, pos.col)`. Clipped.
    pub fn write_glyphs<S: AsRef<str>>(&mut self, pos: Pos, color: Palette, lines: &[S]) {
        for (i, line) in lines.iter().enumerate() {
            for (j, ch) in line.as_ref().chars().enumerate() {
                self.put(pos.offset(i as i32, j as i32), ch, color);
            }
        }
    }

    /// Fill a `height × width` box starting at `pos`.
    pub fn fill(&mut self, pos: Pos, height: i32, width: i32, ch: char, color: Palette) {
        for r in 0..height {
            for c in 0..width {
                self.put(pos.offset(r, c), ch, color);
            }
        }
    }

    /// Blank the whole grid.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// One-cell frame around a `height × width` area, corners in `'▜'`.
    pub fn outline(&mut self, pos: Pos, height: i32, width: i32, color: Palette) {
        let (bottom, right) = (height - 1, width - 1);
        for c in 0..width {
            self.put(pos.offset(0, c), WALL, color);
            self.put(pos.offset(bottom, c), WALL, color);
        }
        for r in 0..height {
            self.put(pos.offset(r, 0), WALL, color);
            self.put(pos.offset(r, right), WALL, color);
        }
        for (r, c) in [(0, 0), (0, right), (bottom, 0), (bottom, right)] {
            self.put(pos.offset(r, c), WALL_CORNER, color);
        }
    }

    /// Dotted guide showing where a guard walks.
    pub fn route(&mut self, pos: Pos, height: i32, width: i32, orientation: Orientation) {
        let ch = match orientation {
            Orientation::Vertical => ROUTE_VERTICAL,
            Orientation::Horizontal => ROUTE_HORIZONTAL,
        };
        self.fill(pos, height, width, ch, Palette::RedBlack);
    }

    /// Render rows as plain strings (tests and debugging).
    #[allow(dead_code)]
    pub fn row_string(&self, row: usize) -> String {
        (0..self.width).map(|c| self.cells[row * self.width + c].ch).collect()
    }
}

impl CellProbe for Surface {
    /// Out-of-range cells read as wall.
    fn glyph_at(&self, pos: Pos) -> char {
        self.cell(pos).ch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read_back() {
        let mut s = Surface::new(4, 10);
        s.write_glyphs(Pos::new(1, 2), Palette::RedBlack, &["ab", "cd"]);
        assert_eq!(s.glyph_at(Pos::new(1, 2)), 'a');
        assert_eq!(s.glyph_at(Pos::new(2, 3)), 'd');
        assert_eq!(s.cell(Pos::new(2, 3)).color, Palette::RedBlack);
        assert!(s.is_blank(Pos::new(0, 0)));
    }

    #[test]
    fn writes_are_clipped() {
        let mut s = Surface::new(2, 2);
        s.write_glyphs(Pos::new(2, 1), Palette::WhiteBlack, &["xyz", "uvw"]);
        assert_eq!(s.glyph_at(Pos::new(2, 1)), 'x');
        assert_eq!(s.glyph_at(Pos::new(2, 2)), 'y');
    }

    #[test]
    fn out_of_bounds_reads_as_wall() {
        let s = Surface::new(3, 3);
        assert!(is_wall_glyph(s.glyph_at(Pos::new(-1, 0))));
        assert!(is_wall_glyph(s.glyph_at(Pos::new(0, 99))));
    }

    #[test]
    fn outline_uses_both_wall_glyphs() {
        let mut s = Surface::new(5, 5);
        s.outline(Pos::new(0, 0), 5, 5, Palette::WhiteBlack);
        assert_eq!(s.glyph_at(Pos::new(0, 0)), WALL_CORNER);
        assert_eq!(s.glyph_at(Pos::new(0, 2)), WALL);
        assert_eq!(s.glyph_at(Pos::new(4, 4)), WALL_CORNER);
        assert!(s.is_blank(Pos::new(2, 2)));
    }
}
