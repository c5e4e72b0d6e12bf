/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Copy the game surface into the `front` buffer, clipped to the terminal
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Movement animation presents several frames per turn, so only the few
/// cells a sprite touched get rewritten each time.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::geom::Pos;
use crate::domain::surface::{Palette, Surface};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Color::Black };

    /// Differs from every real cell, so the next diff repaints everything.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

/// Map a palette pair to concrete terminal colors.
fn colors(palette: Palette) -> (Color, Color) {
    match palette {
        Palette::WhiteBlack => (Color::White, Color::Black),
        Palette::BlackWhite => (Color::Black, Color::White),
        Palette::RedBlack => (Color::Red, Color::Black),
        Palette::YellowBlack => (Color::Yellow, Color::Black),
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Copy `surface` in from the top-left corner. Anything past the
    /// buffer edge is dropped; anything past the surface edge is blank.
    fn compose(&mut self, surface: &Surface) {
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = if y < surface.rows() && x < surface.cols() {
                    let src = surface.cell(Pos::new(y as i32, x as i32));
                    let (fg, bg) = colors(src.color);
                    Cell { ch: src.ch, fg, bg }
                } else {
                    Cell::BLANK
                };
                self.set(x, y, cell);
            }
        }
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(64 * 1024, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Color::Black),
            Clear(ClearType::All)
        )?;
        self.invalidate()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Re-read the terminal size and repaint everything on the next frame.
    pub fn invalidate(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        queue!(self.writer, SetBackgroundColor(Color::Black), Clear(ClearType::All))?;
        Ok(())
    }

    pub fn render(&mut self, surface: &Surface) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            log::debug!("terminal resized to {tw}x{th}");
            self.invalidate()?;
        }

        self.front.compose(surface);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Color::Black;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_clips_to_buffer() {
        let mut surface = Surface::new(4, 10);
        surface.write_glyphs(Pos::new(1, 8), Palette::YellowBlack, &["abc"]);

        let mut fb = FrameBuffer::new(10, 3);
        fb.compose(&surface);
        assert_eq!(fb.get(8, 1), Cell { ch: 'a', fg: Color::Yellow, bg: Color::Black });
        assert_eq!(fb.get(9, 1).ch, 'b');
        assert_eq!(fb.get(0, 0), Cell::BLANK);
    }

    #[test]
    fn compose_blanks_past_the_surface() {
        let mut surface = Surface::new(1, 1);
        surface.put(Pos::new(0, 0), 'x', Palette::RedBlack);

        let mut fb = FrameBuffer::new(6, 4);
        fb.cells.fill(Cell::INVALID);
        fb.compose(&surface);
        assert_eq!(fb.get(0, 0).fg, Color::Red);
        assert_eq!(fb.get(5, 3), Cell::BLANK);
    }

    #[test]
    fn inverted_palette_swaps_colors() {
        assert_eq!(colors(Palette::BlackWhite), (Color::Black, Color::White));
        assert_eq!(colors(Palette::WhiteBlack), (Color::White, Color::Black));
    }
}
