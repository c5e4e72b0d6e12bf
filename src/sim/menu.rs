/// Title and pause screens. Each runs its own key loop on its own surface
/// and hands back a choice; neither touches the session.

use std::io;
use std::time::Duration;

use crate::domain::art::{HELP_LINE, PAUSE_TITLE, TITLE};
use crate::domain::geom::Pos;
use crate::domain::surface::{Palette, Surface};
use crate::sim::frontend::{Frontend, Key};

const MENU_HEIGHT: usize = 30;
const MENU_WIDTH: usize = 160;

const BUTTON_WIDTH: usize = 24;
const BUTTON_SPACING: i32 = 5;
/// Title buttons shown at once; longer level lists scroll.
const VISIBLE_BUTTONS: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TitleChoice {
    Play(usize),
    Quit,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PauseChoice {
    Resume,
    Retry,
    Quit,
}

/// Draw a boxed, centred label. The hovered button is drawn inverted.
fn draw_button(surface: &mut Surface, at: Pos, label: &str, hover: bool) {
    let inner = BUTTON_WIDTH - 2;
    let text: String = label.chars().take(inner).collect();
    let pad = inner - text.chars().count();
    let lines = [
        format!("╭{}╮", "─".repeat(inner)),
        format!("│{}{}{}│", " ".repeat(pad / 2), text, " ".repeat(pad - pad / 2)),
        format!("╰{}╯", "─".repeat(inner)),
    ];
    let color = if hover { Palette::BlackWhite } else { Palette::WhiteBlack };
    surface.write_glyphs(at, color, &lines);
}

/// Cycle `index` through `0..len` by one step.
fn wrap_step(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

// ══════════════════════════════════════════════════════════════
// Title
// ══════════════════════════════════════════════════════════════

pub struct TitleMenu {
    options: Vec<String>,
    selected: usize,
    status: Option<String>,
    surface: Surface,
}

impl TitleMenu {
    /// One button per level, then Quit.
    pub fn new(level_names: Vec<String>) -> Self {
        let mut options = level_names;
        options.push("Quit".to_string());
        TitleMenu { options, selected: 0, status: None, surface: Surface::new(MENU_HEIGHT, MENU_WIDTH) }
    }

    /// A line shown under the buttons, e.g. how the last heist went.
    pub fn set_status(&mut self, line: impl Into<String>) {
        self.status = Some(line.into());
    }

    pub fn run(&mut self, ui: &mut dyn Frontend, frame: Duration) -> io::Result<TitleChoice> {
        self.draw();
        ui.present(&self.surface)?;

        loop {
            ui.flush_input();
            match ui.read_key()? {
                Key::Up => self.selected = wrap_step(self.selected, self.options.len(), false),
                Key::Down => self.selected = wrap_step(self.selected, self.options.len(), true),
                Key::Interact => {
                    return Ok(if self.selected + 1 == self.options.len() {
                        TitleChoice::Quit
                    } else {
                        TitleChoice::Play(self.selected)
                    });
                }
                Key::Resize => ui.resize()?,
                _ => {}
            }
            self.draw();
            ui.present(&self.surface)?;
            ui.pause(frame);
        }
    }

    fn first_visible(&self) -> usize {
        (self.selected + 1).saturating_sub(VISIBLE_BUTTONS)
    }

    fn draw(&mut self) {
        let first = self.first_visible();
        let s = &mut self.surface;
        s.clear();

        let title_width = TITLE.first().map_or(0, |l| l.chars().count());
        let title_row = (MENU_HEIGHT - TITLE.len()) as i32 / 2 - 1;
        s.write_glyphs(Pos::new(title_row, 8), Palette::YellowBlack, TITLE);

        let col = ((MENU_WIDTH + title_width - BUTTON_WIDTH) / 2 + 3) as i32;
        let last = (first + VISIBLE_BUTTONS).min(self.options.len());
        for (slot, i) in (first..last).enumerate() {
            let at = Pos::new(3 + slot as i32 * BUTTON_SPACING, col);
            draw_button(s, at, &self.options[i], i == self.selected);
        }
        let arrow_col = col + BUTTON_WIDTH as i32 / 2;
        if first > 0 {
            s.put(Pos::new(1, arrow_col), '▲', Palette::YellowBlack);
        }
        if last < self.options.len() {
            s.put(Pos::new(27, arrow_col), '▼', Palette::YellowBlack);
        }

        if let Some(status) = &self.status {
            s.write_glyphs(Pos::new(27, 2), Palette::YellowBlack, &[status.as_str()]);
        }
        s.write_glyphs(Pos::new(28, 2), Palette::WhiteBlack, &[HELP_LINE]);
    }
}

// ══════════════════════════════════════════════════════════════
// Pause
// ══════════════════════════════════════════════════════════════

const PAUSE_ROWS: [i32; 3] = [8, 15, 20];
const PAUSE_OPTIONS: [(&str, PauseChoice); 3] = [
    ("Resume", PauseChoice::Resume),
    ("Retry", PauseChoice::Retry),
    ("Quit", PauseChoice::Quit),
];

pub struct PauseMenu {
    selected: usize,
    surface: Surface,
}

impl PauseMenu {
    /// Starts on Resume.
    pub fn new() -> Self {
        PauseMenu { selected: 0, surface: Surface::new(MENU_HEIGHT, MENU_WIDTH) }
    }

    pub fn run(&mut self, ui: &mut dyn Frontend, frame: Duration) -> io::Result<PauseChoice> {
        self.draw();
        ui.present(&self.surface)?;

        loop {
            ui.flush_input();
            match ui.read_key()? {
                Key::Up => self.selected = wrap_step(self.selected, PAUSE_OPTIONS.len(), false),
                Key::Down => self.selected = wrap_step(self.selected, PAUSE_OPTIONS.len(), true),
                Key::Interact => return Ok(PAUSE_OPTIONS[self.selected].1),
                Key::Resize => ui.resize()?,
                _ => {}
            }
            self.draw();
            ui.present(&self.surface)?;
            ui.pause(frame);
        }
    }

    fn draw(&mut self) {
        let s = &mut self.surface;
        s.clear();
        let title_width = PAUSE_TITLE.first().map_or(0, |l| l.chars().count());
        s.write_glyphs(Pos::new(3, ((MENU_WIDTH - title_width) / 2) as i32), Palette::YellowBlack, PAUSE_TITLE);

        let col = ((MENU_WIDTH - BUTTON_WIDTH) / 2) as i32;
        for (i, (label, _)) in PAUSE_OPTIONS.iter().enumerate() {
            draw_button(s, Pos::new(PAUSE_ROWS[i], col), label, i == self.selected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::surface::CellProbe;
    use crate::sim::frontend::testing::Scripted;

    fn title() -> TitleMenu {
        TitleMenu::new(vec!["Tutorial".into(), "First".into(), "Second".into(), "Third".into()])
    }

    #[test]
    fn title_selects_levels_and_wraps() {
        let mut menu = title();
        let mut ui = Scripted::new(&[Key::Down, Key::Down, Key::Interact]);
        assert_eq!(menu.run(&mut ui, Duration::ZERO).unwrap(), TitleChoice::Play(2));

        // Selection carries over between runs.
        let mut ui = Scripted::new(&[Key::Down, Key::Down, Key::Interact]);
        assert_eq!(menu.run(&mut ui, Duration::ZERO).unwrap(), TitleChoice::Quit);

        let mut menu = title();
        let mut ui = Scripted::new(&[Key::Up, Key::Interact]);
        assert_eq!(menu.run(&mut ui, Duration::ZERO).unwrap(), TitleChoice::Quit);
    }

    #[test]
    fn title_ignores_stray_keys() {
        let mut menu = title();
        let mut ui = Scripted::new(&[Key::Quit, Key::Left, Key::Other, Key::Resize, Key::Interact]);
        assert_eq!(menu.run(&mut ui, Duration::ZERO).unwrap(), TitleChoice::Play(0));
        assert_eq!(ui.resizes, 1);
    }

    #[test]
    fn hovered_button_is_inverted() {
        let mut menu = title();
        let mut ui = Scripted::new(&[Key::Down, Key::Interact]);
        menu.run(&mut ui, Duration::ZERO).unwrap();
        let col = menu_col();
        let screen = ui.screen.unwrap();
        assert_eq!(screen.cell(Pos::new(3, col)).color, Palette::WhiteBlack);
        assert_eq!(screen.cell(Pos::new(3 + BUTTON_SPACING, col)).color, Palette::BlackWhite);
    }

    fn menu_col() -> i32 {
        let title_width = TITLE[0].chars().count();
        ((MENU_WIDTH + title_width - BUTTON_WIDTH) / 2 + 3) as i32
    }

    #[test]
    fn long_level_lists_scroll() {
        let names: Vec<String> = (1..=8).map(|i| format!("Level {i}")).collect();
        let mut menu = TitleMenu::new(names);
        let mut ui = Scripted::new(&[Key::Up, Key::Interact]);
        assert_eq!(menu.run(&mut ui, Duration::ZERO).unwrap(), TitleChoice::Quit);
        assert_eq!(menu.first_visible(), 4);
        let screen = ui.screen.unwrap();
        assert_eq!(screen.glyph_at(Pos::new(1, menu_col() + BUTTON_WIDTH as i32 / 2)), '▲');
    }

    #[test]
    fn status_line_is_shown() {
        let mut menu = title();
        menu.set_status("Last heist: Tutorial, escaped");
        let mut ui = Scripted::new(&[Key::Interact]);
        menu.run(&mut ui, Duration::ZERO).unwrap();
        let screen = ui.screen.unwrap();
        assert!(screen.row_string(27).contains("Last heist: Tutorial, escaped"));
    }

    #[test]
    fn pause_starts_on_resume() {
        let mut ui = Scripted::new(&[Key::Interact]);
        assert_eq!(PauseMenu::new().run(&mut ui, Duration::ZERO).unwrap(), PauseChoice::Resume);

        let mut ui = Scripted::new(&[Key::Down, Key::Down, Key::Interact]);
        assert_eq!(PauseMenu::new().run(&mut ui, Duration::ZERO).unwrap(), PauseChoice::Quit);
    }
}
