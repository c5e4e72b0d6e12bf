/// One play-through of one level.
///
/// ## Turn order
///
/// ```text
///   flush input → read key → player action → present
///   (no action: stop here)
///   turn counter → safe underfoot → cash counter → exit check
///   → present → camera pass → pacing pause → guard pass → present
/// ```
///
/// Only a successful move or an interaction that took effect counts as an
/// action. Blocked moves, unknown keys and resizes cost nothing.

use std::io;

use log::info;

use crate::config::TimingConfig;
use crate::domain::art::{CASH_COUNTER, NOTICE_ESCAPE, NOTICE_LOSE, NOTICE_WIN, SCORE_COUNTER, TURN_COUNTER};
use crate::domain::board::Board;
use crate::domain::entity::{Counter, Entity};
use crate::domain::geom::Pos;
use crate::domain::interactable::{Interaction, InteractableId};
use crate::domain::patrol::Patroller;
use crate::domain::player::Player;
use crate::domain::surface::Palette;
use crate::sim::event::GameEvent;
use crate::sim::frontend::{Frontend, Key};
use crate::sim::menu::{PauseChoice, PauseMenu};

const TURN_COUNTER_AT: Pos = Pos::new(2, 119);
const CASH_COUNTER_AT: Pos = Pos::new(10, 119);
const BANNER_AT: Pos = Pos::new(6, 26);
const EFFICIENCY_AT: Pos = Pos::new(10, 26);

/// How a session ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionEnd {
    /// Reached the exit with every safe cracked.
    Won,
    /// Reached the exit with cash left behind.
    Escaped,
    Caught,
    Retry,
    Quit,
}

impl SessionEnd {
    /// Won, Escaped and Caught leave the final frame up for a while.
    pub fn is_finished(self) -> bool {
        matches!(self, SessionEnd::Won | SessionEnd::Escaped | SessionEnd::Caught)
    }

    pub fn describe(self) -> &'static str {
        match self {
            SessionEnd::Won => "perfect heist",
            SessionEnd::Escaped => "escaped",
            SessionEnd::Caught => "caught",
            SessionEnd::Retry => "retried",
            SessionEnd::Quit => "walked away",
        }
    }
}

/// A built level, before the player arrives.
pub struct Stage {
    pub name: String,
    pub board: Board,
    pub start: Pos,
    pub exit: Pos,
    pub max_score: u32,
    pub guards: Vec<Patroller>,
    pub cameras: Vec<InteractableId>,
}

pub struct Session {
    name: String,
    board: Board,
    player: Player,
    guards: Vec<Patroller>,
    cameras: Vec<InteractableId>,
    exit: Pos,
    max_score: u32,
    turns: Counter,
    cash: Counter,
    timing: TimingConfig,
    end: Option<SessionEnd>,
}

impl Session {
    pub fn new(stage: Stage, timing: TimingConfig) -> Self {
        let Stage { name, mut board, start, exit, max_score, guards, cameras } = stage;
        let player = Player::spawn(&mut board.surface, start);
        let turns = Counter::spawn(&mut board.surface, TURN_COUNTER_AT, &TURN_COUNTER, Palette::YellowBlack);
        let cash = Counter::spawn(&mut board.surface, CASH_COUNTER_AT, &CASH_COUNTER, Palette::YellowBlack);
        Session { name, board, player, guards, cameras, exit, max_score, turns, cash, timing, end: None }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Play turns until the level is over.
    pub fn play(&mut self, ui: &mut dyn Frontend) -> io::Result<SessionEnd> {
        info!("level `{}` started", self.name);
        ui.present(&self.board.surface)?;

        loop {
            self.turn(ui)?;
            if let Some(end) = self.end {
                info!(
                    "level `{}` over: {} after {} turns, cash {}",
                    self.name,
                    end.describe(),
                    self.turns.count,
                    self.player.score
                );
                if end.is_finished() {
                    ui.pause(self.timing.session_end);
                }
                return Ok(end);
            }
        }
    }

    /// One key, and the world's answer to it.
    pub fn turn(&mut self, ui: &mut dyn Frontend) -> io::Result<()> {
        ui.flush_input();
        let key = ui.read_key()?;

        let mut acted = false;
        if let Some(direction) = key.direction() {
            acted = self.player.mover.step(&mut self.board, &mut *ui, direction)?;
        } else {
            match key {
                Key::Interact => {
                    let outcome = self.player.interact_front(&mut self.board);
                    match outcome {
                        Interaction::Toggled { open } => ui.notify(&GameEvent::DoorToggled { open }),
                        Interaction::Broken => {
                            info!("camera broken");
                            ui.notify(&GameEvent::CameraBroken);
                        }
                        _ => {}
                    }
                    acted = outcome.took_effect();
                }
                Key::Resize => ui.resize()?,
                Key::Quit => {
                    let choice = PauseMenu::new().run(&mut *ui, self.timing.menu_frame)?;
                    match choice {
                        PauseChoice::Resume => {}
                        PauseChoice::Retry => {
                            self.end = Some(SessionEnd::Retry);
                            return Ok(());
                        }
                        PauseChoice::Quit => {
                            self.end = Some(SessionEnd::Quit);
                            return Ok(());
                        }
                    }
                }
                _ => {}
            }
        }

        ui.present(&self.board.surface)?;
        if !acted {
            return Ok(());
        }

        let turns = self.turns.count + 1;
        self.turns.set(&mut self.board.surface, turns);

        if let Some(under) = self.player.mover.covering {
            if let Some(item) = self.board.registry.at_mut(under) {
                if let Interaction::Cracked { value } = item.interact(&mut self.board.surface, Some(&mut self.player.score)) {
                    info!("safe at ({}, {}) cracked for {}", under.row, under.col, value);
                    ui.notify(&GameEvent::SafeCracked);
                }
            }
        }
        self.cash.set(&mut self.board.surface, self.player.score);

        if self.player.mover.covering == Some(self.exit) {
            self.reach_exit(ui);
        }
        ui.present(&self.board.surface)?;

        let target = self.player.pos();
        for &id in &self.cameras {
            if let Some(camera) = self.board.registry.get_mut(id) {
                if camera.surveil(&mut self.board.surface, target) {
                    info!("camera at ({}, {}) tripped", camera.pos().row, camera.pos().col);
                    ui.notify(&GameEvent::CameraTripped);
                }
            }
        }

        ui.pause(self.timing.turn_pacing);

        for guard in &mut self.guards {
            if self.end.is_none() && guard.patrol(&mut self.board, &mut *ui, &self.player.mover)? {
                info!("caught by the guard at ({}, {})", guard.pos().row, guard.pos().col);
                self.end = Some(SessionEnd::Caught);
                Entity::spawn(&mut self.board.surface, BANNER_AT, &NOTICE_LOSE, Palette::RedBlack, "static");
                ui.notify(&GameEvent::Captured);
                ui.pause(self.timing.capture_pause);
            }
        }

        ui.present(&self.board.surface)
    }

    fn reach_exit(&mut self, ui: &mut dyn Frontend) {
        let surface = &mut self.board.surface;
        let perfect = self.player.score == self.max_score;
        let (end, banner, event) = if perfect {
            (SessionEnd::Won, &NOTICE_WIN, GameEvent::Perfect)
        } else {
            (SessionEnd::Escaped, &NOTICE_ESCAPE, GameEvent::Escaped)
        };
        self.end = Some(end);

        Entity::spawn(surface, BANNER_AT, banner, Palette::YellowBlack, "static");
        let mut score = Counter::spawn(surface, EFFICIENCY_AT, &SCORE_COUNTER, Palette::YellowBlack);
        score.set(surface, efficiency(self.player.score, self.turns.count));

        ui.notify(&event);
        ui.pause(self.timing.banner_pause);
    }
}

#[cfg(test)]
impl Session {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn guards(&self) -> &[Patroller] {
        &self.guards
    }

    pub fn turns(&self) -> u32 {
        self.turns.count
    }

    pub fn end(&self) -> Option<SessionEnd> {
        self.end
    }
}

/// Cash per turn, as a percentage. Halves round to even, so 100 cash
/// over 32 turns reads 312.
fn efficiency(score: u32, turns: u32) -> u32 {
    if turns == 0 {
        return 0;
    }
    (score as f64 / turns as f64 * 100.0).round_ties_even() as u32
}
