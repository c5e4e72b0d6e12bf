/// Guard AI: scripted route following, door recovery, proximity alerts
/// and camera reactions.
///
/// A guard has no pathfinding. Its route is a cyclic list of legs
/// (direction, step count, optional interactable to unlock when blocked).
///
/// One `patrol` call per turn:
///   1. **advance** one step along the current leg
///   2. for every watched camera that has been triggered, queue one extra
///      **advance** (a guard running toward the alarm)
///
/// Reactions never queue further reactions, so a turn costs at most
/// `1 + cameras.len()` steps. Any advance that spots the player ends the
/// turn with a capture.

use std::collections::VecDeque;
use std::io;

use anyhow::ensure;
use log::debug;

use super::art::GUARD;
use super::board::{Animator, Board};
use super::geom::{Direction, Pos, CELL_COLS, CELL_ROWS};
use super::interactable::{Interactable, InteractableId};
use super::movement::Mover;
use super::surface::{CellProbe, Palette, Surface};

const ALERT_GLYPH: char = '!';

/// One segment of a route.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Leg {
    pub direction: Direction,
    pub steps: u32,
    /// Opened by the guard if its way along this leg is blocked.
    pub unlock: Option<InteractableId>,
}

impl Leg {
    pub fn new(direction: Direction, steps: u32) -> Self {
        Leg { direction, steps, unlock: None }
    }

    pub fn unlocking(direction: Direction, steps: u32, unlock: InteractableId) -> Self {
        Leg { direction, steps, unlock: Some(unlock) }
    }
}

#[derive(Clone, Debug)]
pub struct Patroller {
    pub mover: Mover,
    route: Vec<Leg>,
    leg: usize,
    step: u32,
    cameras: Vec<InteractableId>,
}

impl Patroller {
    pub fn spawn(
        surface: &mut Surface,
        pos: Pos,
        route: Vec<Leg>,
        cameras: Vec<InteractableId>,
    ) -> anyhow::Result<Self> {
        ensure!(!route.is_empty(), "guard at ({}, {}) has an empty route", pos.row, pos.col);
        ensure!(
            route.iter().all(|leg| leg.steps > 0),
            "guard at ({}, {}) has a zero-length leg",
            pos.row,
            pos.col
        );
        Ok(Patroller {
            mover: Mover::spawn(surface, pos, &GUARD, Palette::RedBlack, Direction::Down),
            route,
            leg: 0,
            step: 0,
            cameras,
        })
    }

    pub fn pos(&self) -> Pos {
        self.mover.pos()
    }

    #[cfg(test)]
    pub fn leg_index(&self) -> usize {
        self.leg
    }

    #[cfg(test)]
    pub fn step_count(&self) -> u32 {
        self.step
    }

    /// Run this guard's turn. Returns true if the player was caught.
    pub fn patrol<A: Animator + ?Sized>(&mut self, board: &mut Board, anim: &mut A, player: &Mover) -> io::Result<bool> {
        if self.advance(board, anim, player)? {
            return Ok(true);
        }

        let mut reactions: VecDeque<InteractableId> = self
            .cameras
            .iter()
            .copied()
            .filter(|&id| board.registry.get(id).map_or(false, Interactable::is_triggered))
            .collect();

        while let Some(camera) = reactions.pop_front() {
            debug!("guard at ({}, {}) reacts to camera #{}", self.pos().row, self.pos().col, camera);
            if self.advance(board, anim, player)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// One route step followed by the proximity check.
    fn advance<A: Animator + ?Sized>(&mut self, board: &mut Board, anim: &mut A, player: &Mover) -> io::Result<bool> {
        let leg = self.route[self.leg];
        self.step += 1;

        if self.mover.step(board, anim, leg.direction)? {
            // Exact match: a leg overshot by failed steps is never left.
            if self.step == leg.steps {
                self.step = 0;
                self.leg = (self.leg + 1) % self.route.len();
                self.mover.face(self.route[self.leg].direction);
                self.mover.entity.show(&mut board.surface);
            }
        } else {
            if self.mover.covering == Some(player.pos()) {
                self.raise_alert(&mut board.surface);
                return Ok(true);
            }
            if let Some(id) = leg.unlock {
                if let Some(item) = board.registry.get_mut(id) {
                    let outcome = item.interact(&mut board.surface, None);
                    debug!("guard at ({}, {}) unlocks #{}: {:?}", self.pos().row, self.pos().col, id, outcome);
                }
                self.step -= 1;
            }
        }

        if self.spots(&board.surface, player.pos()) {
            self.raise_alert(&mut board.surface);
            self.mover.entity.show(&mut board.surface);
            player.entity.redraw(&mut board.surface);
            return Ok(true);
        }
        Ok(false)
    }

    /// Same column within one cell height, or same row within one cell
    /// width, with a blank cell between the two.
    fn spots(&self, probe: &dyn CellProbe, target: Pos) -> bool {
        let me = self.pos();
        if me.col == target.col {
            if (me.row - target.row).abs() <= CELL_ROWS {
                let mid = Pos::new((me.row + target.row).div_euclid(2) + 1, me.col);
                return probe.is_blank(mid);
            }
        } else if me.row == target.row && (me.col - target.col).abs() <= CELL_COLS {
            let mid = Pos::new(me.row, (me.col + target.col).div_euclid(2) + 2);
            return probe.is_blank(mid);
        }
        false
    }

    fn raise_alert(&self, surface: &mut Surface) {
        surface.put(self.pos().offset(-1, 6), ALERT_GLYPH, self.mover.entity.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::art::PLAYER;
    use crate::domain::board::testing::Recorder;
    use crate::domain::board::MoveTiming;
    use crate::domain::interactable::Kind;
    use crate::domain::surface::WALL;

    fn board() -> Board {
        Board::new(Surface::new(25, 150), MoveTiming::default())
    }

    fn player_at(b: &mut Board, row: i32, col: i32) -> Mover {
        Mover::spawn(&mut b.surface, Pos::new(row, col), &PLAYER, Palette::RedBlack, Direction::Down)
    }

    fn trigger(b: &mut Board, id: InteractableId) {
        if let Some(Kind::Camera(cam)) = b.registry.get_mut(id).map(|i| &mut i.kind) {
            cam.triggered = true;
        }
    }

    #[test]
    fn route_cursor_wraps_and_faces_next_leg() {
        let mut b = board();
        let player = player_at(&mut b, 20, 109);
        let route = vec![Leg::new(Direction::Right, 1), Leg::new(Direction::Left, 1)];
        let mut g = Patroller::spawn(&mut b.surface, Pos::new(2, 5), route, vec![]).unwrap();
        let mut rec = Recorder::default();

        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.pos(), Pos::new(2, 18));
        assert_eq!(g.leg_index(), 1);
        assert_eq!(g.mover.facing(), Direction::Left);

        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.pos(), Pos::new(2, 5));
        assert_eq!(g.leg_index(), 0);
        assert_eq!(g.step_count(), 0);
        assert_eq!(g.mover.facing(), Direction::Right);
    }

    #[test]
    fn spots_player_in_the_same_row_with_clear_gap() {
        let mut b = board();
        let player = player_at(&mut b, 2, 31);
        let route = vec![Leg::new(Direction::Right, 3)];
        let mut g = Patroller::spawn(&mut b.surface, Pos::new(2, 5), route, vec![]).unwrap();
        let mut rec = Recorder::default();

        assert!(g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.pos(), Pos::new(2, 18));
        assert_ne!(g.pos(), player.pos());
        assert_eq!(b.surface.glyph_at(Pos::new(1, 24)), ALERT_GLYPH);
    }

    #[test]
    fn wall_between_blocks_line_of_sight() {
        let mut b = board();
        let player = player_at(&mut b, 2, 31);
        b.surface.put(Pos::new(2, 26), WALL, Palette::WhiteBlack);
        let route = vec![Leg::new(Direction::Right, 3)];
        let mut g = Patroller::spawn(&mut b.surface, Pos::new(2, 5), route, vec![]).unwrap();
        let mut rec = Recorder::default();

        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.pos(), Pos::new(2, 18));
    }

    #[test]
    fn walking_onto_the_player_is_a_capture() {
        let mut b = board();
        let player = player_at(&mut b, 2, 18);
        let route = vec![Leg::new(Direction::Right, 1)];
        let mut g = Patroller::spawn(&mut b.surface, Pos::new(2, 5), route, vec![]).unwrap();
        let mut rec = Recorder::default();
        assert!(g.patrol(&mut b, &mut rec, &player).unwrap());
    }

    #[test]
    fn blocked_guard_opens_door_without_losing_progress() {
        let mut b = board();
        let player = player_at(&mut b, 20, 109);
        let door = Interactable::door(&mut b.surface, Pos::new(1, 13));
        let door = b.registry.insert(door).unwrap();
        let route = vec![Leg::unlocking(Direction::Right, 1, door), Leg::new(Direction::Left, 1)];
        let mut g = Patroller::spawn(&mut b.surface, Pos::new(2, 5), route, vec![]).unwrap();
        let mut rec = Recorder::default();

        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert!(b.registry.get(door).unwrap().is_open());
        assert_eq!(g.pos(), Pos::new(2, 5));
        assert_eq!(g.leg_index(), 0);
        assert_eq!(g.step_count(), 0);

        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.pos(), Pos::new(2, 18));
        assert_eq!(g.leg_index(), 1);
    }

    #[test]
    fn each_triggered_camera_buys_one_extra_step() {
        let mut b = board();
        let player = player_at(&mut b, 20, 109);
        let a = Interactable::camera(&mut b.surface, Pos::new(14, 2), Direction::Down);
        let a = b.registry.insert(a).unwrap();
        let c = Interactable::camera(&mut b.surface, Pos::new(14, 28), Direction::Down);
        let c = b.registry.insert(c).unwrap();
        let route = vec![Leg::new(Direction::Right, 10)];
        let mut g = Patroller::spawn(&mut b.surface, Pos::new(2, 5), route, vec![a, c]).unwrap();
        let mut rec = Recorder::default();

        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.step_count(), 1);

        trigger(&mut b, a);
        trigger(&mut b, c);
        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.step_count(), 4);
        assert_eq!(g.pos(), Pos::new(2, 57));
    }

    #[test]
    fn broken_camera_never_sends_the_guard() {
        let mut b = board();
        let player = player_at(&mut b, 20, 109);
        let cam = Interactable::camera(&mut b.surface, Pos::new(18, 28), Direction::Down);
        let cam = b.registry.insert(cam).unwrap();
        b.registry.get_mut(cam).unwrap().interact(&mut b.surface, None);
        let route = vec![Leg::new(Direction::Right, 10)];
        let mut g = Patroller::spawn(&mut b.surface, Pos::new(2, 5), route, vec![cam]).unwrap();
        let mut rec = Recorder::default();

        let target = Pos::new(20, 31);
        assert!(!b.registry.get_mut(cam).unwrap().surveil(&mut b.surface, target));
        assert!(!g.patrol(&mut b, &mut rec, &player).unwrap());
        assert_eq!(g.step_count(), 1);
    }

    #[test]
    fn empty_route_is_rejected() {
        let mut s = Surface::new(25, 150);
        assert!(Patroller::spawn(&mut s, Pos::new(2, 5), vec![], vec![]).is_err());
    }
}
