/// Movement & collision for anything that walks: the player and guards.
///
/// ## Legality (`can_move_to`)
///
/// 1. The **front point** (wall slot ahead, per facing) must be blank, or
///    hold an open door/hatch according to the registry.
/// 2. The destination anchor is probed:
///      - wall glyph           → refuse; remember it as `covering`
///      - blank right neighbour → nothing underneath: `covered ← covering`,
///                                `covering ← none`
///      - otherwise            → something is there: `covering ← dest`
///
/// ## Occlusion stack
///
/// `covering` is the interactable directly beneath the mover, `covered` the
/// one it stood on before. Depth two is all the maps need: when a mover
/// steps off a safe, the safe is `covered` and gets redrawn once the mover
/// has left.
///
/// ## Animation (`move_to`)
///
/// Three frames of 2 rows (vertical) or 4 columns (horizontal), each
/// `hide → shift → show → pause → present`, then a snap to the exact
/// destination.

use std::io;
use std::time::Duration;

use super::art::PoseBank;
use super::board::{Animator, Board};
use super::entity::Entity;
use super::geom::{Direction, Pos, ANIMATION_FRAMES, HORIZONTAL_FRAME_STRIDE, VERTICAL_FRAME_STRIDE};
use super::interactable::Registry;
use super::surface::{is_wall_glyph, CellProbe, Palette, Surface};

#[derive(Clone, Debug)]
pub struct Mover {
    pub entity: Entity,
    facing: Direction,
    pub covering: Option<Pos>,
    pub covered: Option<Pos>,
}

impl Mover {
    pub fn spawn(surface: &mut Surface, pos: Pos, bank: &'static PoseBank, color: Palette, facing: Direction) -> Self {
        Mover {
            entity: Entity::spawn(surface, pos, bank, color, facing.name()),
            facing,
            covering: None,
            covered: None,
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.entity.pos
    }

    #[cfg(test)]
    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// Turn without moving. Does not redraw.
    pub fn face(&mut self, direction: Direction) {
        self.facing = direction;
        self.entity.set_state(direction.name());
    }

    /// The wall slot just ahead of the mover.
    pub fn front_point(&self) -> Pos {
        let (dr, dc) = self.facing.front_offset();
        self.pos().offset(dr, dc)
    }

    /// Decide whether `dest` can be entered, updating the occlusion stack
    /// as a side effect (see module docs for the exact order).
    pub fn can_move_to(&mut self, probe: &dyn CellProbe, registry: &Registry, dest: Pos) -> bool {
        let front = self.front_point();
        if !(probe.is_blank(front) || registry.is_open_at(front)) {
            return false;
        }

        if is_wall_glyph(probe.glyph_at(dest)) {
            self.covering = Some(dest);
            return false;
        }

        if probe.is_blank(dest.offset(0, 1)) {
            self.covered = self.covering;
            self.covering = None;
        } else {
            self.covering = Some(dest);
        }
        true
    }

    /// Animate to `dest`. On an illegal move, redraw in place (the facing
    /// may have changed) and return false.
    pub fn move_to<A: Animator + ?Sized>(&mut self, board: &mut Board, anim: &mut A, dest: Pos) -> io::Result<bool> {
        if !self.can_move_to(&board.surface, &board.registry, dest) {
            self.entity.show(&mut board.surface);
            return Ok(false);
        }

        let d_row = dest.row - self.pos().row;
        let d_col = dest.col - self.pos().col;

        let timing = board.timing;
        if d_row != 0 {
            let inc = d_row.signum() * VERTICAL_FRAME_STRIDE;
            for _ in 0..ANIMATION_FRAMES {
                self.slide(board, anim, inc, 0, timing.vertical_frame)?;
            }
        } else if d_col != 0 {
            let inc = d_col.signum() * HORIZONTAL_FRAME_STRIDE;
            for _ in 0..ANIMATION_FRAMES {
                self.slide(board, anim, 0, inc, timing.horizontal_frame)?;
            }
        }

        self.entity.hide(&mut board.surface);
        if let Some(under) = self.covered {
            if let Some(item) = board.registry.at(under) {
                item.entity.redraw(&mut board.surface);
            }
        }
        self.entity.pos = dest;
        self.entity.show(&mut board.surface);
        anim.present(&board.surface)?;

        Ok(true)
    }

    fn slide<A: Animator + ?Sized>(
        &mut self,
        board: &mut Board,
        anim: &mut A,
        d_row: i32,
        d_col: i32,
        delay: Duration,
    ) -> io::Result<()> {
        self.entity.hide(&mut board.surface);
        self.entity.pos = self.entity.pos.offset(d_row, d_col);
        self.entity.show(&mut board.surface);
        anim.pause(delay);
        anim.present(&board.surface)
    }

    pub fn move_by<A: Animator + ?Sized>(&mut self, board: &mut Board, anim: &mut A, (d_row, d_col): (i32, i32)) -> io::Result<bool> {
        let dest = self.pos().offset(d_row, d_col);
        self.move_to(board, anim, dest)
    }

    /// Face `direction` and try to move one cell that way.
    pub fn step<A: Animator + ?Sized>(&mut self, board: &mut Board, anim: &mut A, direction: Direction) -> io::Result<bool> {
        self.face(direction);
        self.move_by(board, anim, direction.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::art::PLAYER;
    use crate::domain::board::testing::Recorder;
    use crate::domain::board::MoveTiming;
    use crate::domain::interactable::Interactable;
    use crate::domain::surface::{WALL, WALL_CORNER};

    fn board() -> Board {
        Board::new(Surface::new(25, 150), MoveTiming::default())
    }

    fn mover(board: &mut Board, row: i32, col: i32) -> Mover {
        Mover::spawn(&mut board.surface, Pos::new(row, col), &PLAYER, Palette::RedBlack, Direction::Down)
    }

    #[test]
    fn open_floor_move_animates_and_lands() {
        let mut b = board();
        let mut m = mover(&mut b, 2, 5);
        let mut rec = Recorder::default();
        assert!(m.step(&mut b, &mut rec, Direction::Right).unwrap());
        assert_eq!(m.pos(), Pos::new(2, 18));
        assert_eq!(m.facing(), Direction::Right);
        assert_eq!(rec.frames, 4);
        assert_eq!(rec.paused, Duration::from_millis(180));
        // Old spot blanked, sprite drawn at the new one.
        assert!(b.surface.is_blank(Pos::new(2, 5)));
        assert_eq!(b.surface.glyph_at(Pos::new(2, 18)), '/');

        assert!(m.step(&mut b, &mut rec, Direction::Down).unwrap());
        assert_eq!(m.pos(), Pos::new(8, 18));
        assert_eq!(rec.paused, Duration::from_millis(180 + 150));
    }

    #[test]
    fn wall_glyph_at_destination_refuses_and_is_remembered() {
        for wall in [WALL, WALL_CORNER] {
            let mut b = board();
            let mut m = mover(&mut b, 2, 5);
            m.face(Direction::Right);
            b.surface.put(Pos::new(2, 18), wall, Palette::WhiteBlack);
            assert!(!m.can_move_to(&b.surface, &b.registry, Pos::new(2, 18)));
            assert_eq!(m.covering, Some(Pos::new(2, 18)));
        }
    }

    #[test]
    fn wall_glyph_refuses_even_when_front_is_blocked() {
        let mut b = board();
        let mut m = mover(&mut b, 2, 5);
        m.face(Direction::Right);
        b.surface.put(Pos::new(1, 13), WALL, Palette::WhiteBlack);
        b.surface.put(Pos::new(2, 18), WALL, Palette::WhiteBlack);
        assert!(!m.can_move_to(&b.surface, &b.registry, Pos::new(2, 18)));
        assert_eq!(m.covering, None);
    }

    #[test]
    fn failed_move_keeps_position_and_turns() {
        let mut b = board();
        let mut m = mover(&mut b, 2, 5);
        let mut rec = Recorder::default();
        // Top outline row sits at the up-front point.
        b.surface.outline(Pos::new(0, 0), 25, 150, Palette::WhiteBlack);
        assert!(!m.step(&mut b, &mut rec, Direction::Up).unwrap());
        assert_eq!(m.pos(), Pos::new(2, 5));
        assert_eq!(m.entity.state(), "up");
        assert_eq!(rec.frames, 0);
        assert_eq!(b.surface.glyph_at(Pos::new(2, 6)), '‾');
    }

    #[test]
    fn closed_door_blocks_and_open_door_passes() {
        let mut b = board();
        let door = Interactable::door(&mut b.surface, Pos::new(1, 13));
        let id = b.registry.insert(door).unwrap();
        let mut m = mover(&mut b, 2, 5);
        let mut rec = Recorder::default();
        assert!(!m.step(&mut b, &mut rec, Direction::Right).unwrap());
        b.registry.get_mut(id).unwrap().interact(&mut b.surface, None);
        assert!(m.step(&mut b, &mut rec, Direction::Right).unwrap());
        assert_eq!(m.pos(), Pos::new(2, 18));
    }

    #[test]
    fn stepping_off_a_safe_redraws_it() {
        let mut b = board();
        let safe = Interactable::safe(&mut b.surface, Pos::new(2, 18));
        b.registry.insert(safe).unwrap();
        let mut m = mover(&mut b, 2, 5);
        let mut rec = Recorder::default();

        assert!(m.step(&mut b, &mut rec, Direction::Right).unwrap());
        assert_eq!(m.covering, Some(Pos::new(2, 18)));
        assert_eq!(m.covered, None);

        assert!(m.step(&mut b, &mut rec, Direction::Right).unwrap());
        assert_eq!(m.covering, None);
        assert_eq!(m.covered, Some(Pos::new(2, 18)));
        assert_eq!(b.surface.glyph_at(Pos::new(2, 18)), '╔');
        assert_eq!(b.surface.glyph_at(Pos::new(3, 20)), '$');
    }
}
