/// The player: a mover with a purse.

use super::art::PLAYER;
use super::board::Board;
use super::geom::{Direction, Pos};
use super::interactable::Interaction;
use super::movement::Mover;
use super::surface::{Palette, Surface};

#[derive(Clone, Debug)]
pub struct Player {
    pub mover: Mover,
    pub score: u32,
}

impl Player {
    pub fn spawn(surface: &mut Surface, pos: Pos) -> Self {
        Player {
            mover: Mover::spawn(surface, pos, &PLAYER, Palette::RedBlack, Direction::Down),
            score: 0,
        }
    }

    pub fn pos(&self) -> Pos {
        self.mover.pos()
    }

    /// Use whatever sits in the wall slot ahead: a door, a hatch or a
    /// camera. Empty slots are `Ignored`.
    pub fn interact_front(&self, board: &mut Board) -> Interaction {
        let front = self.mover.front_point();
        match board.registry.at_mut(front) {
            Some(item) => item.interact(&mut board.surface, None),
            None => Interaction::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::MoveTiming;
    use crate::domain::interactable::Interactable;

    #[test]
    fn interacts_with_the_slot_ahead_only() {
        let mut b = Board::new(Surface::new(25, 150), MoveTiming::default());
        let door = Interactable::door(&mut b.surface, Pos::new(1, 13));
        let id = b.registry.insert(door).unwrap();
        let mut p = Player::spawn(&mut b.surface, Pos::new(2, 5));

        // Facing down: front is (6, 2), nothing there.
        assert_eq!(p.interact_front(&mut b), Interaction::Ignored);

        p.mover.face(Direction::Right);
        assert_eq!(p.interact_front(&mut b), Interaction::Toggled { open: true });
        assert!(b.registry.get(id).unwrap().is_open());
    }

    #[test]
    fn breaks_a_camera_in_front() {
        let mut b = Board::new(Surface::new(25, 150), MoveTiming::default());
        let cam = Interactable::camera(&mut b.surface, Pos::new(6, 2), Direction::Down);
        b.registry.insert(cam).unwrap();
        let p = Player::spawn(&mut b.surface, Pos::new(2, 5));
        assert_eq!(p.interact_front(&mut b), Interaction::Broken);
        assert!(b.registry.at(Pos::new(6, 2)).unwrap().camera_ref().unwrap().is_broken());
    }
}
