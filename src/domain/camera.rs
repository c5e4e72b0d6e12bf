/// Surveillance cameras.
///
/// A camera is mounted in a wall slot and watches exactly one map cell on
/// its facing side. There is no cone and no tolerance: the player's anchor
/// must sit at the exact sight offset.
///
/// ```text
///   facing   target − camera
///   right    (+1, +5)
///   left     (+1, −8)
///   up       (−4, +3)
///   down     (+2, +3)
/// ```
///
/// `triggered` latches on first sight and is read by patrollers; nothing
/// clears it during a session.

use super::geom::{Direction, Pos};
use super::interactable::{Interactable, Kind};
use super::surface::Surface;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CameraPhase {
    Clear,
    Seen,
    Broken,
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub facing: Direction,
    pub phase: CameraPhase,
    pub triggered: bool,
}

impl Camera {
    pub fn new(facing: Direction) -> Self {
        Camera { facing, phase: CameraPhase::Clear, triggered: false }
    }

    pub fn is_broken(&self) -> bool {
        self.phase == CameraPhase::Broken
    }

    /// Pose name for the current phase and facing.
    pub fn state_name(&self) -> &'static str {
        use CameraPhase::*;
        use Direction::*;
        match (self.phase, self.facing) {
            (Clear, Up) => "clear_up",
            (Clear, Down) => "clear_down",
            (Clear, Left) => "clear_left",
            (Clear, Right) => "clear_right",
            (Seen, Up) => "seen_up",
            (Seen, Down) => "seen_down",
            (Seen, Left) => "seen_left",
            (Seen, Right) => "seen_right",
            (Broken, Up) => "broken_up",
            (Broken, Down) => "broken_down",
            (Broken, Left) => "broken_left",
            (Broken, Right) => "broken_right",
        }
    }

    /// Offset from the camera anchor to the watched cell's anchor.
    pub fn sight_offset(facing: Direction) -> (i32, i32) {
        match facing {
            Direction::Right => (1, 5),
            Direction::Left => (1, -8),
            Direction::Up => (-4, 3),
            Direction::Down => (2, 3),
        }
    }

    /// Exact-cell match against the watched cell.
    pub fn can_see(&self, camera_at: Pos, target: Pos) -> bool {
        let (dr, dc) = Camera::sight_offset(self.facing);
        target == camera_at.offset(dr, dc)
    }

    /// clear → broken. Returns false from any other phase.
    pub(super) fn break_from_clear(&mut self) -> bool {
        if self.phase != CameraPhase::Clear {
            return false;
        }
        self.phase = CameraPhase::Broken;
        true
    }
}

impl Interactable {
    /// Look for `target`. Broken cameras never look. Returns true when the
    /// camera saw the target on this pass.
    pub fn surveil(&mut self, surface: &mut Surface, target: Pos) -> bool {
        let at = self.entity.pos;
        let Kind::Camera(camera) = &mut self.kind else {
            return false;
        };
        if camera.is_broken() || !camera.can_see(at, target) {
            return false;
        }
        camera.phase = CameraPhase::Seen;
        camera.triggered = true;
        let state = camera.state_name();
        self.entity.set_state(state);
        self.entity.show(surface);
        true
    }
}
