/// The shared mutable world of one session: the render surface, the
/// interactable index, and the pacing the movement animation needs.
///
/// Everything that moves borrows the board for the duration of its move.

use std::io;
use std::time::Duration;

use super::interactable::Registry;
use super::surface::Surface;

/// Sink for animation frames. The terminal front end implements it; tests
/// use a recorder that neither draws nor sleeps.
pub trait Animator {
    /// Show the surface as it is right now.
    fn present(&mut self, surface: &Surface) -> io::Result<()>;
    /// Hold the current frame.
    fn pause(&mut self, delay: Duration);
}

#[derive(Clone, Copy, Debug)]
pub struct MoveTiming {
    pub vertical_frame: Duration,
    pub horizontal_frame: Duration,
}

impl Default for MoveTiming {
    fn default() -> Self {
        MoveTiming {
            vertical_frame: Duration::from_millis(50),
            horizontal_frame: Duration::from_millis(60),
        }
    }
}

#[derive(Debug)]
pub struct Board {
    pub surface: Surface,
    pub registry: Registry,
    pub timing: MoveTiming,
}

impl Board {
    pub fn new(surface: Surface, timing: MoveTiming) -> Self {
        Board { surface, registry: Registry::new(), timing }
    }
}
