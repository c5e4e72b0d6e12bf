/// What the session needs from the outside world: one key per turn, a way
/// to show the surface, and a clock to pace animation.

use std::io;

use crate::domain::board::Animator;
use crate::domain::geom::Direction;
use crate::sim::event::GameEvent;

/// The whole command set. Everything unrecognised is `Other`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Interact,
    Quit,
    Resize,
    Other,
}

impl Key {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

pub trait Frontend: Animator {
    /// Drop keys typed during animation so they don't queue up as turns.
    fn flush_input(&mut self);

    /// Block until one key arrives.
    fn read_key(&mut self) -> io::Result<Key>;

    /// The terminal changed size: forget what is on screen.
    fn resize(&mut self) -> io::Result<()>;

    fn notify(&mut self, _event: &GameEvent) {}
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use std::time::Duration;

    use super::*;
    use crate::domain::surface::Surface;

    /// Plays a fixed key script and records everything else.
    /// Running out of keys is an `UnexpectedEof` error.
    #[derive(Default)]
    pub struct Scripted {
        pub keys: VecDeque<Key>,
        pub frames: usize,
        pub paused: Duration,
        pub flushes: usize,
        pub resizes: usize,
        pub events: Vec<GameEvent>,
        pub screen: Option<Surface>,
    }

    impl Scripted {
        pub fn new(keys: &[Key]) -> Self {
            Scripted { keys: keys.iter().copied().collect(), ..Scripted::default() }
        }
    }

    impl Animator for Scripted {
        fn present(&mut self, surface: &Surface) -> io::Result<()> {
            self.frames += 1;
            self.screen = Some(surface.clone());
            Ok(())
        }

        fn pause(&mut self, delay: Duration) {
            self.paused += delay;
        }
    }

    impl Frontend for Scripted {
        fn flush_input(&mut self) {
            self.flushes += 1;
        }

        fn read_key(&mut self) -> io::Result<Key> {
            self.keys
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
        }

        fn resize(&mut self) -> io::Result<()> {
            self.resizes += 1;
            Ok(())
        }

        fn notify(&mut self, event: &GameEvent) {
            self.events.push(*event);
        }
    }
}
