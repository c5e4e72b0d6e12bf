/// Events emitted during a turn.
/// The presentation layer consumes these for sound.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    SafeCracked,
    DoorToggled { open: bool },
    CameraBroken,
    CameraTripped,
    Captured,
    Escaped,
    Perfect,
}
