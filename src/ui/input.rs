/// Keyboard input: one command per call.
///
/// The game waits for exactly one key per turn, so input is a blocking
/// read rather than a held-key tracker. The read polls in short slices so
/// gamepad buttons can be merged in while waiting.
///
/// Only Press and Repeat events count. Release events (reported on
/// terminals with keyboard enhancement) are ignored.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll};

use crate::sim::frontend::Key;

/// How long one poll slice waits for a terminal event.
pub const POLL_SLICE: Duration = Duration::from_millis(20);

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_INTERACT: &[KeyCode] = &[KeyCode::Char('x'), KeyCode::Char('X'), KeyCode::Enter, KeyCode::Char(' ')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Esc];

/// Translate one key event. `None` for events that are not keystrokes.
pub fn map_key(key: &KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return Some(Key::Quit);
    }
    let code = key.code;
    let key = if KEYS_UP.contains(&code) {
        Key::Up
    } else if KEYS_DOWN.contains(&code) {
        Key::Down
    } else if KEYS_LEFT.contains(&code) {
        Key::Left
    } else if KEYS_RIGHT.contains(&code) {
        Key::Right
    } else if KEYS_INTERACT.contains(&code) {
        Key::Interact
    } else if KEYS_QUIT.contains(&code) {
        Key::Quit
    } else {
        Key::Other
    };
    Some(key)
}

fn map_event(ev: Event) -> Option<Key> {
    match ev {
        Event::Key(key) => map_key(&key),
        Event::Resize(..) => Some(Key::Resize),
        _ => None,
    }
}

/// Wait at most one poll slice for a key.
pub fn poll_key() -> std::io::Result<Option<Key>> {
    if poll(POLL_SLICE)? {
        return Ok(map_event(event::read()?));
    }
    Ok(None)
}

/// Discard everything already queued. A resize is the one event that
/// survives, so the caller can still repaint.
pub fn drain() -> std::io::Result<bool> {
    let mut resized = false;
    while poll(Duration::ZERO)? {
        if let Event::Resize(..) = event::read()? {
            resized = true;
        }
    }
    Ok(resized)
}
