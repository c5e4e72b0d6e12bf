/// Gamepad input via gilrs, folded into the same `Key` commands the
/// keyboard produces.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move
///   A / X                 →  Interact
///   Start / Select        →  Pause
///
/// Only fresh presses produce a command; holding a direction does not
/// repeat, because every command costs a turn.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::sim::frontend::Key;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2" => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2 => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    interact: Vec<Btn>,
    pause: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap { interact: vec![Btn::A, Btn::X], pause: vec![Btn::Start, Btn::Select] }
    }
}

/// Which way the stick currently leans, after the deadzone.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
fn stick_key(x: f32, y: f32) -> Option<Key> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        None
    } else if x.abs() >= y.abs() {
        Some(if x < 0.0 { Key::Left } else { Key::Right })
    } else {
        // gilrs reports stick-up as positive Y
        Some(if y > 0.0 { Key::Up } else { Key::Down })
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Commands pressed since the last `take_key`, oldest first.
    pending: Vec<Key>,

    // Stick
    stick_x: f32,
    stick_y: f32,
    stick_dir: Option<Key>,

    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            pending: Vec::with_capacity(4),
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Empty or unrecognised lists keep
    /// the defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let interact = parse_list(&cfg.interact);
        if !interact.is_empty() {
            map.interact = interact;
        }
        let pause = parse_list(&cfg.pause);
        if !pause.is_empty() {
            map.pause = pause;
        }
    }

    pub fn update(&mut self) {
        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    /// The oldest pending command, if any.
    pub fn take_key(&mut self) -> Option<Key> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Forget anything pressed so far.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                    self.update_stick();
                }
                EventType::Connected => {
                    log::info!("gamepad connected");
                    self.connected = true;
                }
                EventType::Disconnected => {
                    log::info!("gamepad disconnected");
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    self.stick_dir = None;
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        let key = match gilrs_btn {
            Button::DPadUp => Some(Key::Up),
            Button::DPadDown => Some(Key::Down),
            Button::DPadLeft => Some(Key::Left),
            Button::DPadRight => Some(Key::Right),
            other => Btn::from_gilrs(other).and_then(|b| self.action_for(b)),
        };
        if let Some(key) = key {
            self.pending.push(key);
        }
    }

    /// Queue a move when the stick first crosses into a new direction.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn update_stick(&mut self) {
        let dir = stick_key(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(key) = dir {
                self.pending.push(key);
            }
            self.stick_dir = dir;
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn action_for(&self, btn: Btn) -> Option<Key> {
        if self.action_map.interact.contains(&btn) {
            Some(Key::Interact)
        } else if self.action_map.pause.contains(&btn) {
            Some(Key::Quit)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names() {
        assert_eq!(Btn::from_name("south"), Some(Btn::A));
        assert_eq!(Btn::from_name("Back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn config_overrides_defaults() {
        let mut pad = GamepadState::new();
        assert_eq!(pad.action_for(Btn::A), Some(Key::Interact));
        assert_eq!(pad.action_for(Btn::Start), Some(Key::Quit));

        pad.load_button_config(&GamepadConfig { interact: vec!["B".into()], pause: vec!["nonsense".into()] });
        assert_eq!(pad.action_for(Btn::A), None);
        assert_eq!(pad.action_for(Btn::B), Some(Key::Interact));
        assert_eq!(pad.action_for(Btn::Select), Some(Key::Quit));
    }

    #[test]
    fn stick_fires_once_per_lean() {
        let mut pad = GamepadState::new();
        pad.stick_x = 0.9;
        pad.update_stick();
        pad.stick_x = 1.0;
        pad.update_stick();
        assert_eq!(pad.take_key(), Some(Key::Right));
        assert_eq!(pad.take_key(), None);

        pad.stick_x = 0.0;
        pad.update_stick();
        pad.stick_y = 0.8;
        pad.update_stick();
        assert_eq!(pad.take_key(), Some(Key::Up));
    }

    #[test]
    fn deadzone() {
        assert_eq!(stick_key(0.2, -0.3), None);
        assert_eq!(stick_key(-0.7, 0.2), Some(Key::Left));
        assert_eq!(stick_key(0.1, -0.9), Some(Key::Down));
    }
}
