/// The real front end: crossterm screen, keyboard plus gamepad input, and
/// sound cues, bundled behind [`Frontend`].

use std::io;
use std::time::Duration;

use crate::config::GameConfig;
use crate::domain::board::Animator;
use crate::domain::surface::Surface;
use crate::sim::event::GameEvent;
use crate::sim::frontend::{Frontend, Key};
use crate::ui::gamepad::GamepadState;
use crate::ui::input;
use crate::ui::renderer::Renderer;
use crate::ui::sound::{self, SoundEngine};

pub struct Terminal {
    renderer: Renderer,
    gamepad: GamepadState,
    sound: Option<SoundEngine>,
}

impl Terminal {
    pub fn new(config: &GameConfig) -> Self {
        let mut gamepad = GamepadState::new();
        gamepad.load_button_config(&config.gamepad);
        if gamepad.connected {
            log::info!("gamepad detected");
        }
        Terminal { renderer: Renderer::new(), gamepad, sound: SoundEngine::new() }
    }

    /// Raw mode and the alternate screen.
    pub fn init(&mut self) -> io::Result<()> {
        self.renderer.init()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        self.renderer.cleanup()
    }
}

impl Animator for Terminal {
    fn present(&mut self, surface: &Surface) -> io::Result<()> {
        self.renderer.render(surface)
    }

    fn pause(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

impl Frontend for Terminal {
    fn flush_input(&mut self) {
        match input::drain() {
            Ok(true) => {
                if let Err(e) = self.renderer.invalidate() {
                    log::warn!("repaint after resize failed: {e}");
                }
            }
            Ok(false) => {}
            Err(e) => log::warn!("input drain failed: {e}"),
        }
        self.gamepad.update();
        self.gamepad.clear();
    }

    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            self.gamepad.update();
            if let Some(key) = self.gamepad.take_key() {
                return Ok(key);
            }
            if let Some(key) = input::poll_key()? {
                return Ok(key);
            }
        }
    }

    fn resize(&mut self) -> io::Result<()> {
        self.renderer.invalidate()
    }

    fn notify(&mut self, event: &GameEvent) {
        sound::play(self.sound.as_ref(), event);
    }
}
