/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::domain::board::MoveTiming;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub gamepad: GamepadConfig,
    pub levels_dir: PathBuf,
    pub log_file: PathBuf,
    /// Problems found while loading. Reported once the logger is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimingConfig {
    pub vertical_frame: Duration,
    pub horizontal_frame: Duration,
    pub turn_pacing: Duration,
    pub capture_pause: Duration,
    pub banner_pause: Duration,
    pub session_end: Duration,
    pub menu_frame: Duration,
}

impl TimingConfig {
    pub fn movement(&self) -> MoveTiming {
        MoveTiming {
            vertical_frame: self.vertical_frame,
            horizontal_frame: self.horizontal_frame,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        TimingConfig::from(TomlTiming::default())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GamepadConfig {
    pub interact: Vec<String>,
    pub pause: Vec<String>,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_vertical_frame")]
    vertical_frame_ms: u64,
    #[serde(default = "default_horizontal_frame")]
    horizontal_frame_ms: u64,
    #[serde(default = "default_turn_pacing")]
    turn_pacing_ms: u64,
    #[serde(default = "default_capture_pause")]
    capture_pause_ms: u64,
    #[serde(default = "default_banner_pause")]
    banner_pause_ms: u64,
    #[serde(default = "default_session_end")]
    session_end_ms: u64,
    #[serde(default = "default_menu_frame")]
    menu_frame_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_interact")]
    interact: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_log_file")]
    log_file: String,
}

// ── Defaults ──

fn default_vertical_frame() -> u64 { 50 }
fn default_horizontal_frame() -> u64 { 60 }
fn default_turn_pacing() -> u64 { 100 }
fn default_capture_pause() -> u64 { 200 }
fn default_banner_pause() -> u64 { 1000 }
fn default_session_end() -> u64 { 4000 }   // time to read the banner before the title returns
fn default_menu_frame() -> u64 { 50 }

fn default_interact() -> Vec<String> { vec!["A".into(), "X".into()] }
fn default_pause() -> Vec<String> { vec!["Start".into(), "Select".into()] }
fn default_levels_dir() -> String { "levels".into() }
fn default_log_file() -> String { "heist.log".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            vertical_frame_ms: default_vertical_frame(),
            horizontal_frame_ms: default_horizontal_frame(),
            turn_pacing_ms: default_turn_pacing(),
            capture_pause_ms: default_capture_pause(),
            banner_pause_ms: default_banner_pause(),
            session_end_ms: default_session_end(),
            menu_frame_ms: default_menu_frame(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            interact: default_interact(),
            pause: default_pause(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            log_file: default_log_file(),
        }
    }
}

impl From<TomlTiming> for TimingConfig {
    fn from(t: TomlTiming) -> Self {
        TimingConfig {
            vertical_frame: Duration::from_millis(t.vertical_frame_ms),
            horizontal_frame: Duration::from_millis(t.horizontal_frame_ms),
            turn_pacing: Duration::from_millis(t.turn_pacing_ms),
            capture_pause: Duration::from_millis(t.capture_pause_ms),
            banner_pause: Duration::from_millis(t.banner_pause_ms),
            session_end: Duration::from_millis(t.session_end_ms),
            menu_frame: Duration::from_millis(t.menu_frame_ms),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/heist`, (4) `/usr/share/heist`.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = Vec::new();
        let toml_cfg = load_toml(&search_dirs, &mut warnings);
        GameConfig::resolve(toml_cfg, &search_dirs, warnings)
    }

    /// Parse a config document directly (no directory search).
    #[cfg(test)]
    pub fn parse(text: &str) -> Self {
        let mut warnings = Vec::new();
        let toml_cfg = parse_toml(text, "config.toml", &mut warnings);
        GameConfig::resolve(toml_cfg, &[], warnings)
    }

    fn resolve(toml_cfg: TomlConfig, search_dirs: &[PathBuf], warnings: Vec<String>) -> Self {
        // Resolve levels directory
        let levels_dir_str = &toml_cfg.general.levels_dir;
        let levels_dir = if PathBuf::from(levels_dir_str).is_absolute() {
            PathBuf::from(levels_dir_str)
        } else {
            search_dirs.iter()
                .map(|d| d.join(levels_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(levels_dir_str))
        };

        GameConfig {
            timing: TimingConfig::from(toml_cfg.timing),
            gamepad: GamepadConfig {
                interact: toml_cfg.gamepad.interact,
                pause: toml_cfg.gamepad.pause,
            },
            levels_dir,
            log_file: PathBuf::from(toml_cfg.general.log_file),
            warnings,
        }
    }

    /// Hand load-time problems to the logger.
    pub fn report_warnings(&self) {
        for w in &self.warnings {
            warn!("{w}");
        }
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/heist)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/heist");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/heist)
    let sys = PathBuf::from("/usr/share/heist");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_toml(&text, &path.display().to_string(), warnings),
                Err(e) => warnings.push(format!("could not read {}: {e}", path.display())),
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str, origin: &str, warnings: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warnings.push(format!("{origin} parse error, using default settings: {e}"));
            TomlConfig::default()
        }
    }
}
