/// Entry point: config, logging, then the title menu loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::path::Path;

use anyhow::Context;
use log::{info, warn};

use config::GameConfig;
use sim::level::{load_levels, LevelDef};
use sim::menu::{TitleChoice, TitleMenu};
use sim::session::SessionEnd;
use ui::terminal::Terminal;

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load();
    init_logging(&config.log_file);
    config.report_warnings();

    let levels = load_levels(&config.levels_dir);
    anyhow::ensure!(!levels.is_empty(), "no playable levels found");

    let mut terminal = Terminal::new(&config);
    terminal.init().context("terminal init failed")?;

    let result = game_loop(&mut terminal, &levels, &config);
    let cleanup = terminal.cleanup();

    result?;
    cleanup.context("terminal cleanup failed")?;
    println!("Thanks for playing Heist!");
    Ok(())
}

/// The screen belongs to the game, so log lines go to a file.
/// `RUST_LOG` overrides the default `info` filter. If the file cannot be
/// opened the game runs without a logger.
fn init_logging(path: &Path) {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("logging disabled, cannot open {}: {e}", path.display());
            return;
        }
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn game_loop(terminal: &mut Terminal, levels: &[LevelDef], config: &GameConfig) -> anyhow::Result<()> {
    let mut title = TitleMenu::new(levels.iter().map(|l| l.name.clone()).collect());

    loop {
        let index = match title.run(terminal, config.timing.menu_frame)? {
            TitleChoice::Play(i) => i,
            TitleChoice::Quit => return Ok(()),
        };
        let Some(level) = levels.get(index) else {
            continue;
        };

        // Retry rebuilds the same level from its definition.
        let end = loop {
            let mut session = match level.build(&config.timing) {
                Ok(s) => s,
                Err(e) => {
                    warn!("level {} failed to build: {e:#}", level.name);
                    break None;
                }
            };
            let end = session.play(terminal)?;
            if end != SessionEnd::Retry {
                break Some(end);
            }
            info!("retrying {}", session.name());
        };

        match end {
            Some(end) => title.set_status(format!("Last heist: {}, {}", level.name, end.describe())),
            None => title.set_status(format!("{} could not be loaded, see the log", level.name)),
        }
    }
}
