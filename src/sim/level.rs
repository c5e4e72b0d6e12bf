/// Level loader.
///
/// ## Sources (priority order):
///   1. `levels/` directory (`*.toml`, played in file-name order)
///   2. Built-in embedded levels
///
/// ## Format
///
/// Positions are `[row, col]` anchors on the level surface, boxes are
/// `[row, col, height, width]`.
///
/// ```toml
/// name = "Tutorial"
/// start = [14, 18]
/// exit = [8, 70]
/// max_score = 100
/// walls = [[12, 12, 6, 2], [6, 1, 1, 78]]
/// safes = [[14, 70]]
/// doors = [[13, 65]]
/// hatches = [[12, 41]]
///
/// [[cameras]]
/// at = [12, 54]
/// facing = "down"
///
/// [[guards]]
/// at = [8, 44]
/// route = [["left", 3], ["down", 1, [13, 65]]]   # third item: unlock when blocked
/// cameras = [0]                                  # optional; default is every camera
///
/// [[guides]]
/// at = [4, 20]
/// size = [18, 1]
/// orientation = "vertical"
///
/// [[text]]
/// at = [1, 2]
/// lines = ["..."]
/// ```

use std::path::Path;

use anyhow::{bail, ensure, Context};
use log::{info, warn};
use serde::Deserialize;

use crate::config::TimingConfig;
use crate::domain::art::EXIT;
use crate::domain::board::Board;
use crate::domain::entity::Entity;
use crate::domain::geom::{Direction, Pos};
use crate::domain::interactable::{Interactable, InteractableId, Kind, SAFE_VALUE};
use crate::domain::patrol::{Leg, Patroller};
use crate::domain::surface::{Orientation, Palette, Surface, WALL};
use crate::sim::session::{Session, Stage};

pub const LEVEL_HEIGHT: i32 = 25;
pub const LEVEL_WIDTH: i32 = 150;

const EMBEDDED: [(&str, &str); 4] = [
    ("0-tutorial.toml", include_str!("../../levels/0-tutorial.toml")),
    ("1-first.toml", include_str!("../../levels/1-first.toml")),
    ("2-second.toml", include_str!("../../levels/2-second.toml")),
    ("3-third.toml", include_str!("../../levels/3-third.toml")),
];

// ══════════════════════════════════════════════════════════════
// Schema
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Rect {
    pub row: i32,
    pub col: i32,
    pub height: i32,
    pub width: i32,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraDef {
    pub at: Pos,
    pub facing: Direction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LegDef {
    Unlock(Direction, u32, Pos),
    Plain(Direction, u32),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardDef {
    pub at: Pos,
    pub route: Vec<LegDef>,
    /// Indices into the level's camera list. `None` watches all of them.
    #[serde(default)]
    pub cameras: Option<Vec<usize>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuideDef {
    pub at: Pos,
    pub size: [i32; 2],
    pub orientation: Orientation,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextDef {
    pub at: Pos,
    pub lines: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelDef {
    pub name: String,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_width")]
    pub width: i32,
    pub start: Pos,
    pub exit: Pos,
    pub max_score: u32,
    #[serde(default)]
    pub walls: Vec<Rect>,
    #[serde(default)]
    pub safes: Vec<Pos>,
    #[serde(default)]
    pub doors: Vec<Pos>,
    #[serde(default)]
    pub hatches: Vec<Pos>,
    #[serde(default)]
    pub cameras: Vec<CameraDef>,
    #[serde(default)]
    pub guards: Vec<GuardDef>,
    #[serde(default)]
    pub guides: Vec<GuideDef>,
    #[serde(default)]
    pub text: Vec<TextDef>,
}

fn default_height() -> i32 { LEVEL_HEIGHT }
fn default_width() -> i32 { LEVEL_WIDTH }

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

impl LevelDef {
    pub fn parse(text: &str) -> anyhow::Result<LevelDef> {
        let def: LevelDef = toml::from_str(text)?;
        Ok(def)
    }

    /// Structural checks that need no surface. Collisions and unlock
    /// targets are checked while building.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.height > 0 && self.width > 0, "level `{}` has an empty map", self.name);
        let placements = [("start", self.start), ("exit", self.exit)]
            .into_iter()
            .chain(self.safes.iter().map(|&p| ("safe", p)))
            .chain(self.doors.iter().map(|&p| ("door", p)))
            .chain(self.hatches.iter().map(|&p| ("hatch", p)))
            .chain(self.cameras.iter().map(|c| ("camera", c.at)))
            .chain(self.guards.iter().map(|g| ("guard", g.at)));
        for (what, pos) in placements {
            ensure!(
                self.contains(pos),
                "level `{}`: {} ({}, {}) is outside the {}x{} map",
                self.name, what, pos.row, pos.col, self.height, self.width
            );
        }
        let held = self.safes.len() as u32 * SAFE_VALUE;
        ensure!(
            self.max_score == held,
            "level `{}`: max_score {} but the safes hold {}",
            self.name, self.max_score, held
        );
        for (i, guard) in self.guards.iter().enumerate() {
            ensure!(!guard.route.is_empty(), "level `{}`: guard #{} has an empty route", self.name, i);
            if let Some(subset) = &guard.cameras {
                if let Some(bad) = subset.iter().find(|&&c| c >= self.cameras.len()) {
                    bail!(
                        "level `{}`: guard #{} watches camera #{} but the level has {}",
                        self.name, i, bad, self.cameras.len()
                    );
                }
            }
        }
        Ok(())
    }

    fn contains(&self, pos: Pos) -> bool {
        (0..self.height).contains(&pos.row) && (0..self.width).contains(&pos.col)
    }

    /// Draw the level and register everything in it.
    pub fn build(&self, timing: &TimingConfig) -> anyhow::Result<Session> {
        self.validate()?;

        let mut board = Board::new(Surface::new(self.height as usize, self.width as usize), timing.movement());
        draw_scenery(self, &mut board.surface);

        let exit = Entity::spawn(&mut board.surface, self.exit, &EXIT, Palette::WhiteBlack, "static");

        for &at in &self.safes {
            let safe = Interactable::safe(&mut board.surface, at);
            board.registry.insert(safe).with_context(|| format!("level `{}`", self.name))?;
        }
        for &at in &self.doors {
            let door = Interactable::door(&mut board.surface, at);
            board.registry.insert(door).with_context(|| format!("level `{}`", self.name))?;
        }
        for &at in &self.hatches {
            let hatch = Interactable::hatch(&mut board.surface, at);
            board.registry.insert(hatch).with_context(|| format!("level `{}`", self.name))?;
        }
        let mut cameras = Vec::with_capacity(self.cameras.len());
        for cam in &self.cameras {
            let camera = Interactable::camera(&mut board.surface, cam.at, cam.facing);
            cameras.push(board.registry.insert(camera).with_context(|| format!("level `{}`", self.name))?);
        }

        let mut guards = Vec::with_capacity(self.guards.len());
        for (i, def) in self.guards.iter().enumerate() {
            let route = def
                .route
                .iter()
                .map(|leg| resolve_leg(*leg, &board))
                .collect::<anyhow::Result<Vec<_>>>()
                .with_context(|| format!("level `{}`: guard #{}", self.name, i))?;
            let watched: Vec<InteractableId> = match &def.cameras {
                Some(subset) => subset.iter().map(|&c| cameras[c]).collect(),
                None => cameras.clone(),
            };
            guards.push(
                Patroller::spawn(&mut board.surface, def.at, route, watched)
                    .with_context(|| format!("level `{}`", self.name))?,
            );
        }

        info!(
            "level `{}` built: {} safes, {} guards, {} cameras",
            self.name,
            self.safes.len(),
            guards.len(),
            cameras.len()
        );

        Ok(Session::new(
            Stage {
                name: self.name.clone(),
                board,
                start: self.start,
                exit: exit.pos,
                max_score: self.max_score,
                guards,
                cameras,
            },
            timing.clone(),
        ))
    }
}

/// The `levels/` directory's levels if it has any, otherwise the built-in
/// ones.
pub fn load_levels(dir: &Path) -> Vec<LevelDef> {
    if dir.is_dir() {
        let from_dir = load_from_directory(dir);
        if !from_dir.is_empty() {
            info!("{} levels loaded from {}", from_dir.len(), dir.display());
            return from_dir;
        }
    }
    embedded_levels()
}

pub fn embedded_levels() -> Vec<LevelDef> {
    EMBEDDED
        .iter()
        .filter_map(|(file, text)| match LevelDef::parse(text) {
            Ok(def) => Some(def),
            Err(e) => {
                warn!("built-in level {file} skipped: {e:#}");
                None
            }
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════
// Internal
// ══════════════════════════════════════════════════════════════

fn draw_scenery(def: &LevelDef, surface: &mut Surface) {
    surface.outline(Pos::new(0, 0), def.height, def.width, Palette::WhiteBlack);
    for t in &def.text {
        surface.write_glyphs(t.at, Palette::YellowBlack, &t.lines);
    }
    for w in &def.walls {
        surface.fill(Pos::new(w.row, w.col), w.height, w.width, WALL, Palette::WhiteBlack);
    }
    for g in &def.guides {
        surface.route(g.at, g.size[0], g.size[1], g.orientation);
    }
}

fn resolve_leg(leg: LegDef, board: &Board) -> anyhow::Result<Leg> {
    match leg {
        LegDef::Plain(direction, steps) => Ok(Leg::new(direction, steps)),
        LegDef::Unlock(direction, steps, at) => {
            let Some(id) = board.registry.id_at(at) else {
                bail!("unlock target ({}, {}) is not an interactable", at.row, at.col);
            };
            match board.registry.get(id).map(|item| &item.kind) {
                Some(Kind::Door | Kind::Hatch) => Ok(Leg::unlocking(direction, steps, id)),
                _ => bail!("unlock target ({}, {}) is not a door or hatch", at.row, at.col),
            }
        }
    }
}

fn load_from_directory(dir: &Path) -> Vec<LevelDef> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!("could not read {}: {e}", dir.display());
            return vec![];
        }
    };

    let mut files: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map_or(false, |e| e == "toml"))
        .collect();
    files.sort();

    let mut levels = vec![];
    for path in files {
        let parsed = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))
            .and_then(|text| LevelDef::parse(&text).with_context(|| format!("parsing {}", path.display())));
        match parsed {
            Ok(def) => levels.push(def),
            Err(e) => warn!("level skipped: {e:#}"),
        }
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        name = "Mini"
        start = [2, 5]
        exit = [2, 31]
        max_score = 100
        safes = [[2, 18]]
        doors = [[13, 13]]

        [[guards]]
        at = [14, 5]
        route = [["right", 1, [13, 13]], ["left", 1]]
    "#;

    #[test]
    fn every_builtin_level_parses_and_builds() {
        let levels = embedded_levels();
        assert_eq!(levels.len(), EMBEDDED.len());
        let names: Vec<_> = levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Tutorial", "First", "Second", "Third"]);
        for level in &levels {
            let session = level.build(&TimingConfig::default());
            assert!(session.is_ok(), "{}: {:?}", level.name, session.err());
        }
    }

    #[test]
    fn builtin_scores_match_their_safes() {
        for level in embedded_levels() {
            assert_eq!(level.max_score, level.safes.len() as u32 * SAFE_VALUE, "{}", level.name);
        }
    }

    #[test]
    fn unlock_legs_parse() {
        let def = LevelDef::parse(MINIMAL).unwrap();
        assert_eq!(def.guards[0].route[0], LegDef::Unlock(Direction::Right, 1, Pos::new(13, 13)));
        assert_eq!(def.guards[0].route[1], LegDef::Plain(Direction::Left, 1));
        assert!(def.build(&TimingConfig::default()).is_ok());
    }

    #[test]
    fn unlock_must_name_an_interactable() {
        let text = MINIMAL.replace("1, [13, 13]]", "1, [7, 13]]");
        let def = LevelDef::parse(&text).unwrap();
        assert!(def.build(&TimingConfig::default()).is_err());
    }

    #[test]
    fn guards_only_unlock_doors_and_hatches() {
        let safe = LevelDef::parse(&MINIMAL.replace("1, [13, 13]]", "1, [2, 18]]")).unwrap();
        assert!(safe.build(&TimingConfig::default()).is_err());

        let camera = MINIMAL.replace("1, [13, 13]]", "1, [8, 44]]")
            + "\n[[cameras]]\nat = [8, 44]\nfacing = \"down\"\n";
        assert!(LevelDef::parse(&camera).unwrap().build(&TimingConfig::default()).is_err());

        let hatch = MINIMAL.replace("doors = [[13, 13]]", "hatches = [[13, 13]]");
        assert!(LevelDef::parse(&hatch).unwrap().build(&TimingConfig::default()).is_ok());
    }

    #[test]
    fn everything_must_sit_on_the_map() {
        let placed = [
            ("safes = [[2, 18]]", "safes = [[40, 500]]"),
            ("doors = [[13, 13]]", "doors = [[13, 13], [-1, 13]]"),
            ("at = [14, 5]", "at = [14, 150]"),
        ];
        for (from, to) in placed {
            let def = LevelDef::parse(&MINIMAL.replace(from, to)).unwrap();
            assert!(def.validate().is_err(), "{to} accepted");
        }
        let text = format!("{MINIMAL}\n[[cameras]]\nat = [25, 13]\nfacing = \"down\"\n");
        assert!(LevelDef::parse(&text).unwrap().validate().is_err());
    }

    #[test]
    fn two_things_in_one_cell_are_rejected() {
        let text = MINIMAL.replace("doors = [[13, 13]]", "doors = [[13, 13], [2, 18]]");
        let def = LevelDef::parse(&text).unwrap();
        assert!(def.build(&TimingConfig::default()).is_err());
    }

    #[test]
    fn validation_catches_bad_numbers() {
        let outside = LevelDef::parse(&MINIMAL.replace("start = [2, 5]", "start = [40, 5]")).unwrap();
        assert!(outside.validate().is_err());

        let greedy = LevelDef::parse(&MINIMAL.replace("max_score = 100", "max_score = 300")).unwrap();
        assert!(greedy.validate().is_err());

        let stingy = LevelDef::parse(&MINIMAL.replace("safes = [[2, 18]]", "safes = [[2, 18], [8, 18]]")).unwrap();
        assert!(stingy.validate().is_err());

        let blind = MINIMAL.replace("route = [", "cameras = [0]\n        route = [");
        assert!(LevelDef::parse(&blind).unwrap().validate().is_err());

        let idle = MINIMAL.replace(r#"[["right", 1, [13, 13]], ["left", 1]]"#, "[]");
        assert!(LevelDef::parse(&idle).unwrap().validate().is_err());
    }

    #[test]
    fn unknown_facing_is_a_parse_error() {
        let text = format!("{MINIMAL}\n[[cameras]]\nat = [1, 13]\nfacing = \"sideways\"\n");
        assert!(LevelDef::parse(&text).is_err());
    }

    #[test]
    fn directory_levels_replace_builtins() {
        let dir = std::env::temp_dir().join(format!("heist-levels-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("b.toml"), MINIMAL.replace("Mini", "Second")).unwrap();
        std::fs::write(dir.join("a.toml"), MINIMAL).unwrap();
        std::fs::write(dir.join("broken.toml"), "name = ").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let levels = load_levels(&dir);
        let names: Vec<_> = levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Mini", "Second"]);

        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(load_levels(&dir).len(), EMBEDDED.len());
    }
}
