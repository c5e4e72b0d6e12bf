/// Glyph art: every pose of every sprite, keyed by state name.
///
/// Geometry that collision depends on (do not redraw casually):
///   - Movers are 3 × 5. Row 0, columns 0–1 are never blank (stepping onto a
///     mover or a safe registers as "covering" it) and row 1, column 0 is
///     always blank (two overlapping sprites leave the proximity midpoint
///     clear).
///   - Doors are 5 × 2 in a vertical wall slot; open doors are blank in
///     rows 1–3.
///   - Hatches are 1 × 11 in a horizontal wall slot; open hatches are blank
///     except for the two end caps.
///   - No sprite uses `█` or `▜`: those two glyphs mean "wall".

/// A multi-line glyph block.
pub type Pose = &'static [&'static str];

/// Named poses of one sprite.
#[derive(Debug)]
pub struct PoseBank {
    pub name: &'static str,
    pub poses: &'static [(&'static str, Pose)],
}

impl PoseBank {
    pub fn pose(&self, state: &str) -> Option<Pose> {
        self.poses.iter().find(|(name, _)| *name == state).map(|(_, pose)| *pose)
    }

    pub fn has(&self, state: &str) -> bool {
        self.pose(state).is_some()
    }
}

// ── Movers ──

pub static PLAYER: PoseBank = PoseBank {
    name: "player",
    poses: &[
        ("down", &["/o o\\", " \\▓/ ", " ╱ ╲ "]),
        ("up", &["/‾‾‾\\", " \\▓/ ", " ╱ ╲ "]),
        ("left", &["/o ‾\\", " <▓/ ", " ╱ ╲ "]),
        ("right", &["/‾ o\\", " \\▓> ", " ╱ ╲ "]),
    ],
};

pub static GUARD: PoseBank = PoseBank {
    name: "guard",
    poses: &[
        ("down", &["[o o]", " |▒| ", " ╱ ╲ "]),
        ("up", &["[‾‾‾]", " |▒| ", " ╱ ╲ "]),
        ("left", &["[o ‾]", " <▒| ", " ╱ ╲ "]),
        ("right", &["[‾ o]", " |▒> ", " ╱ ╲ "]),
    ],
};

// ── Fixtures ──

pub static SAFE: PoseBank = PoseBank {
    name: "safe",
    poses: &[
        ("closed", &["╔═══╗", "║ $ ║", "╚═══╝"]),
        ("open", &["╔═══╗", "║ · ║", "╚═══╝"]),
    ],
};

pub static EXIT: PoseBank = PoseBank {
    name: "exit",
    poses: &[("static", &["┏━━━┓", "┃OUT┃", "┗━━━┛"])],
};

pub static DOOR: PoseBank = PoseBank {
    name: "door",
    poses: &[
        ("closed", &["╥╥", "║║", "║║", "║║", "╨╨"]),
        ("open", &["╥╥", "  ", "  ", "  ", "╨╨"]),
    ],
};

pub static HATCH: PoseBank = PoseBank {
    name: "hatch",
    poses: &[
        ("closed", &["╞═════════╡"]),
        ("open", &["╞         ╡"]),
    ],
};

pub static CAMERA: PoseBank = PoseBank {
    name: "camera",
    poses: &[
        ("clear_right", &["◘▶"]),
        ("seen_right", &["◉▶"]),
        ("broken_right", &["╳╳"]),
        ("clear_left", &["◀◘"]),
        ("seen_left", &["◀◉"]),
        ("broken_left", &["╳╳"]),
        ("clear_down", &["▼◘▼"]),
        ("seen_down", &["▼◉▼"]),
        ("broken_down", &["╳╳╳"]),
        ("clear_up", &["▲◘▲"]),
        ("seen_up", &["▲◉▲"]),
        ("broken_up", &["╳╳╳"]),
    ],
};

// ── Counters ──

pub static TURN_COUNTER: PoseBank = PoseBank {
    name: "turn_counter",
    poses: &[("static", &["╭─────────────╮", "│    TURNS    │", "╰─────────────╯"])],
};

pub static CASH_COUNTER: PoseBank = PoseBank {
    name: "cash_counter",
    poses: &[("static", &["╭─────────────╮", "│    CASH     │", "╰─────────────╯"])],
};

pub static SCORE_COUNTER: PoseBank = PoseBank {
    name: "score_counter",
    poses: &[("static", &["╭─────────────╮", "│ EFFICIENCY  │", "╰─────────────╯"])],
};

/// Seven-segment style digits, same height as the counter labels.
pub static DIGITS: [Pose; 10] = [
    &["┏━┓", "┃ ┃", "┗━┛"],
    &["  ┓", "  ┃", "  ┻"],
    &["╺━┓", "┏━┛", "┗━╸"],
    &["╺━┓", " ━┫", "╺━┛"],
    &["╻ ╻", "┗━┫", "  ╹"],
    &["┏━╸", "┗━┓", "╺━┛"],
    &["┏━╸", "┣━┓", "┗━┛"],
    &["╺━┓", "  ┃", "  ╹"],
    &["┏━┓", "┣━┫", "┗━┛"],
    &["┏━┓", "┗━┫", "╺━┛"],
];

// ── Banners ──

pub static NOTICE_WIN: PoseBank = PoseBank {
    name: "notice_win",
    poses: &[(
        "static",
        &[
            "╔════════════════════════════════════════════╗",
            "║    PERFECT HEIST!  EVERY SAFE CRACKED.     ║",
            "╚════════════════════════════════════════════╝",
        ],
    )],
};

pub static NOTICE_ESCAPE: PoseBank = PoseBank {
    name: "notice_escape",
    poses: &[(
        "static",
        &[
            "╔════════════════════════════════════════════╗",
            "║   YOU ESCAPED... BUT LEFT CASH BEHIND.     ║",
            "╚════════════════════════════════════════════╝",
        ],
    )],
};

pub static NOTICE_LOSE: PoseBank = PoseBank {
    name: "notice_lose",
    poses: &[(
        "static",
        &[
            "╔════════════════════════════════════════════╗",
            "║         BUSTED!  A GUARD SPOTTED YOU.      ║",
            "╚════════════════════════════════════════════╝",
        ],
    )],
};

// ── Menus ──

pub static TITLE: Pose = &[
    "▓   ▓ ▓▓▓▓▓ ▓▓▓▓▓  ▓▓▓▓ ▓▓▓▓▓",
    "▓   ▓ ▓       ▓   ▓       ▓  ",
    "▓▓▓▓▓ ▓▓▓▓    ▓    ▓▓▓    ▓  ",
    "▓   ▓ ▓       ▓       ▓   ▓  ",
    "▓   ▓ ▓▓▓▓▓ ▓▓▓▓▓ ▓▓▓▓    ▓  ",
];

pub static PAUSE_TITLE: Pose = &[
    "▓▓▓▓   ▓▓▓  ▓   ▓  ▓▓▓▓ ▓▓▓▓▓ ▓▓▓▓ ",
    "▓   ▓ ▓   ▓ ▓   ▓ ▓     ▓     ▓   ▓",
    "▓▓▓▓  ▓▓▓▓▓ ▓   ▓  ▓▓▓  ▓▓▓▓  ▓   ▓",
    "▓     ▓   ▓ ▓   ▓     ▓ ▓     ▓   ▓",
    "▓     ▓   ▓  ▓▓▓  ▓▓▓▓  ▓▓▓▓▓ ▓▓▓▓ ",
];

pub const HELP_LINE: &str = "arrows/WASD: move   x: interact   q: pause";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::surface::is_wall_glyph;

    fn all_banks() -> [&'static PoseBank; 12] {
        [
            &PLAYER, &GUARD, &SAFE, &EXIT, &DOOR, &HATCH, &CAMERA,
            &TURN_COUNTER, &CASH_COUNTER, &SCORE_COUNTER,
            &NOTICE_WIN, &NOTICE_LOSE,
        ]
    }

    #[test]
    fn no_sprite_uses_a_wall_glyph() {
        for bank in all_banks() {
            for (_, pose) in bank.poses {
                for line in pose.iter() {
                    assert!(!line.chars().any(is_wall_glyph), "{} uses a wall glyph", bank.name);
                }
            }
        }
    }

    #[test]
    fn mover_rows_have_collision_shape() {
        for bank in [&PLAYER, &GUARD] {
            for (state, pose) in bank.poses {
                let row0: Vec<char> = pose[0].chars().collect();
                let row1: Vec<char> = pose[1].chars().collect();
                assert_ne!(row0[0], ' ', "{}/{}", bank.name, state);
                assert_ne!(row0[1], ' ', "{}/{}", bank.name, state);
                assert_eq!(row1[0], ' ', "{}/{}", bank.name, state);
                assert!(pose.iter().all(|l| l.chars().count() == 5));
            }
        }
    }

    #[test]
    fn open_passages_are_blank_where_proximity_looks() {
        let door = DOOR.pose("open").unwrap();
        assert!(door[1..4].iter().all(|l| l.trim().is_empty()));
        let hatch: Vec<char> = HATCH.pose("open").unwrap()[0].chars().collect();
        assert!(hatch[1..10].iter().all(|c| *c == ' '));
    }

    #[test]
    fn digits_match_label_height() {
        for d in DIGITS.iter() {
            assert_eq!(d.len(), TURN_COUNTER.pose("static").unwrap().len());
        }
    }
}
