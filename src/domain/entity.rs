/// Entity: the base drawable, plus the 4-digit Counter readout.
///
/// An entity is a position, a bank of poses, the current pose name and a
/// color. It knows how to paint itself onto a [`Surface`] and how to blank
/// the area it covers. Nothing here knows about collision.

use super::art::{Pose, PoseBank, DIGITS};
use super::geom::Pos;
use super::surface::{Palette, Surface, BLANK};

#[derive(Clone, Debug)]
pub struct Entity {
    pub pos: Pos,
    pub bank: &'static PoseBank,
    state: &'static str,
    pub color: Palette,
    visible: bool,
}

impl Entity {
    /// Build and immediately draw.
    ///
    /// Panics if `state` is not a pose of `bank`: that is a broken art table,
    /// not a runtime condition.
    pub fn spawn(surface: &mut Surface, pos: Pos, bank: &'static PoseBank, color: Palette, state: &'static str) -> Self {
        let mut entity = Entity::new(pos, bank, color, state);
        entity.show(surface);
        entity
    }

    /// Build without drawing.
    pub fn new(pos: Pos, bank: &'static PoseBank, color: Palette, state: &'static str) -> Self {
        assert!(bank.has(state), "pose `{}` missing from `{}`", state, bank.name);
        Entity { pos, bank, state, color, visible: true }
    }

    pub fn state(&self) -> &'static str {
        self.state
    }

    /// Switch pose. The new pose must exist.
    pub fn set_state(&mut self, state: &'static str) {
        assert!(self.bank.has(state), "pose `{}` missing from `{}`", state, self.bank.name);
        self.state = state;
    }

    pub fn pose(&self) -> Pose {
        // set_state/new guarantee presence
        self.bank.pose(self.state).unwrap_or(&[])
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Paint the current pose at `pos`, row `i` at `(row + i, col)`.
    pub fn show(&mut self, surface: &mut Surface) {
        self.visible = true;
        surface.write_glyphs(self.pos, self.color, self.pose());
    }

    /// Blank the rectangle the current pose occupies.
    pub fn hide(&mut self, surface: &mut Surface) {
        self.visible = false;
        let pose = self.pose();
        let width = pose.first().map_or(0, |l| l.chars().count()) as i32;
        surface.fill(self.pos, pose.len() as i32, width, BLANK, Palette::YellowBlack);
    }

    /// Repaint after something drew over us. Hidden entities stay hidden.
    pub fn redraw(&self, surface: &mut Surface) {
        if self.visible {
            surface.write_glyphs(self.pos, self.color, self.pose());
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Counter
// ══════════════════════════════════════════════════════════════

/// Column offsets of the thousands/hundreds/tens/units digits.
const DIGIT_COLS: [i32; 4] = [0, 4, 8, 12];
/// Digits sit this many rows below the label's top.
const DIGIT_ROW_OFFSET: i32 = 4;

/// Label plus a 4-digit readout underneath. Counts past 9999 wrap in the
/// display only.
#[derive(Clone, Debug)]
pub struct Counter {
    pub entity: Entity,
    pub count: u32,
}

impl Counter {
    pub fn spawn(surface: &mut Surface, pos: Pos, bank: &'static PoseBank, color: Palette) -> Self {
        let counter = Counter { entity: Entity::new(pos, bank, color, "static"), count: 0 };
        counter.show(surface);
        counter
    }

    /// The four displayed digits, most significant first.
    pub fn digits(&self) -> [usize; 4] {
        let n = self.count % 10_000;
        [
            (n / 1000) as usize,
            (n / 100 % 10) as usize,
            (n / 10 % 10) as usize,
            (n % 10) as usize,
        ]
    }

    pub fn show(&self, surface: &mut Surface) {
        let e = &self.entity;
        let label = e.pose();
        surface.write_glyphs(e.pos, e.color, label);
        for (slot, digit) in self.digits().into_iter().enumerate() {
            let glyph = DIGITS[digit];
            for i in 0..label.len().min(glyph.len()) {
                let at = e.pos.offset(i as i32 + DIGIT_ROW_OFFSET, DIGIT_COLS[slot]);
                surface.write_glyphs(at, e.color, &[glyph[i]]);
            }
        }
    }

    pub fn set(&mut self, surface: &mut Surface, count: u32) {
        self.count = count;
        self.show(surface);
    }
}
