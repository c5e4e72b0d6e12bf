/// Interactables: doors, hatches, safes and cameras, and the per-session
/// spatial index that answers "what is at this cell?".
///
/// ## State machines
///
/// | Kind   | States                      | interact()                                   |
/// |--------|-----------------------------|----------------------------------------------|
/// | Door   | closed ⇄ open               | flip, redraw                                 |
/// | Hatch  | closed ⇄ open               | flip, redraw                                 |
/// | Safe   | closed → open               | first time credits `value`, then idempotent  |
/// | Camera | clear → broken (seen: alarm)| only from clear; recolor white, redraw       |
///
/// Cameras also have a `seen` state entered by surveillance, see `camera.rs`.

use std::collections::HashMap;

use anyhow::bail;

use super::art::{CAMERA, DOOR, HATCH, SAFE};
use super::camera::Camera;
use super::entity::Entity;
use super::geom::{Direction, Pos};
use super::surface::{Palette, Surface};

/// Score credited for cracking a safe.
pub const SAFE_VALUE: u32 = 100;

/// Index into a [`Registry`]. Stable for the lifetime of a session.
pub type InteractableId = usize;

#[derive(Clone, Debug)]
pub enum Kind {
    Door,
    Hatch,
    Safe { value: u32 },
    Camera(Camera),
}

/// What an `interact` call did.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Interaction {
    /// Nothing happened (camera not in its clear state).
    Ignored,
    /// Door or hatch flipped; `open` is the new state.
    Toggled { open: bool },
    /// Safe went closed → open and paid out.
    Cracked { value: u32 },
    /// Safe was already open.
    AlreadyOpen,
    /// Camera went clear → broken.
    Broken,
}

impl Interaction {
    /// Does this count as the actor's action for the turn?
    pub fn took_effect(self) -> bool {
        !matches!(self, Interaction::Ignored)
    }
}

#[derive(Clone, Debug)]
pub struct Interactable {
    pub entity: Entity,
    pub kind: Kind,
}

impl Interactable {
    pub fn door(surface: &mut Surface, pos: Pos) -> Self {
        Interactable {
            entity: Entity::spawn(surface, pos, &DOOR, Palette::WhiteBlack, "closed"),
            kind: Kind::Door,
        }
    }

    pub fn hatch(surface: &mut Surface, pos: Pos) -> Self {
        Interactable {
            entity: Entity::spawn(surface, pos, &HATCH, Palette::WhiteBlack, "closed"),
            kind: Kind::Hatch,
        }
    }

    pub fn safe(surface: &mut Surface, pos: Pos) -> Self {
        Interactable {
            entity: Entity::spawn(surface, pos, &SAFE, Palette::YellowBlack, "closed"),
            kind: Kind::Safe { value: SAFE_VALUE },
        }
    }

    pub fn camera(surface: &mut Surface, pos: Pos, facing: Direction) -> Self {
        let camera = Camera::new(facing);
        Interactable {
            entity: Entity::spawn(surface, pos, &CAMERA, Palette::RedBlack, camera.state_name()),
            kind: Kind::Camera(camera),
        }
    }

    pub fn pos(&self) -> Pos {
        self.entity.pos
    }

    /// Only doors, hatches and safes can be open; an open door or hatch
    /// lets movers through.
    pub fn is_open(&self) -> bool {
        self.entity.state() == "open"
    }

    pub fn camera_ref(&self) -> Option<&Camera> {
        match &self.kind {
            Kind::Camera(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.camera_ref().map_or(false, |c| c.triggered)
    }

    /// Drive the state machine. `purse` receives safe payouts; guards
    /// interact without one.
    pub fn interact(&mut self, surface: &mut Surface, purse: Option<&mut u32>) -> Interaction {
        match &mut self.kind {
            Kind::Door | Kind::Hatch => {
                let open = self.entity.state() != "open";
                self.entity.set_state(if open { "open" } else { "closed" });
                self.entity.show(surface);
                Interaction::Toggled { open }
            }
            Kind::Safe { value } => {
                if self.entity.state() == "closed" {
                    let value = *value;
                    self.entity.set_state("open");
                    if let Some(purse) = purse {
                        *purse += value;
                    }
                    Interaction::Cracked { value }
                } else {
                    Interaction::AlreadyOpen
                }
            }
            Kind::Camera(camera) => {
                if !camera.break_from_clear() {
                    return Interaction::Ignored;
                }
                let state = camera.state_name();
                self.entity.set_state(state);
                self.entity.color = Palette::WhiteBlack;
                self.entity.show(surface);
                Interaction::Broken
            }
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Registry: per-session spatial index
// ══════════════════════════════════════════════════════════════

/// Owns every interactable of one session and indexes them by anchor
/// cell. Dropped with the session, so nothing leaks into the next level.
#[derive(Default, Debug)]
pub struct Registry {
    items: Vec<Interactable>,
    index: HashMap<Pos, InteractableId>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register an interactable. Two interactables anchored at the same
    /// cell is a level authoring error.
    pub fn insert(&mut self, item: Interactable) -> anyhow::Result<InteractableId> {
        let pos = item.pos();
        if let Some(&existing) = self.index.get(&pos) {
            bail!(
                "{} at ({}, {}) collides with {} already registered there",
                item.entity.bank.name,
                pos.row,
                pos.col,
                self.items[existing].entity.bank.name,
            );
        }
        let id = self.items.len();
        self.items.push(item);
        self.index.insert(pos, id);
        Ok(id)
    }

    pub fn id_at(&self, pos: Pos) -> Option<InteractableId> {
        self.index.get(&pos).copied()
    }

    pub fn at(&self, pos: Pos) -> Option<&Interactable> {
        self.id_at(pos).map(|id| &self.items[id])
    }

    pub fn at_mut(&mut self, pos: Pos) -> Option<&mut Interactable> {
        match self.id_at(pos) {
            Some(id) => Some(&mut self.items[id]),
            None => None,
        }
    }

    pub fn get(&self, id: InteractableId) -> Option<&Interactable> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.items.get_mut(id)
    }

    /// Is there an open door/hatch (or open safe) anchored at `pos`?
    pub fn is_open_at(&self, pos: Pos) -> bool {
        self.at(pos).map_or(false, Interactable::is_open)
    }

}
