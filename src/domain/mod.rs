/// Simulation core: sprites on a shared character surface, collision read
/// back from that surface, interactables and the guard AI.

pub mod art;
pub mod board;
pub mod camera;
pub mod entity;
pub mod geom;
pub mod interactable;
pub mod movement;
pub mod patrol;
pub mod player;
pub mod surface;
