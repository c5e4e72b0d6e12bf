/// Game flow: level loading, the turn loop, and the menus around it.

pub mod event;
pub mod frontend;
pub mod level;
pub mod menu;
pub mod session;
