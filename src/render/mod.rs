pub mod controls;
pub mod renderer;

pub use controls::{Button, ControlPad};
pub use renderer::{CellKind, Renderer, classify_cell, required_size};
