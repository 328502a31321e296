//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The tick scheduler is the only piece that touches the async runtime.

pub mod config;
pub mod direction;
pub mod engine;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use config::{GameConfig, MAX_GRID_SIZE};
pub use direction::Direction;
pub use engine::{GameEngine, TickOutcome, generate_food};
pub use scheduler::TickScheduler;
pub use state::{CollisionType, GameState, Phase, Position, Snake};
