//! Snake in the terminal
//!
//! This library provides:
//! - Core game logic and the tick scheduler (game module)
//! - Keyboard, swipe and button input mapping (input module)
//! - TUI rendering with ratatui (render module)
//! - In-memory session statistics (metrics module)
//! - The interactive game loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
