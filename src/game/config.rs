use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::state::Position;

/// Largest supported board; anything bigger cannot be drawn in a terminal
pub const MAX_GRID_SIZE: usize = 100;

/// Configuration for the game
///
/// Every field has a default, so a JSON file only needs to name the values it
/// wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square game grid
    pub grid_size: usize,
    /// Head position of the snake at the start of every game
    pub initial_head: Position,
    /// Initial length of the snake, laid out to the left of the head
    pub initial_snake_length: usize,
    /// Food position at the start of every game
    pub initial_food: Position,
    /// Points awarded for each food eaten
    pub food_score: u32,
    /// Time between two ticks while the game is running
    pub tick_interval_ms: u64,
    /// Minimum drag distance (in terminal cells) recognised as a swipe
    pub swipe_threshold: u16,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_head: Position::new(10, 10),
            initial_snake_length: 3,
            initial_food: Position::new(15, 15),
            food_score: 10,
            tick_interval_ms: 150,
            swipe_threshold: 15,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file, falling back to defaults for
    /// missing fields
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Cells of the starting snake, head first, extending to the left
    pub fn initial_snake_body(&self) -> Vec<Position> {
        (0..self.initial_snake_length as i32)
            .map(|i| self.initial_head.moved_by(-i, 0))
            .collect()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.is_within(self.grid_size)
    }

    /// Reject layouts the engine cannot start from
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            bail!("grid_size must be between 1 and {}", MAX_GRID_SIZE);
        }
        if self.initial_snake_length == 0 || self.initial_snake_length > self.grid_size {
            bail!(
                "initial_snake_length must be between 1 and the grid size ({})",
                self.grid_size
            );
        }
        let body = self.initial_snake_body();
        if let Some(cell) = body.iter().find(|cell| !self.contains(**cell)) {
            bail!(
                "initial snake cell ({}, {}) lies outside the {}x{} grid",
                cell.x,
                cell.y,
                self.grid_size,
                self.grid_size
            );
        }
        if !self.contains(self.initial_food) {
            bail!(
                "initial food ({}, {}) lies outside the {}x{} grid",
                self.initial_food.x,
                self.initial_food.y,
                self.grid_size,
                self.grid_size
            );
        }
        if body.contains(&self.initial_food) {
            bail!("initial food overlaps the initial snake");
        }
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        if self.swipe_threshold == 0 {
            bail!("swipe_threshold must be greater than zero");
        }
        Ok(())
    }
}
