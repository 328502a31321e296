use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{CollisionType, GameState, Position, Snake},
};

/// What a single call to [`GameEngine::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not running; nothing changed
    Idle,
    /// The snake moved one cell without eating
    Moved,
    /// The snake ate food and grew; carries the new score
    Ate { score: u32 },
    /// The snake hit something and the game is over
    Collided(CollisionType),
    /// The snake ate the last free cell, there is nowhere left to put food
    BoardFull,
}

impl TickOutcome {
    /// Whether this tick ended the game
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Collided(_) | TickOutcome::BoardFull)
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with food placement seeded from OS entropy
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a new game engine with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let state = Self::initial_state(&config);
        Self { config, state, rng }
    }

    fn initial_state(config: &GameConfig) -> GameState {
        GameState::new(
            Snake::new(config.initial_snake_body()),
            config.initial_food,
            Direction::Right,
            config.grid_size,
        )
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Request a new direction.
    ///
    /// Returns false when the request was rejected: either it would reverse
    /// the snake onto itself, or the game is already over. An accepted
    /// request also starts the game.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if self.state.game_over || self.state.direction.is_opposite(requested) {
            return false;
        }

        self.state.direction = requested;
        if !self.state.started {
            self.state.started = true;
            log::info!("Game started heading {:?}", requested);
        }
        true
    }

    /// Advance the game by one cell
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Idle;
        }

        let new_head = self.state.snake.head().moved_in_direction(self.state.direction);

        // The fatal cell is never entered, the snake stays where it was
        if let Some(collision_type) = self.check_collision(new_head) {
            self.state.game_over = true;
            log::info!(
                "Game over: {:?} at ({}, {}), score {}",
                collision_type,
                new_head.x,
                new_head.y,
                self.state.score
            );
            return TickOutcome::Collided(collision_type);
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance(new_head, ate_food);

        if !ate_food {
            return TickOutcome::Moved;
        }

        self.state.score += self.config.food_score;
        match generate_food(&mut self.rng, self.state.grid_size, &self.state.snake.body) {
            Some(food) => {
                self.state.food = food;
                log::debug!(
                    "Food eaten, score {}, next food at ({}, {})",
                    self.state.score,
                    food.x,
                    food.y
                );
                TickOutcome::Ate {
                    score: self.state.score,
                }
            }
            None => {
                self.state.game_over = true;
                log::info!("Board full, final score {}", self.state.score);
                TickOutcome::BoardFull
            }
        }
    }

    /// Reset to the initial layout; the game waits for the next direction input
    pub fn restart(&mut self) {
        self.state = Self::initial_state(&self.config);
        log::info!("Game restarted");
    }

    /// Check if the new head position causes a collision.
    ///
    /// Compares against the body before the move, so the current tail cell
    /// counts as occupied.
    fn check_collision(&self, pos: Position) -> Option<CollisionType> {
        if !self.state.is_in_bounds(pos) {
            return Some(CollisionType::Wall);
        }

        if self.state.snake.collides_with_body(pos) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// Pick a uniformly random free cell for the next food.
///
/// Samples until it hits a cell not covered by `body`. Returns `None` when
/// `body` covers the whole grid, or when the grid has no cells or is too
/// large to address with `Position` coordinates.
pub fn generate_food<R: Rng + ?Sized>(
    rng: &mut R,
    grid_size: usize,
    body: &[Position],
) -> Option<Position> {
    let size = i32::try_from(grid_size).ok().filter(|size| *size > 0)?;
    let cells = grid_size.checked_mul(grid_size)?;

    let occupied: HashSet<Position> = body
        .iter()
        .copied()
        .filter(|p| p.is_within(grid_size))
        .collect();

    if occupied.len() >= cells {
        return None;
    }

    loop {
        let x = rng.gen_range(0..size);
        let y = rng.gen_range(0..size);
        let pos = Position::new(x, y);

        if !occupied.contains(&pos) {
            return Some(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    fn running_engine(body: Vec<Position>, direction: Direction) -> GameEngine {
        let mut engine = engine();
        let state = engine.state_mut();
        state.snake = Snake::new(body);
        state.direction = direction;
        state.started = true;
        engine
    }

    #[test]
    fn test_initial_state() {
        let engine = engine();
        let state = engine.state();

        assert!(!state.started);
        assert!(!state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.food, Position::new(15, 15));
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
    }

    #[test]
    fn test_tick_before_start_is_idle() {
        let mut engine = engine();
        let before = engine.state().clone();

        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_five_ticks_to_the_right() {
        let mut engine = engine();
        assert!(engine.set_direction(Direction::Right));

        for _ in 0..5 {
            assert_eq!(engine.tick(), TickOutcome::Moved);
        }

        let state = engine.state();
        assert_eq!(state.snake.head(), Position::new(15, 10));
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.score, 0);
        assert!(!state.game_over);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        engine.state_mut().food = Position::new(11, 10);
        engine.set_direction(Direction::Right);

        let outcome = engine.tick();

        let state = engine.state();
        assert_eq!(outcome, TickOutcome::Ate { score: 10 });
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 4);
        assert_eq!(state.snake.head(), Position::new(11, 10));
        assert_eq!(*state.snake.body.last().unwrap(), Position::new(8, 10));
        assert!(!state.snake.contains(state.food));
    }

    #[test]
    fn test_wall_collision() {
        let body = vec![
            Position::new(19, 10),
            Position::new(18, 10),
            Position::new(17, 10),
        ];
        let mut engine = running_engine(body.clone(), Direction::Right);

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::Wall));
        assert!(outcome.is_terminal());
        assert!(engine.state().game_over);
        assert_eq!(engine.state().snake.body, body);
    }

    #[test]
    fn test_wall_collision_on_negative_side() {
        let mut engine = running_engine(
            vec![Position::new(3, 0), Position::new(3, 1)],
            Direction::Up,
        );

        assert_eq!(engine.tick(), TickOutcome::Collided(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision() {
        // Head at (5,5) moving down, body loops around to the right
        let body = vec![
            Position::new(5, 5),
            Position::new(5, 4),
            Position::new(6, 4),
            Position::new(6, 5),
            Position::new(6, 6),
        ];
        let mut engine = running_engine(body.clone(), Direction::Down);
        assert!(engine.set_direction(Direction::Right));

        let outcome = engine.tick();

        assert_eq!(outcome, TickOutcome::Collided(CollisionType::SelfCollision));
        assert!(engine.state().game_over);
        assert_eq!(engine.state().snake.body, body);
    }

    #[test]
    fn test_moving_into_current_tail_is_fatal() {
        let body = vec![
            Position::new(5, 5),
            Position::new(5, 4),
            Position::new(6, 4),
            Position::new(6, 5),
        ];
        let mut engine = running_engine(body, Direction::Down);
        engine.set_direction(Direction::Right);

        assert_eq!(
            engine.tick(),
            TickOutcome::Collided(CollisionType::SelfCollision)
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = running_engine(
            vec![Position::new(5, 5), Position::new(5, 4)],
            Direction::Down,
        );

        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.state().direction, Direction::Down);
    }

    #[test]
    fn test_reversal_rejected_before_start() {
        let mut engine = engine();

        assert!(!engine.set_direction(Direction::Left));
        assert!(!engine.state().started);
    }

    #[test]
    fn test_last_accepted_direction_wins() {
        let mut engine = engine();
        assert!(engine.set_direction(Direction::Up));
        assert!(engine.set_direction(Direction::Right));
        // Checked against Right, the direction in effect now
        assert!(!engine.set_direction(Direction::Left));

        engine.tick();

        assert_eq!(engine.state().direction, Direction::Right);
        assert_eq!(engine.state().snake.head(), Position::new(11, 10));
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = running_engine(
            vec![Position::new(19, 0), Position::new(18, 0)],
            Direction::Right,
        );
        engine.tick();
        let frozen = engine.state().clone();

        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.set_direction(Direction::Down));
        assert_eq!(engine.state(), &frozen);
    }

    #[test]
    fn test_restart() {
        let mut engine = engine();
        engine.state_mut().food = Position::new(11, 10);
        engine.set_direction(Direction::Right);
        engine.tick();
        engine.state_mut().game_over = true;

        engine.restart();

        let state = engine.state();
        assert_eq!(state.score, 0);
        assert!(!state.started);
        assert!(!state.game_over);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(state.food, Position::new(15, 15));
        assert_eq!(state.snake.body, engine.config().initial_snake_body());
    }

    #[test]
    fn test_board_full_ends_game() {
        let config = GameConfig {
            grid_size: 2,
            initial_head: Position::new(1, 0),
            initial_snake_length: 2,
            initial_food: Position::new(1, 1),
            ..Default::default()
        };
        let mut engine = GameEngine::with_seed(config, 3);
        // (1,0),(0,0) -> eat (1,1); only (0,1) is left for food
        engine.set_direction(Direction::Down);
        assert_eq!(engine.tick(), TickOutcome::Ate { score: 10 });
        assert_eq!(engine.state().food, Position::new(0, 1));

        engine.set_direction(Direction::Left);
        assert_eq!(engine.tick(), TickOutcome::BoardFull);
        assert!(engine.state().game_over);
        assert_eq!(engine.state().score, 20);
        assert_eq!(engine.state().snake.len(), 4);
    }

    #[test]
    fn test_generate_food_on_full_board() {
        let mut rng = StdRng::seed_from_u64(1);
        let body = vec![
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(1, 1),
            Position::new(0, 1),
        ];
        assert_eq!(generate_food(&mut rng, 2, &body), None);
    }

    #[test]
    fn test_generate_food_finds_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(1);
        let body = vec![Position::new(0, 0), Position::new(1, 0), Position::new(1, 1)];
        assert_eq!(generate_food(&mut rng, 2, &body), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_generate_food_unaddressable_grid() {
        let mut rng = StdRng::seed_from_u64(1);
        let body = vec![Position::new(10, 10)];

        assert_eq!(generate_food(&mut rng, (u32::MAX as usize).saturating_add(21), &body), None);
        assert_eq!(generate_food(&mut rng, usize::MAX, &body), None);
        assert_eq!(generate_food(&mut rng, 0, &body), None);
    }

    #[derive(Debug, Clone)]
    enum Input {
        Turn(Direction),
        Tick,
    }

    fn input_strategy() -> impl Strategy<Value = Input> {
        prop_oneof![
            (0usize..4).prop_map(|i| Input::Turn(Direction::ALL[i])),
            Just(Input::Tick),
            Just(Input::Tick),
        ]
    }

    proptest! {
        #[test]
        fn prop_generate_food_avoids_body(
            seed in any::<u64>(),
            cells in proptest::collection::hash_set((0i32..6, 0i32..6), 0..20),
        ) {
            let body: Vec<Position> = cells.into_iter().map(|(x, y)| Position::new(x, y)).collect();
            let mut rng = StdRng::seed_from_u64(seed);

            let food = generate_food(&mut rng, 6, &body).unwrap();

            prop_assert!(!body.contains(&food));
            prop_assert!(food.x >= 0 && food.x < 6 && food.y >= 0 && food.y < 6);
        }

        #[test]
        fn prop_engine_invariants(
            seed in any::<u64>(),
            inputs in proptest::collection::vec(input_strategy(), 0..200),
        ) {
            let mut engine = GameEngine::with_seed(GameConfig::default(), seed);

            for input in inputs {
                let before = engine.state().clone();
                match input {
                    Input::Turn(dir) => {
                        let accepted = engine.set_direction(dir);
                        if accepted {
                            prop_assert!(!before.direction.is_opposite(dir));
                            prop_assert_eq!(engine.state().direction, dir);
                            prop_assert!(engine.state().started);
                        } else {
                            prop_assert_eq!(engine.state(), &before);
                        }
                    }
                    Input::Tick => {
                        let outcome = engine.tick();
                        let after = engine.state();
                        let grown = after.snake.len() as i64 - before.snake.len() as i64;
                        prop_assert!(grown == 0 || grown == 1);
                        if grown == 1 {
                            prop_assert_eq!(after.snake.head(), before.food);
                        }
                        if before.game_over {
                            prop_assert_eq!(outcome, TickOutcome::Idle);
                            prop_assert_eq!(after, &before);
                        }
                        if !after.game_over {
                            prop_assert!(!after.snake.contains(after.food));
                        }
                    }
                }
            }
        }
    }
}
