use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Direction, GameEngine, Phase, TickOutcome, TickScheduler};
use crate::input::{Command, InputHandler};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive game in the terminal.
///
/// Input handling, ticks and rendering all run on the one task that owns the
/// engine, so a tick always sees the latest accepted direction.
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(engine: GameEngine) -> Self {
        let input_handler = InputHandler::new(engine.config().swipe_threshold);

        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        log::info!(
            "Session finished: {} games played, best score {}",
            self.metrics.games_played,
            self.metrics.high_score
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Only holds a timer while the game is running
        let mut scheduler = TickScheduler::new(self.engine.config().tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            self.sync_scheduler(&mut scheduler);

            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(&event),
                        Some(Err(err)) => {
                            return Err(err).context("Failed to read terminal event");
                        }
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = scheduler.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    let state = self.engine.state();
                    let metrics = &self.metrics;
                    let renderer = &mut self.renderer;
                    terminal.draw(|frame| {
                        renderer.render(frame, state, metrics);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        let command = self
            .input_handler
            .handle_event(event, self.renderer.control_pad());
        self.handle_command(command);
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => self.turn(direction),
            Command::Restart => self.restart_game(),
            Command::Quit => self.should_quit = true,
            Command::None => {}
        }
    }

    fn turn(&mut self, direction: Direction) {
        let was_started = self.engine.state().started;
        if self.engine.set_direction(direction) && !was_started {
            self.metrics.on_game_start();
        }
    }

    /// Open the tick timer while the game runs on a visible board, close it
    /// otherwise
    fn sync_scheduler(&self, scheduler: &mut TickScheduler) {
        scheduler.sync(self.engine.state().is_running() && self.renderer.board_visible());
    }

    fn update_game(&mut self) -> TickOutcome {
        let outcome = self.engine.tick();

        if outcome.is_terminal() {
            self.metrics.on_game_over(self.engine.state().score);
        } else if let TickOutcome::Ate { score } = outcome {
            log::debug!("Score is now {}", score);
        }
        outcome
    }

    /// Restart is only offered once the game has ended
    fn restart_game(&mut self) {
        if self.engine.state().phase() != Phase::GameOver {
            return;
        }
        self.engine.restart();
        self.metrics.on_restart();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), DisableMouseCapture, LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
