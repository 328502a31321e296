use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::controls::{Button, ControlPad};
use crate::game::{GameState, Phase, Position};
use crate::metrics::GameMetrics;

/// What a single grid cell shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Head,
    Body,
    Food,
    Empty,
}

/// Classify a cell with precedence head > body > food > empty
pub fn classify_cell(state: &GameState, pos: Position) -> CellKind {
    if pos == state.snake.head() {
        CellKind::Head
    } else if state.snake.contains(pos) {
        CellKind::Body
    } else if pos == state.food {
        CellKind::Food
    } else {
        CellKind::Empty
    }
}

impl CellKind {
    fn span(&self) -> Span<'static> {
        match self {
            CellKind::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            CellKind::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            CellKind::Food => Span::styled(
                "O ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            CellKind::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
        }
    }
}

/// Header (score line plus rule), status line, button pad and footer
const CHROME_HEIGHT: u16 = 2 + 1 + 2 + 1;
const GAME_OVER_WIDTH: u16 = 38;
const GAME_OVER_HEIGHT: u16 = 9;

/// Smallest terminal (columns, rows) that shows the whole board
pub fn required_size(grid_size: usize) -> (u16, u16) {
    let side = u16::try_from(grid_size).unwrap_or(u16::MAX);
    let width = side.saturating_mul(2).saturating_add(2);
    let height = side.saturating_add(2).saturating_add(CHROME_HEIGHT);
    (width, height)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Draws the game and remembers where the on-screen buttons ended up
pub struct Renderer {
    control_pad: ControlPad,
    board_visible: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            control_pad: ControlPad::default(),
            board_visible: true,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Button layout from the most recent frame
    pub fn control_pad(&self) -> &ControlPad {
        &self.control_pad
    }

    /// False when the last frame was too small to show the whole board
    pub fn board_visible(&self) -> bool {
        self.board_visible
    }

    pub fn render(&mut self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let area = frame.area();
        let (min_width, min_height) = required_size(state.grid_size);
        self.board_visible = area.width >= min_width && area.height >= min_height;

        if !self.board_visible {
            self.control_pad = ControlPad::default();
            frame.render_widget(self.render_too_small(area, min_width, min_height), area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(1), // Status line
                Constraint::Length(2), // Button pad
                Constraint::Length(1), // Footer
            ])
            .split(area);

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let board = centered(chunks[1], min_width, min_height - CHROME_HEIGHT);
        frame.render_widget(self.render_grid(state), board);

        // The final board stays visible under the panel
        if state.phase() == Phase::GameOver {
            let panel = centered(board, GAME_OVER_WIDTH, GAME_OVER_HEIGHT);
            frame.render_widget(Clear, panel);
            frame.render_widget(self.render_game_over(state, metrics), panel);
        }

        frame.render_widget(self.render_status(state), chunks[2]);

        self.control_pad = ControlPad::layout(chunks[3], state.phase() == Phase::GameOver);
        self.render_buttons(frame);

        frame.render_widget(self.render_controls(), chunks[4]);
    }

    fn render_too_small(&self, area: Rect, min_width: u16, min_height: u16) -> Paragraph<'static> {
        let text = vec![
            Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "need {}x{}, have {}x{}",
                min_width, min_height, area.width, area.height
            )),
            Line::from(Span::styled("Game paused", Style::default().fg(Color::Gray))),
        ];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'static> {
        let lines: Vec<Line> = (0..state.grid_size as i32)
            .map(|y| {
                let spans: Vec<Span> = (0..state.grid_size as i32)
                    .map(|x| classify_cell(state, Position::new(x, y)).span())
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" NOKIA SNAKE "),
        )
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.high_score.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_status(&self, state: &GameState) -> Paragraph<'static> {
        let line = match state.phase() {
            Phase::NotStarted => Line::from(Span::styled(
                "Swipe or use arrows to start",
                Style::default().fg(Color::Gray),
            )),
            Phase::Running => Line::from(""),
            Phase::GameOver => Line::from(Span::styled(
                "Game Over",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
        };

        Paragraph::new(line).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Games played: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    metrics.games_played.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" or click Restart, ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_buttons(&self, frame: &mut Frame) {
        for (button, rect) in self.control_pad.buttons() {
            let style = match button {
                Button::Turn(_) => Style::default().fg(Color::Cyan),
                Button::Restart => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            };
            frame.render_widget(Paragraph::new(Span::styled(button.label(), style)), *rect);
        }
    }

    fn render_controls(&self) -> Paragraph<'static> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" / "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" / drag to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}
