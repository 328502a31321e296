use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use super::gesture::{Gesture, SwipeTracker};
use crate::game::Direction;
use crate::render::{Button, ControlPad};

/// What the player asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Restart,
    Quit,
    None,
}

/// Maps terminal key presses, swipes and button clicks onto game commands.
///
/// Every input modality ends up as the same small set of [`Command`]s, the
/// game loop never needs to know where a turn came from.
pub struct InputHandler {
    swipe: SwipeTracker,
}

impl InputHandler {
    pub fn new(swipe_threshold: u16) -> Self {
        Self {
            swipe: SwipeTracker::new(swipe_threshold),
        }
    }

    /// Handle any terminal event. `pad` is the button layout currently on
    /// screen.
    pub fn handle_event(&mut self, event: &Event, pad: &ControlPad) -> Command {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(*key),
            Event::Mouse(mouse) => self.handle_mouse_event(*mouse, pad),
            _ => Command::None,
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> Command {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Command::Quit;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Turn(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                Command::Turn(Direction::Down)
            }
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
                Command::Turn(Direction::Left)
            }
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
                Command::Turn(Direction::Right)
            }

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,

            _ => Command::None,
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent, pad: &ControlPad) -> Command {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.swipe.begin(mouse.column, mouse.row);
                Command::None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                match self.swipe.finish(mouse.column, mouse.row) {
                    Gesture::Swipe(direction) => Command::Turn(direction),
                    Gesture::Tap { column, row } => match pad.hit_test(column, row) {
                        Some(Button::Turn(direction)) => Command::Turn(direction),
                        Some(Button::Restart) => Command::Restart,
                        None => Command::None,
                    },
                    Gesture::None => Command::None,
                }
            }
            _ => Command::None,
        }
    }
}
