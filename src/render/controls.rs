//! On-screen buttons
//!
//! The renderer lays the pad out every frame and keeps the result, so mouse
//! clicks can be hit-tested against exactly what is on screen.

use ratatui::layout::{Position as ScreenPosition, Rect};

use crate::game::Direction;

const BUTTON_WIDTH: u16 = 5;
const BUTTON_GAP: u16 = 1;
const RESTART_WIDTH: u16 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Turn(Direction),
    Restart,
}

impl Button {
    pub fn label(&self) -> &'static str {
        match self {
            Button::Turn(Direction::Up) => "[ ↑ ]",
            Button::Turn(Direction::Down) => "[ ↓ ]",
            Button::Turn(Direction::Left) => "[ ← ]",
            Button::Turn(Direction::Right) => "[ → ]",
            Button::Restart => "[ Restart ]",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlPad {
    buttons: Vec<(Button, Rect)>,
}

impl ControlPad {
    /// Lay out the direction pad centred in `area`, with the restart button
    /// to its right when `show_restart` is set. Buttons that do not fit are
    /// dropped.
    pub fn layout(area: Rect, show_restart: bool) -> Self {
        let pad_width = BUTTON_WIDTH * 3 + BUTTON_GAP * 2;
        let total_width = if show_restart {
            pad_width + BUTTON_GAP * 3 + RESTART_WIDTH
        } else {
            pad_width
        };
        let left = area.x + area.width.saturating_sub(total_width) / 2;
        let column = |i: u16| left + i * (BUTTON_WIDTH + BUTTON_GAP);

        let mut candidates = vec![
            (Button::Turn(Direction::Up), Rect::new(column(1), area.y, BUTTON_WIDTH, 1)),
            (Button::Turn(Direction::Left), Rect::new(column(0), area.y + 1, BUTTON_WIDTH, 1)),
            (Button::Turn(Direction::Down), Rect::new(column(1), area.y + 1, BUTTON_WIDTH, 1)),
            (Button::Turn(Direction::Right), Rect::new(column(2), area.y + 1, BUTTON_WIDTH, 1)),
        ];
        if show_restart {
            let restart_x = left + pad_width + BUTTON_GAP * 3;
            candidates.push((Button::Restart, Rect::new(restart_x, area.y, RESTART_WIDTH, 1)));
        }

        let buttons = candidates
            .into_iter()
            .filter(|(_, rect)| area.intersection(*rect) == *rect)
            .collect();

        Self { buttons }
    }

    pub fn buttons(&self) -> &[(Button, Rect)] {
        &self.buttons
    }

    /// Button under the given terminal cell, if any
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Button> {
        let point = ScreenPosition::new(column, row);
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(button, _)| *button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_buttons_hit_test() {
        let pad = ControlPad::layout(Rect::new(0, 10, 17, 2), false);

        assert_eq!(pad.hit_test(6, 10), Some(Button::Turn(Direction::Up)));
        assert_eq!(pad.hit_test(0, 11), Some(Button::Turn(Direction::Left)));
        assert_eq!(pad.hit_test(10, 11), Some(Button::Turn(Direction::Down)));
        assert_eq!(pad.hit_test(16, 11), Some(Button::Turn(Direction::Right)));
        // Gap between buttons and the empty corners
        assert_eq!(pad.hit_test(5, 11), None);
        assert_eq!(pad.hit_test(0, 10), None);
    }

    #[test]
    fn test_restart_only_when_requested() {
        let area = Rect::new(0, 0, 60, 2);

        let running = ControlPad::layout(area, false);
        assert!(running.buttons().iter().all(|(b, _)| *b != Button::Restart));

        let over = ControlPad::layout(area, true);
        let (_, rect) = over
            .buttons()
            .iter()
            .find(|(b, _)| *b == Button::Restart)
            .copied()
            .unwrap();
        assert_eq!(over.hit_test(rect.x, rect.y), Some(Button::Restart));
    }

    #[test]
    fn test_buttons_outside_area_are_dropped() {
        let pad = ControlPad::layout(Rect::new(0, 0, 10, 1), false);
        assert!(pad.buttons().is_empty());
    }

    #[test]
    fn test_empty_pad_hits_nothing() {
        let pad = ControlPad::default();
        assert_eq!(pad.hit_test(0, 0), None);
    }
}
