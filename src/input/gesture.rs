use crate::game::Direction;

/// Result of releasing the mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Drag long enough to count as a directional swipe
    Swipe(Direction),
    /// Press and release too close together to be a swipe
    Tap { column: u16, row: u16 },
    /// Release without a matching press
    None,
}

/// Turns a press/release pair of pointer positions into a swipe
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: u16,
    start: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    pub fn begin(&mut self, column: u16, row: u16) {
        self.start = Some((column, row));
    }

    pub fn finish(&mut self, column: u16, row: u16) -> Gesture {
        let Some((start_column, start_row)) = self.start.take() else {
            return Gesture::None;
        };

        let dx = column as i32 - start_column as i32;
        let dy = row as i32 - start_row as i32;

        match classify_swipe(dx, dy, self.threshold) {
            Some(direction) => Gesture::Swipe(direction),
            None => Gesture::Tap { column, row },
        }
    }
}

/// Pick a direction from a drag vector.
///
/// Drags shorter than `threshold` on both axes are noise. Otherwise the
/// larger axis wins, with ties going to the vertical axis.
pub fn classify_swipe(dx: i32, dy: i32, threshold: u16) -> Option<Direction> {
    let (abs_x, abs_y) = (dx.abs(), dy.abs());

    if abs_x.max(abs_y) < threshold as i32 {
        return None;
    }

    let direction = if abs_x > abs_y {
        if dx > 0 { Direction::Right } else { Direction::Left }
    } else if dy > 0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}
