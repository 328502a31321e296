pub mod gesture;
pub mod handler;

pub use gesture::{Gesture, SwipeTracker, classify_swipe};
pub use handler::{Command, InputHandler};
