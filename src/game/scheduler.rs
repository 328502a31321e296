//! Periodic tick timer bound to the game's active window
//!
//! The interval only exists while the game is running. Closing the window
//! drops it, so a restarted game never inherits ticks from a previous one.

use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

pub struct TickScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl TickScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Open or close the timer to match whether the game should be ticking.
    ///
    /// Opening starts a fresh interval whose first tick lands one full period
    /// later; calling this repeatedly with the same value is a no-op.
    pub fn sync(&mut self, active: bool) {
        match (active, self.interval.is_some()) {
            (true, false) => {
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
                log::debug!("Tick timer started ({:?})", self.period);
            }
            (false, true) => {
                self.interval = None;
                log::debug!("Tick timer stopped");
            }
            _ => {}
        }
    }

    /// Wait for the next tick. Never resolves while the timer is closed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
