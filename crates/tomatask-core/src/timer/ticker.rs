//! One-second tick driver.
//!
//! Wraps a `tokio::time::Interval` that exists only while the countdown is
//! active. Pausing drops the interval entirely; resuming creates a new one
//! whose first tick lands a full period later, so pause/resume cycles never
//! accumulate drift or deliver a burst of missed ticks.

use std::future;
use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    interval: Option<Interval>,
}

impl Default for TickScheduler {
    fn default() -> Self {
        Self::new(TICK_PERIOD)
    }
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

    /// No-op if already active.
    pub fn activate(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn deactivate(&mut self) {
        self.interval = None;
    }

    /// Activate or deactivate to match `counting`.
    pub fn sync(&mut self, counting: bool) {
        if counting {
            self.activate();
        } else {
            self.deactivate();
        }
    }

    /// Resolves on the next tick; pends forever while inactive.
    pub async fn next_tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => future::pending::<()>().await,
        }
    }
}
