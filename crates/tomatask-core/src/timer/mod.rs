mod engine;
mod mode;
mod ticker;

pub use engine::{PomodoroEngine, TimerSnapshot};
pub use mode::{duration_secs, PomodoroMode};
pub use ticker::{TickScheduler, TICK_PERIOD};
