mod machine;
mod mode;
mod snapshot;
mod ticker;

pub use machine::{format_clock, SessionMachine, SessionStatus};
pub use mode::{DurationSettings, Mode, POMODOROS_PER_CYCLE};
pub use snapshot::{SessionSnapshot, SNAPSHOT_VERSION};
pub use ticker::{ClockTicker, Tick, DEFAULT_TICK_INTERVAL};
