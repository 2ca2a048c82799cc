use clap::Subcommand;
use pomocycle_core::{Event, Mode, SessionStatus};
use serde::Serialize;

use crate::context::Context;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start when paused, pause when running
    Toggle,
    /// Refill the current mode's countdown and pause
    Reset,
    /// Complete the current phase now
    Skip,
    /// Switch to another mode (pomodoro, short_break, long_break)
    Mode {
        /// Target mode; also accepts work, short, long
        mode: Mode,
    },
    /// Print current timer state as JSON
    Status,
}

/// Command output: the event produced (if any) and the resulting state.
#[derive(Serialize)]
struct Outcome {
    event: Option<Event>,
    status: SessionStatus,
}

pub fn run(ctx: &Context, action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ctx.open_session()?;

    let event = match action {
        TimerAction::Start => session.start(),
        TimerAction::Pause => session.pause(),
        TimerAction::Toggle => session.toggle(),
        TimerAction::Reset => session.reset(),
        TimerAction::Skip => Some(session.skip()),
        TimerAction::Mode { mode } => session.change_mode(mode),
        TimerAction::Status => None,
    };

    let outcome = Outcome {
        event,
        status: session.status(),
    };
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
