use clap::Subcommand;
use pomocycle_core::Mode;
use serde::Serialize;

use crate::context::Context;

#[derive(Subcommand)]
pub enum DurationsAction {
    /// Print minutes per mode
    Show,
    /// Set the minutes for one mode
    Set {
        /// pomodoro, short_break or long_break
        mode: Mode,
        /// Minutes (pomodoro and long break 1-60, short break 1-30)
        minutes: u32,
    },
}

#[derive(Serialize)]
struct DurationRow {
    mode: Mode,
    minutes: u32,
    min: u32,
    max: u32,
}

pub fn run(ctx: &Context, action: DurationsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = ctx.open_session()?;

    match action {
        DurationsAction::Show => {
            let durations = *session.machine().durations();
            let rows: Vec<DurationRow> = Mode::ALL
                .iter()
                .map(|&mode| {
                    let bounds = mode.duration_bounds();
                    DurationRow {
                        mode,
                        minutes: durations.minutes(mode),
                        min: *bounds.start(),
                        max: *bounds.end(),
                    }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        DurationsAction::Set { mode, minutes } => {
            let event = session.update_duration(mode, minutes)?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
    }
    Ok(())
}
