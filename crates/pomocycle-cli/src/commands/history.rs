use chrono::Local;
use clap::Subcommand;
use pomocycle_core::SessionStore;

use crate::context::Context;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List completed work intervals for the current user
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Totals for the current user
    Summary,
}

pub fn run(ctx: &Context, action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let user = ctx
        .user_id(&config)
        .ok_or("history needs a user: pass --user, set POMOCYCLE_USER or config user.id")?;
    let store = SessionStore::open()?;

    match action {
        HistoryAction::List { json } => {
            let entries = store.history(&user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No history for {user}.");
            } else {
                for entry in &entries {
                    println!(
                        "{}  cycle {:>3}  #{}  {} min",
                        entry.completed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                        entry.cycle_number,
                        entry.pomodoro_in_cycle,
                        entry.duration_min
                    );
                }
            }
        }
        HistoryAction::Summary => {
            let summary = store.history_summary(&user, Local::now())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}
