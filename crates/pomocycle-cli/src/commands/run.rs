//! Foreground live countdown.
//!
//! One current-thread runtime, one `select!` loop: ticks, stdin lines and
//! Ctrl-C are handled strictly one at a time, and the ticker is re-synced
//! with the machine after each of them. Skips, resets and mode changes
//! restart the tick schedule.

use std::io::Write;

use pomocycle_core::{ClockTicker, Event, Mode, Session};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::context::Context;

const HELP: &str = "commands: s or enter start/pause, r reset, n skip, p pomodoro, b short break, l long break, q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Toggle,
    Reset,
    Skip,
    Switch(Mode),
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    match line.trim() {
        "s" | "" => Some(Input::Toggle),
        "r" => Some(Input::Reset),
        "n" => Some(Input::Skip),
        "p" => Some(Input::Switch(Mode::Pomodoro)),
        "b" => Some(Input::Switch(Mode::ShortBreak)),
        "l" => Some(Input::Switch(Mode::LongBreak)),
        "q" => Some(Input::Quit),
        _ => None,
    }
}

pub fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let config = ctx.config()?;
    let session = ctx.open_session_with(&config)?;
    let interval = config.tick_interval();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(drive(session, interval))
}

async fn drive(
    mut session: Session,
    interval: std::time::Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let (mut ticker, mut ticks) = ClockTicker::channel(interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    eprintln!("{HELP}");
    render(&session);

    loop {
        let event = tokio::select! {
            Some(tick) = ticks.recv() => {
                if !ticker.accept(tick) {
                    continue;
                }
                let event = session.tick();
                if let Some(completion) = event.as_ref().and_then(Event::completion) {
                    eprintln!();
                    tracing::debug!(kind = ?completion.kind, "phase completed in foreground");
                }
                event
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(input) => apply(&mut session, input),
                    None => {
                        eprintln!("{HELP}");
                        None
                    }
                }
            }
            _ = &mut ctrl_c => break,
        };

        let machine = session.machine();
        ticker.follow(event.as_ref(), machine.is_running(), machine.remaining_secs());
        render(&session);
    }

    ticker.cancel();
    eprintln!();
    Ok(())
}

fn apply(session: &mut Session, input: Input) -> Option<Event> {
    match input {
        Input::Toggle => session.toggle(),
        Input::Reset => session.reset(),
        Input::Skip => Some(session.skip()),
        Input::Switch(mode) => session.change_mode(mode),
        Input::Quit => None,
    }
}

fn render(session: &Session) {
    let status = session.status();
    let state = if status.running { "running" } else { "paused" };
    let mut stderr = std::io::stderr().lock();
    // Best effort: a broken terminal must not stop the countdown.
    let _ = write!(
        stderr,
        "\r{:<12} {}  {:<7}  {}/4  cycles {}   ",
        status.mode.label(),
        status.display,
        state,
        status.pomodoros_in_cycle,
        status.completed_cycles
    );
    let _ = stderr.flush();
}
