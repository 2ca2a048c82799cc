//! Session state machine.
//!
//! Pure state: no clocks, no I/O. The caller drives the countdown by
//! invoking `tick()` once per second (see [`super::ClockTicker`]) and
//! consumes the returned [`Event`]s for persistence and notifications.
//!
//! ## State Transitions
//!
//! ```text
//! Pomodoro --(1..3)--> ShortBreak --> Pomodoro
//! Pomodoro --(4th)---> LongBreak  --> Pomodoro
//! ```
//!
//! Each mode is either running or paused. Completion always leaves the
//! machine running in the next mode.
//!
//! ## Usage
//!
//! ```ignore
//! let mut machine = SessionMachine::new(DurationSettings::default());
//! machine.start();
//! // Once per second:
//! if let Some(Event::PhaseCompleted { completion, .. }) = machine.tick() { /* ... */ }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{DurationSettings, Mode, POMODOROS_PER_CYCLE};
use super::snapshot::{SessionSnapshot, SNAPSHOT_VERSION};
use crate::error::{SnapshotError, ValidationError};
use crate::events::{Completion, CompletionKind, Event};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionMachine {
    mode: Mode,
    running: bool,
    remaining_secs: u32,
    pomodoros_in_cycle: u32,
    completed_cycles: u32,
    durations: DurationSettings,
}

/// Read-only view of the machine for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub mode: Mode,
    pub running: bool,
    pub remaining_secs: u32,
    pub total_secs: u32,
    /// `mm:ss` rendering of `remaining_secs`.
    pub display: String,
    pub progress: f64,
    pub pomodoros_in_cycle: u32,
    pub completed_cycles: u32,
    pub durations: DurationSettings,
}

impl SessionMachine {
    /// Fresh session: paused in Pomodoro with a full countdown.
    pub fn new(durations: DurationSettings) -> Self {
        Self {
            mode: Mode::Pomodoro,
            running: false,
            remaining_secs: durations.seconds(Mode::Pomodoro),
            pomodoros_in_cycle: 0,
            completed_cycles: 0,
            durations,
        }
    }

    /// Rebuild a paused machine from a persisted snapshot.
    pub fn restore(snapshot: &SessionSnapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(Self {
            mode: snapshot.mode,
            running: false,
            remaining_secs: snapshot.remaining_secs,
            pomodoros_in_cycle: snapshot.pomodoros_in_cycle,
            completed_cycles: snapshot.completed_cycles,
            durations: snapshot.durations,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.durations.seconds(self.mode)
    }

    pub fn pomodoros_in_cycle(&self) -> u32 {
        self.pomodoros_in_cycle
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn durations(&self) -> &DurationSettings {
        &self.durations
    }

    /// 0.0 .. 1.0 elapsed fraction of the current interval.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.remaining_secs) / f64::from(total)).clamp(0.0, 1.0)
    }

    /// Restorable state. A countdown longer than the current duration
    /// (shortened while running) is stored at the full duration.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            mode: self.mode,
            remaining_secs: self.remaining_secs.min(self.total_secs()),
            pomodoros_in_cycle: self.pomodoros_in_cycle,
            completed_cycles: self.completed_cycles,
            durations: self.durations,
            was_running: self.running,
            saved_at: Utc::now(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            mode: self.mode,
            running: self.running,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            display: format_clock(self.remaining_secs),
            progress: self.progress(),
            pomodoros_in_cycle: self.pomodoros_in_cycle,
            completed_cycles: self.completed_cycles,
            durations: self.durations,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        // Only reachable from a restored snapshot that hit zero.
        if self.remaining_secs == 0 {
            self.remaining_secs = self.total_secs();
        }
        self.running = true;
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.running = false;
        self.remaining_secs = self.total_secs();
        Some(Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Finish the current interval immediately, running or not.
    /// The machine is left running in the next mode.
    pub fn skip(&mut self) -> Event {
        self.complete()
    }

    /// Jump to `mode` with a full, paused countdown. No completion fires.
    pub fn change_mode(&mut self, mode: Mode) -> Option<Event> {
        let from = self.mode;
        self.running = false;
        self.mode = mode;
        self.remaining_secs = self.total_secs();
        Some(Event::ModeChanged {
            from,
            to: mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Store a new duration for `mode`.
    ///
    /// A paused countdown in the same mode is refilled to the new length;
    /// a running one keeps counting down from where it is.
    pub fn update_duration(&mut self, mode: Mode, minutes: u32) -> Result<Event, ValidationError> {
        self.durations.set(mode, minutes)?;
        if mode == self.mode && !self.running {
            self.remaining_secs = self.total_secs();
        }
        Ok(Event::DurationUpdated {
            mode,
            minutes,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second. Returns `Some(Event::PhaseCompleted)`
    /// when the interval finishes.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            return Some(self.complete());
        }
        Some(Event::Ticked {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        let finished = self.mode;
        let duration_min = self.durations.minutes(finished);
        let mut cycle_number = self.completed_cycles.saturating_add(1);

        let (kind, next, pomodoro_in_cycle) = match finished {
            Mode::Pomodoro => {
                let count = self.pomodoros_in_cycle + 1;
                if count >= POMODOROS_PER_CYCLE {
                    self.pomodoros_in_cycle = 0;
                    self.completed_cycles = self.completed_cycles.saturating_add(1);
                    (CompletionKind::CycleDone, Mode::LongBreak, count)
                } else {
                    self.pomodoros_in_cycle = count;
                    (CompletionKind::PomodoroDone, Mode::ShortBreak, count)
                }
            }
            Mode::ShortBreak => (CompletionKind::ShortBreakDone, Mode::Pomodoro, 0),
            Mode::LongBreak => {
                // The cycle counter moved when the 4th pomodoro finished.
                cycle_number = self.completed_cycles.max(1);
                (CompletionKind::LongBreakDone, Mode::Pomodoro, 0)
            }
        };

        self.mode = next;
        self.remaining_secs = self.total_secs();
        self.running = true;

        Event::PhaseCompleted {
            completion: Completion {
                kind,
                finished,
                next,
                duration_min,
                cycle_number,
                pomodoro_in_cycle,
                completed_cycles: self.completed_cycles,
            },
            at: Utc::now(),
        }
    }
}

impl Default for SessionMachine {
    fn default() -> Self {
        Self::new(DurationSettings::default())
    }
}

/// Render seconds as zero-padded `mm:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
