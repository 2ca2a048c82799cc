use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::HistoryEntry;
use crate::timer::{Mode, POMODOROS_PER_CYCLE};

/// Every state change of the session machine produces an Event.
/// The session layer persists on any event and dispatches side effects
/// for `PhaseCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    Ticked {
        mode: Mode,
        remaining_secs: u32,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    DurationUpdated {
        mode: Mode,
        minutes: u32,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        completion: Completion,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True when the event begins a new countdown, so any tick scheduled
    /// for the previous one must be dropped.
    pub fn restarts_countdown(&self) -> bool {
        matches!(
            self,
            Event::PhaseCompleted { .. } | Event::ModeChanged { .. } | Event::TimerReset { .. }
        )
    }

    pub fn completion(&self) -> Option<&Completion> {
        match self {
            Event::PhaseCompleted { completion, .. } => Some(completion),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionKind {
    PomodoroDone,
    CycleDone,
    ShortBreakDone,
    LongBreakDone,
}

/// Descriptor of one finished interval, carrying the counters as they
/// stood right after the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub kind: CompletionKind,
    /// Mode that just finished.
    pub finished: Mode,
    /// Mode the machine moved into.
    pub next: Mode,
    /// Configured length of the finished interval.
    pub duration_min: u32,
    /// 1-based cycle the finished interval belongs to.
    pub cycle_number: u32,
    /// 1-based position of the finished pomodoro within its cycle.
    /// Zero for break completions.
    pub pomodoro_in_cycle: u32,
    pub completed_cycles: u32,
}

impl Completion {
    /// Only finished work intervals are recorded in a user's history.
    pub fn is_history_eligible(&self) -> bool {
        self.finished == Mode::Pomodoro
    }

    pub fn history_entry(&self, completed_at: DateTime<Utc>) -> Option<HistoryEntry> {
        self.is_history_eligible().then(|| HistoryEntry {
            completed_at,
            duration_min: self.duration_min,
            cycle_number: self.cycle_number,
            pomodoro_in_cycle: self.pomodoro_in_cycle,
        })
    }

    /// "n/4" progress text for pomodoro completions.
    pub fn cycle_progress(&self) -> String {
        format!("{}/{}", self.pomodoro_in_cycle, POMODOROS_PER_CYCLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pomodoro_done() -> Completion {
        Completion {
            kind: CompletionKind::PomodoroDone,
            finished: Mode::Pomodoro,
            next: Mode::ShortBreak,
            duration_min: 25,
            cycle_number: 2,
            pomodoro_in_cycle: 3,
            completed_cycles: 1,
        }
    }

    #[test]
    fn pomodoro_completion_yields_history_entry() {
        let at = Utc::now();
        let entry = pomodoro_done().history_entry(at).unwrap();
        assert_eq!(entry.completed_at, at);
        assert_eq!(entry.duration_min, 25);
        assert_eq!(entry.cycle_number, 2);
        assert_eq!(entry.pomodoro_in_cycle, 3);
    }

    #[test]
    fn break_completion_has_no_history_entry() {
        let c = Completion {
            kind: CompletionKind::ShortBreakDone,
            finished: Mode::ShortBreak,
            next: Mode::Pomodoro,
            duration_min: 5,
            cycle_number: 1,
            pomodoro_in_cycle: 0,
            completed_cycles: 0,
        };
        assert!(c.history_entry(Utc::now()).is_none());
    }

    #[test]
    fn event_is_tagged_by_type() {
        let event = Event::PhaseCompleted {
            completion: pomodoro_done(),
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_completed");
        assert_eq!(json["completion"]["kind"], "POMODORO_DONE");
        assert_eq!(pomodoro_done().cycle_progress(), "3/4");
        assert!(event.restarts_countdown());
    }
}
