use serde::{Deserialize, Serialize};

use crate::events::CompletionKind;

/// Named audible cue. The backend decides how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    PomodoroComplete,
    CycleComplete,
    ShortBreakComplete,
    LongBreakComplete,
    /// Short feedback for user commands.
    Click,
}

/// One note of a cue: a sine tone starting `offset_ms` after the cue begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    pub offset_ms: u32,
}

const fn tone(frequency_hz: u32, duration_ms: u32, offset_ms: u32) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        offset_ms,
    }
}

// Ascending and energetic.
const POMODORO_COMPLETE: &[Tone] = &[tone(600, 150, 0), tone(800, 150, 150), tone(1000, 300, 300)];
// Pomodoro run extended with a high finish.
const CYCLE_COMPLETE: &[Tone] = &[
    tone(600, 150, 0),
    tone(800, 150, 150),
    tone(1000, 150, 300),
    tone(1200, 150, 450),
    tone(1600, 400, 600),
];
// Soft two-note.
const SHORT_BREAK_COMPLETE: &[Tone] = &[tone(500, 200, 0), tone(700, 300, 200)];
const LONG_BREAK_COMPLETE: &[Tone] = &[
    tone(400, 150, 0),
    tone(600, 150, 150),
    tone(800, 150, 300),
    tone(1200, 400, 450),
];
const CLICK: &[Tone] = &[tone(400, 100, 0)];

impl Cue {
    pub fn for_kind(kind: CompletionKind) -> Self {
        match kind {
            CompletionKind::PomodoroDone => Cue::PomodoroComplete,
            CompletionKind::CycleDone => Cue::CycleComplete,
            CompletionKind::ShortBreakDone => Cue::ShortBreakComplete,
            CompletionKind::LongBreakDone => Cue::LongBreakComplete,
        }
    }

    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::PomodoroComplete => POMODORO_COMPLETE,
            Cue::CycleComplete => CYCLE_COMPLETE,
            Cue::ShortBreakComplete => SHORT_BREAK_COMPLETE,
            Cue::LongBreakComplete => LONG_BREAK_COMPLETE,
            Cue::Click => CLICK,
        }
    }

    /// Total length in milliseconds.
    pub fn duration_ms(self) -> u32 {
        self.tones()
            .iter()
            .map(|t| t.offset_ms + t.duration_ms)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_kind_has_its_own_cue() {
        let kinds = [
            CompletionKind::PomodoroDone,
            CompletionKind::CycleDone,
            CompletionKind::ShortBreakDone,
            CompletionKind::LongBreakDone,
        ];
        let cues: HashSet<Cue> = kinds.into_iter().map(Cue::for_kind).collect();
        assert_eq!(cues.len(), 4);
        assert!(!cues.contains(&Cue::Click));
    }

    #[test]
    fn durations() {
        assert_eq!(Cue::PomodoroComplete.duration_ms(), 600);
        assert_eq!(Cue::LongBreakComplete.duration_ms(), 850);
        assert_eq!(Cue::Click.duration_ms(), 100);
    }
}
