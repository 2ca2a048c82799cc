use serde::{Deserialize, Serialize};

use crate::events::{Completion, CompletionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastStyle {
    Success,
    Info,
}

/// User-facing text for one completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    pub toast: String,
    pub style: ToastStyle,
}

impl NotificationMessage {
    pub fn for_completion(completion: &Completion) -> Self {
        match completion.kind {
            CompletionKind::PomodoroDone => Self {
                title: "Pomodoro complete!".into(),
                body: format!(
                    "{} done. Time for a short break",
                    completion.cycle_progress()
                ),
                toast: format!(
                    "Pomodoro {} complete! Take a break",
                    completion.cycle_progress()
                ),
                style: ToastStyle::Success,
            },
            CompletionKind::CycleDone => Self {
                title: "Cycle complete! 🎉".into(),
                body: "You finished 4 pomodoros. Time for a long break".into(),
                toast: "Congratulations! You completed a cycle of 4 pomodoros 🎉".into(),
                style: ToastStyle::Success,
            },
            CompletionKind::ShortBreakDone => Self {
                title: "Break over!".into(),
                body: "Time to get back to work".into(),
                toast: "🍅 Back to work! 💪".into(),
                style: ToastStyle::Info,
            },
            CompletionKind::LongBreakDone => Self {
                title: "Long break complete!".into(),
                body: "Ready for a new cycle!".into(),
                toast: "Excellent! Starting a new cycle 🚀".into(),
                style: ToastStyle::Success,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::Mode;

    #[test]
    fn pomodoro_message_carries_count() {
        let c = Completion {
            kind: CompletionKind::PomodoroDone,
            finished: Mode::Pomodoro,
            next: Mode::ShortBreak,
            duration_min: 25,
            cycle_number: 1,
            pomodoro_in_cycle: 2,
            completed_cycles: 0,
        };
        let msg = NotificationMessage::for_completion(&c);
        assert_eq!(msg.body, "2/4 done. Time for a short break");
        assert!(msg.toast.contains("2/4"));
        assert_eq!(msg.style, ToastStyle::Success);
    }
}
