//! Completion side effects: sound, desktop notification, toast.
//!
//! Each channel is an injected backend. Dispatch is fire-and-forget: a
//! failing channel is logged and recorded in the [`DispatchReport`] but
//! never stops the other channels or reaches the session machine.

mod backends;
mod cue;
mod message;
mod report;

pub use backends::{LogNotifier, Silent, StderrToaster, TerminalBell};
pub use cue::{Cue, Tone};
pub use message::{NotificationMessage, ToastStyle};
pub use report::{Channel, ChannelResult, ChannelStatus, DispatchReport};

use serde::{Deserialize, Serialize};

use crate::error::NotificationError;
use crate::events::Completion;
use crate::storage::NotificationsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
}

pub trait CuePlayer: Send {
    fn play(&self, cue: Cue) -> Result<(), NotificationError>;
}

pub trait DesktopNotifier: Send {
    /// Ask the platform for permission. Called at most once per dispatcher.
    fn request_permission(&self) -> Permission;

    fn notify(&self, title: &str, body: &str) -> Result<(), NotificationError>;
}

pub trait Toaster: Send {
    fn toast(&self, message: &str, style: ToastStyle) -> Result<(), NotificationError>;
}

pub struct NotificationDispatcher {
    cues: Box<dyn CuePlayer>,
    desktop: Box<dyn DesktopNotifier>,
    toasts: Box<dyn Toaster>,
    /// `None` when the desktop channel is disabled and permission was
    /// never requested.
    permission: Option<Permission>,
    settings: NotificationsConfig,
}

impl NotificationDispatcher {
    /// Build a dispatcher, requesting desktop permission once if the
    /// desktop channel is enabled.
    pub fn new(
        cues: Box<dyn CuePlayer>,
        desktop: Box<dyn DesktopNotifier>,
        toasts: Box<dyn Toaster>,
        settings: NotificationsConfig,
    ) -> Self {
        let permission = settings.desktop.then(|| desktop.request_permission());
        if permission == Some(Permission::Denied) {
            tracing::debug!("desktop notifications not permitted");
        }
        Self {
            cues,
            desktop,
            toasts,
            permission,
            settings,
        }
    }

    /// Dispatcher with every channel muted.
    pub fn silent() -> Self {
        let settings = NotificationsConfig {
            sound: false,
            desktop: false,
            toast: false,
            click_feedback: false,
        };
        Self::new(Box::new(Silent), Box::new(Silent), Box::new(Silent), settings)
    }

    pub fn permission(&self) -> Option<Permission> {
        self.permission
    }

    pub fn dispatch(&self, completion: &Completion) -> DispatchReport {
        let message = NotificationMessage::for_completion(completion);
        let results = vec![
            self.run_channel(Channel::Sound, self.settings.sound, None, || {
                self.cues.play(Cue::for_kind(completion.kind))
            }),
            self.run_channel(
                Channel::Desktop,
                self.settings.desktop,
                self.desktop_skip_reason(),
                || self.desktop.notify(&message.title, &message.body),
            ),
            self.run_channel(Channel::Toast, self.settings.toast, None, || {
                self.toasts.toast(&message.toast, message.style)
            }),
        ];
        DispatchReport::new(completion.kind, results)
    }

    /// Audible feedback for a user command, when enabled.
    pub fn click(&self) {
        if !(self.settings.sound && self.settings.click_feedback) {
            return;
        }
        if let Err(e) = self.cues.play(Cue::Click) {
            tracing::warn!(error = %e, "click cue failed");
        }
    }

    fn desktop_skip_reason(&self) -> Option<String> {
        match self.permission {
            Some(Permission::Granted) => None,
            _ => Some("permission not granted".into()),
        }
    }

    fn run_channel<F>(
        &self,
        channel: Channel,
        enabled: bool,
        skip_reason: Option<String>,
        send: F,
    ) -> ChannelResult
    where
        F: FnOnce() -> Result<(), NotificationError>,
    {
        let status = if !enabled {
            ChannelStatus::Skipped {
                reason: "disabled".into(),
            }
        } else if let Some(reason) = skip_reason {
            ChannelStatus::Skipped { reason }
        } else {
            match send() {
                Ok(()) => ChannelStatus::Delivered,
                Err(e) => {
                    tracing::warn!(channel = channel.as_str(), error = %e, "notification channel failed");
                    ChannelStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        };
        ChannelResult { channel, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CompletionKind;
    use crate::timer::Mode;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        cues: Arc<Mutex<Vec<Cue>>>,
        desktop: Arc<Mutex<Vec<(String, String)>>>,
        toasts: Arc<Mutex<Vec<(String, ToastStyle)>>>,
        permission_requests: Arc<AtomicUsize>,
        grant: bool,
        fail_sound: bool,
    }

    impl CuePlayer for Recorder {
        fn play(&self, cue: Cue) -> Result<(), NotificationError> {
            if self.fail_sound {
                return Err(NotificationError::Backend {
                    channel: "sound",
                    message: "no audio device".into(),
                });
            }
            self.cues.lock().unwrap().push(cue);
            Ok(())
        }
    }

    impl DesktopNotifier for Recorder {
        fn request_permission(&self) -> Permission {
            self.permission_requests.fetch_add(1, Ordering::SeqCst);
            if self.grant {
                Permission::Granted
            } else {
                Permission::Denied
            }
        }

        fn notify(&self, title: &str, body: &str) -> Result<(), NotificationError> {
            self.desktop
                .lock()
                .unwrap()
                .push((title.to_string(), body.to_string()));
            Ok(())
        }
    }

    impl Toaster for Recorder {
        fn toast(&self, message: &str, style: ToastStyle) -> Result<(), NotificationError> {
            self.toasts.lock().unwrap().push((message.to_string(), style));
            Ok(())
        }
    }

    fn dispatcher(recorder: &Recorder, settings: NotificationsConfig) -> NotificationDispatcher {
        NotificationDispatcher::new(
            Box::new(recorder.clone()),
            Box::new(recorder.clone()),
            Box::new(recorder.clone()),
            settings,
        )
    }

    fn cycle_done() -> Completion {
        Completion {
            kind: CompletionKind::CycleDone,
            finished: Mode::Pomodoro,
            next: Mode::LongBreak,
            duration_min: 25,
            cycle_number: 1,
            pomodoro_in_cycle: 4,
            completed_cycles: 1,
        }
    }

    #[test]
    fn delivers_all_channels_when_granted() {
        let recorder = Recorder {
            grant: true,
            ..Default::default()
        };
        let d = dispatcher(&recorder, NotificationsConfig::default());
        let report = d.dispatch(&cycle_done());

        assert_eq!(report.delivered_count(), 3);
        assert_eq!(*recorder.cues.lock().unwrap(), vec![Cue::CycleComplete]);
        assert_eq!(recorder.desktop.lock().unwrap()[0].0, "Cycle complete! 🎉");
        assert_eq!(recorder.toasts.lock().unwrap()[0].1, ToastStyle::Success);
    }

    #[test]
    fn permission_requested_once() {
        let recorder = Recorder {
            grant: true,
            ..Default::default()
        };
        let d = dispatcher(&recorder, NotificationsConfig::default());
        d.dispatch(&cycle_done());
        d.dispatch(&cycle_done());
        assert_eq!(recorder.permission_requests.load(Ordering::SeqCst), 1);
        assert_eq!(d.permission(), Some(Permission::Granted));
    }

    #[test]
    fn denied_permission_skips_desktop_silently() {
        let recorder = Recorder::default();
        let d = dispatcher(&recorder, NotificationsConfig::default());
        let report = d.dispatch(&cycle_done());

        assert!(matches!(
            report.status(Channel::Desktop),
            Some(ChannelStatus::Skipped { .. })
        ));
        assert!(recorder.desktop.lock().unwrap().is_empty());
        assert_eq!(report.delivered_count(), 2);
    }

    #[test]
    fn failing_sound_does_not_block_other_channels() {
        let recorder = Recorder {
            grant: true,
            fail_sound: true,
            ..Default::default()
        };
        let d = dispatcher(&recorder, NotificationsConfig::default());
        let report = d.dispatch(&cycle_done());

        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.delivered_count(), 2);
        assert_eq!(recorder.toasts.lock().unwrap().len(), 1);
    }

    #[test]
    fn disabled_desktop_never_asks_permission() {
        let recorder = Recorder {
            grant: true,
            ..Default::default()
        };
        let settings = NotificationsConfig {
            desktop: false,
            ..Default::default()
        };
        let d = dispatcher(&recorder, settings);
        assert_eq!(recorder.permission_requests.load(Ordering::SeqCst), 0);
        assert!(d.permission().is_none());
        assert_eq!(d.dispatch(&cycle_done()).skipped_count(), 1);
    }

    #[test]
    fn click_respects_settings() {
        let recorder = Recorder::default();
        dispatcher(&recorder, NotificationsConfig::default()).click();
        assert!(recorder.cues.lock().unwrap().is_empty());

        let settings = NotificationsConfig {
            click_feedback: true,
            ..Default::default()
        };
        dispatcher(&recorder, settings).click();
        assert_eq!(*recorder.cues.lock().unwrap(), vec![Cue::Click]);
    }

    #[test]
    fn silent_dispatcher_skips_everything() {
        let report = NotificationDispatcher::silent().dispatch(&cycle_done());
        assert_eq!(report.skipped_count(), 3);
    }
}
