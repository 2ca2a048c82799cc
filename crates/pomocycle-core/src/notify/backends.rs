//! Terminal-friendly channel backends.
//!
//! Everything writes to stderr or the log so stdout stays free for
//! machine-readable output.

use std::io::Write;

use super::{Cue, CuePlayer, DesktopNotifier, Permission, ToastStyle, Toaster};
use crate::error::NotificationError;

/// Rings the terminal bell once per cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl CuePlayer for TerminalBell {
    fn play(&self, cue: Cue) -> Result<(), NotificationError> {
        tracing::debug!(?cue, duration_ms = cue.duration_ms(), "playing cue");
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|()| stderr.flush())
            .map_err(|e| NotificationError::Backend {
                channel: "sound",
                message: e.to_string(),
            })
    }
}

/// Desktop notifications routed to the log.
///
/// Stands in for a platform notification center; permission is whatever
/// it was constructed with.
#[derive(Debug, Clone, Copy)]
pub struct LogNotifier {
    permission: Permission,
}

impl LogNotifier {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

impl DesktopNotifier for LogNotifier {
    fn request_permission(&self) -> Permission {
        self.permission
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotificationError> {
        if self.permission != Permission::Granted {
            return Err(NotificationError::ChannelUnavailable { channel: "desktop" });
        }
        tracing::info!(target: "pomocycle::desktop", title, body, "notification");
        Ok(())
    }
}

/// Prints toasts on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrToaster;

impl Toaster for StderrToaster {
    fn toast(&self, message: &str, style: ToastStyle) -> Result<(), NotificationError> {
        let marker = match style {
            ToastStyle::Success => "✔",
            ToastStyle::Info => "•",
        };
        writeln!(std::io::stderr(), "{marker} {message}").map_err(|e| NotificationError::Backend {
            channel: "toast",
            message: e.to_string(),
        })
    }
}

/// Drops everything. Desktop permission is always denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl CuePlayer for Silent {
    fn play(&self, _cue: Cue) -> Result<(), NotificationError> {
        Ok(())
    }
}

impl DesktopNotifier for Silent {
    fn request_permission(&self) -> Permission {
        Permission::Denied
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotificationError> {
        Err(NotificationError::ChannelUnavailable { channel: "desktop" })
    }
}

impl Toaster for Silent {
    fn toast(&self, _message: &str, _style: ToastStyle) -> Result<(), NotificationError> {
        Ok(())
    }
}
