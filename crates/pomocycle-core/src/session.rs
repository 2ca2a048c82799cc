//! Session: the machine plus its side effects.
//!
//! Commands go to the [`SessionMachine`]; the events it returns are
//! consumed here. Any event persists a fresh snapshot. A
//! `PhaseCompleted` event additionally appends history (work intervals,
//! identified users only) and dispatches notifications, both before the
//! snapshot is written.
//!
//! Storage and notification failures are logged and absorbed. The only
//! error a caller can see is a rejected duration edit.
//!
//! `Session` is `Send`; callers that share it across threads must wrap it
//! in a single `Mutex` so `tick()` and commands stay serialized.

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::events::{Completion, Event};
use crate::identity::IdentityProvider;
use crate::notify::{DispatchReport, NotificationDispatcher};
use crate::storage::SessionStore;
use crate::timer::{Mode, SessionMachine, SessionStatus};

#[derive(Debug, Clone, Copy, Default)]
pub struct RestoreOptions {
    /// Subtract wall-clock time elapsed since a running snapshot was saved.
    pub reconcile_elapsed: bool,
}

pub struct Session {
    machine: SessionMachine,
    store: SessionStore,
    notifier: NotificationDispatcher,
    identity: Box<dyn IdentityProvider>,
    last_dispatch: Option<DispatchReport>,
}

impl Session {
    /// Restore the persisted session, or start fresh.
    ///
    /// Reads the snapshot exactly once. Independently stored duration
    /// settings win over the snapshot's copy.
    pub fn open(
        store: SessionStore,
        notifier: NotificationDispatcher,
        identity: Box<dyn IdentityProvider>,
        options: RestoreOptions,
    ) -> Self {
        let machine = restore_machine(&store, options, Utc::now());
        tracing::debug!(
            mode = %machine.mode(),
            remaining_secs = machine.remaining_secs(),
            cycles = machine.completed_cycles(),
            "session opened"
        );
        Self {
            machine,
            store,
            notifier,
            identity,
            last_dispatch: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn machine(&self) -> &SessionMachine {
        &self.machine
    }

    pub fn status(&self) -> SessionStatus {
        self.machine.status()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn user_id(&self) -> Option<String> {
        self.identity.current_user_id()
    }

    /// Report of the most recent completion's notifications.
    pub fn last_dispatch(&self) -> Option<&DispatchReport> {
        self.last_dispatch.as_ref()
    }

    pub fn into_store(self) -> SessionStore {
        self.store
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn tick(&mut self) -> Option<Event> {
        let event = self.machine.tick();
        self.apply_opt(event)
    }

    pub fn start(&mut self) -> Option<Event> {
        self.notifier.click();
        let event = self.machine.start();
        self.apply_opt(event)
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.notifier.click();
        let event = self.machine.pause();
        self.apply_opt(event)
    }

    pub fn toggle(&mut self) -> Option<Event> {
        self.notifier.click();
        let event = self.machine.toggle();
        self.apply_opt(event)
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.notifier.click();
        let event = self.machine.reset();
        self.apply_opt(event)
    }

    pub fn skip(&mut self) -> Event {
        self.notifier.click();
        let event = self.machine.skip();
        self.apply(event)
    }

    pub fn change_mode(&mut self, mode: Mode) -> Option<Event> {
        self.notifier.click();
        let event = self.machine.change_mode(mode);
        self.apply_opt(event)
    }

    pub fn update_duration(&mut self, mode: Mode, minutes: u32) -> Result<Event, ValidationError> {
        let event = self.machine.update_duration(mode, minutes)?;
        if let Err(e) = self.store.save_duration_settings(self.machine.durations()) {
            tracing::warn!(error = %e, "failed to persist duration settings");
        }
        Ok(self.apply(event))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_opt(&mut self, event: Option<Event>) -> Option<Event> {
        event.map(|e| self.apply(e))
    }

    fn apply(&mut self, event: Event) -> Event {
        if let Event::PhaseCompleted { completion, at } = &event {
            self.on_completion(completion, *at);
        }
        self.persist();
        event
    }

    fn on_completion(&mut self, completion: &Completion, at: DateTime<Utc>) {
        if let Some(entry) = completion.history_entry(at) {
            let user_id = self.identity.current_user_id();
            match self.store.append_history(user_id.as_deref(), &entry) {
                Ok(true) => tracing::debug!(
                    user = user_id.as_deref().unwrap_or_default(),
                    cycle = entry.cycle_number,
                    pomodoro = entry.pomodoro_in_cycle,
                    "history recorded"
                ),
                Ok(false) => {}
                Err(e) => tracing::warn!(error = %e, "failed to record history"),
            }
        }

        let report = self.notifier.dispatch(completion);
        tracing::info!(
            kind = ?completion.kind,
            next = %completion.next,
            delivered = report.delivered_count(),
            failed = report.failed_count(),
            "phase completed"
        );
        self.last_dispatch = Some(report);
    }

    fn persist(&self) {
        if let Err(e) = self.store.save_snapshot(&self.machine.snapshot()) {
            tracing::warn!(error = %e, "failed to persist session snapshot");
        }
    }
}

fn restore_machine(store: &SessionStore, options: RestoreOptions, now: DateTime<Utc>) -> SessionMachine {
    let stored_durations = store.load_duration_settings();
    let Some(mut snapshot) = store.load_snapshot() else {
        return SessionMachine::new(stored_durations.unwrap_or_default());
    };

    if options.reconcile_elapsed {
        snapshot = snapshot.reconciled(now);
    }
    let durations = stored_durations.unwrap_or(snapshot.durations);
    snapshot = snapshot.with_durations(durations);

    SessionMachine::restore(&snapshot).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "snapshot rejected, starting fresh");
        SessionMachine::new(stored_durations.unwrap_or_default())
    })
}
