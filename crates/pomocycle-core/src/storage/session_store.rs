//! Persistence for session snapshots, duration settings and history.
//!
//! Three independent records live in the kv table:
//!
//! - `session_snapshot`: the last [`SessionSnapshot`], overwritten on
//!   every state change
//! - `duration_settings`: the [`DurationSettings`], written on edit so
//!   they survive a snapshot that fails to restore
//! - `history:<user_id>`: append-only JSON array of [`HistoryEntry`]
//!
//! The `load_*` methods never fail: anything unreadable is logged and
//! reported as absent so the caller can start from defaults.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::database::Database;
use crate::error::{CoreError, DatabaseError, SnapshotError};
use crate::timer::{DurationSettings, SessionSnapshot};

pub const SNAPSHOT_KEY: &str = "session_snapshot";
pub const DURATIONS_KEY: &str = "duration_settings";
const HISTORY_PREFIX: &str = "history:";

pub fn history_key(user_id: &str) -> String {
    format!("{HISTORY_PREFIX}{user_id}")
}

/// One completed work interval, attributed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub completed_at: DateTime<Utc>,
    pub duration_min: u32,
    pub cycle_number: u32,
    pub pomodoro_in_cycle: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HistorySummary {
    pub total_pomodoros: u64,
    pub total_focus_min: u64,
    pub today_pomodoros: u64,
    pub today_focus_min: u64,
    /// Highest cycle number seen in the history.
    pub cycles_reached: u32,
}

pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the store on the default database file.
    pub fn open() -> Result<Self, DatabaseError> {
        Ok(Self::new(Database::open()?))
    }

    pub fn open_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(Database::open_memory()?))
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    // ── Snapshot ─────────────────────────────────────────────────────

    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<(), DatabaseError> {
        let json = snapshot.encode().map_err(|e| DatabaseError::Encode {
            key: SNAPSHOT_KEY.into(),
            message: e.to_string(),
        })?;
        self.db.kv_set(SNAPSHOT_KEY, &json)
    }

    /// Strict read: distinguishes absent, unreadable and corrupt.
    pub fn read_snapshot(&self) -> Result<Option<SessionSnapshot>, CoreError> {
        match self.db.kv_get(SNAPSHOT_KEY)? {
            Some(json) => Ok(Some(SessionSnapshot::decode(&json)?)),
            None => Ok(None),
        }
    }

    /// Lenient read used at startup. Corrupt records yield `None`.
    pub fn load_snapshot(&self) -> Option<SessionSnapshot> {
        match self.read_snapshot() {
            Ok(snapshot) => snapshot,
            Err(CoreError::Snapshot(e)) => {
                tracing::warn!(error = %e, "discarding corrupt session snapshot");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session snapshot");
                None
            }
        }
    }

    // ── Duration settings ────────────────────────────────────────────

    pub fn save_duration_settings(&self, durations: &DurationSettings) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(durations).map_err(|e| DatabaseError::Encode {
            key: DURATIONS_KEY.into(),
            message: e.to_string(),
        })?;
        self.db.kv_set(DURATIONS_KEY, &json)
    }

    pub fn load_duration_settings(&self) -> Option<DurationSettings> {
        let json = match self.db.kv_get(DURATIONS_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read duration settings");
                return None;
            }
        };
        let parsed = serde_json::from_str::<DurationSettings>(&json)
            .map_err(SnapshotError::from)
            .and_then(|d| {
                d.validate()
                    .map(|()| d)
                    .map_err(|e| SnapshotError::InvariantViolated(e.to_string()))
            });
        match parsed {
            Ok(durations) => Some(durations),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring invalid duration settings");
                None
            }
        }
    }

    // ── History ──────────────────────────────────────────────────────

    /// Append `entry` to the user's history. Anonymous sessions are not
    /// tracked: returns `Ok(false)` without touching storage.
    pub fn append_history(
        &self,
        user_id: Option<&str>,
        entry: &HistoryEntry,
    ) -> Result<bool, DatabaseError> {
        let Some(user_id) = user_id else {
            return Ok(false);
        };
        let key = history_key(user_id);
        self.db.kv_update(&key, |current| {
            let mut entries = current
                .as_deref()
                .map(|json| decode_history(&key, json))
                .unwrap_or_default();
            entries.push(entry.clone());
            serde_json::to_string(&entries).map_err(|e| DatabaseError::Encode {
                key: key.clone(),
                message: e.to_string(),
            })
        })?;
        Ok(true)
    }

    /// All entries for `user_id`, oldest first.
    pub fn history(&self, user_id: &str) -> Result<Vec<HistoryEntry>, DatabaseError> {
        let key = history_key(user_id);
        Ok(self
            .db
            .kv_get(&key)?
            .map(|json| decode_history(&key, &json))
            .unwrap_or_default())
    }

    /// Users that have at least one history record.
    pub fn history_users(&self) -> Result<Vec<String>, DatabaseError> {
        Ok(self
            .db
            .kv_keys(HISTORY_PREFIX)?
            .into_iter()
            .filter_map(|k| k.strip_prefix(HISTORY_PREFIX).map(str::to_string))
            .collect())
    }

    /// Totals for `user_id`. "Today" is the calendar date of `now` in
    /// `now`'s time zone, so pass local time to match what users see.
    pub fn history_summary<Tz: TimeZone>(
        &self,
        user_id: &str,
        now: DateTime<Tz>,
    ) -> Result<HistorySummary, DatabaseError> {
        let zone = now.timezone();
        let today = now.date_naive();
        let mut summary = HistorySummary::default();
        for entry in self.history(user_id)? {
            summary.total_pomodoros += 1;
            summary.total_focus_min += u64::from(entry.duration_min);
            if entry.completed_at.with_timezone(&zone).date_naive() == today {
                summary.today_pomodoros += 1;
                summary.today_focus_min += u64::from(entry.duration_min);
            }
            summary.cycles_reached = summary.cycles_reached.max(entry.cycle_number);
        }
        Ok(summary)
    }
}

fn decode_history(key: &str, json: &str) -> Vec<HistoryEntry> {
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "history record unreadable, starting a new list");
        Vec::new()
    })
}
